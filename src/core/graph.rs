use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
    Directed, Graph,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::model::{display_path, ClassEntity, ClassKey, MethodEntity};
use super::{ClassRegistry, DependencyMap, FileTrees};
use crate::parsers::python::PythonParser;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum NodeType {
    Method,
    Function,
    Class,
}

/// Relationship kinds. Call and override edges are resolved by name only,
/// so they are hints about structure rather than proofs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum EdgeType {
    Call,
    Overrides,
    Dependency,
}

impl EdgeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::Call => "call",
            EdgeType::Overrides => "overrides",
            EdgeType::Dependency => "dependency",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub class_name: Option<String>,
    pub file_path: PathBuf,
    pub line_number: usize,
    /// Rendered `name:type` parameters
    pub args: Vec<String>,
    pub return_type: String,
    pub docstring: Option<String>,
    /// Unresolved callee names, as extracted
    pub calls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub edge_type: EdgeType,
    pub source_id: String,
    pub target_id: String,
    pub context: Option<String>,
}

pub type MethodGraph = Graph<Node, Edge, Directed>;

pub fn method_node_id(file_path: &Path, class_name: &str, method_name: &str) -> String {
    format!("{}:{}:{}", display_path(file_path), class_name, method_name)
}

pub fn function_node_id(file_path: &Path, function_name: &str) -> String {
    format!("{}:{}", display_path(file_path), function_name)
}

pub fn class_node_id(key: &ClassKey) -> String {
    key.to_string()
}

impl Node {
    pub fn method(class: &ClassEntity, method: &MethodEntity) -> Self {
        Self::from_entity(
            method_node_id(&class.file, &class.name, &method.name),
            NodeType::Method,
            Some(class.name.clone()),
            &class.file,
            method,
        )
    }

    pub fn function(file_path: &Path, function: &MethodEntity) -> Self {
        Self::from_entity(
            function_node_id(file_path, &function.name),
            NodeType::Function,
            None,
            file_path,
            function,
        )
    }

    pub fn class(class: &ClassEntity) -> Self {
        Self {
            id: class_node_id(&class.key()),
            name: class.name.clone(),
            node_type: NodeType::Class,
            class_name: Some(class.name.clone()),
            file_path: class.file.clone(),
            line_number: class.line,
            args: Vec::new(),
            return_type: super::model::NONE_TYPE.to_string(),
            docstring: None,
            calls: Vec::new(),
        }
    }

    fn from_entity(
        id: String,
        node_type: NodeType,
        class_name: Option<String>,
        file_path: &Path,
        entity: &MethodEntity,
    ) -> Self {
        Self {
            id,
            name: entity.name.clone(),
            node_type,
            class_name,
            file_path: file_path.to_path_buf(),
            line_number: entity.line,
            args: entity.rendered_params(),
            return_type: entity.rendered_return_type(),
            docstring: entity.docstring.clone(),
            calls: entity.calls.clone(),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.node_type, NodeType::Method | NodeType::Function)
    }
}

impl Edge {
    pub fn new(edge_type: EdgeType, source_id: String, target_id: String) -> Self {
        Self {
            edge_type,
            source_id,
            target_id,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

pub struct GraphBuilder {
    graph: MethodGraph,
    node_map: HashMap<String, NodeIndex>,
    /// Callable nodes by simple name, in insertion order
    name_index: HashMap<String, Vec<NodeIndex>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    /// Build the relationship graph for one run.
    ///
    /// Nodes first (class methods, then free functions, then classes when
    /// `dependencies` is given), then call, override and dependency edges.
    /// Lookups that find nothing simply produce no edge.
    pub fn build_method_graph(
        files: &FileTrees,
        classes: &ClassRegistry,
        dependencies: Option<&DependencyMap>,
    ) -> MethodGraph {
        let mut builder = Self::new();

        builder.add_method_nodes(files, classes);
        builder.add_function_nodes(files);
        if dependencies.is_some() {
            builder.add_class_nodes(classes);
        }

        let calls = builder.link_calls();
        let overrides = builder.link_overrides(classes);
        let depends = dependencies
            .map(|deps| builder.link_dependencies(deps))
            .unwrap_or(0);

        let graph = builder.build();
        if graph.node_count() == 0 {
            warn!("Method graph is empty");
        } else {
            info!(
                "Built method graph: {} nodes, {} call, {} override, {} dependency edges",
                graph.node_count(),
                calls,
                overrides,
                depends
            );
        }
        graph
    }

    /// Insert `node` unless its id is already taken, returning the index that
    /// holds the id
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.id) {
            debug!(id = %node.id, "duplicate node id, keeping the first");
            return index;
        }

        let id = node.id.clone();
        let name = node.name.clone();
        let callable = node.is_callable();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        if callable {
            self.name_index.entry(name).or_default().push(index);
        }
        index
    }

    /// Add `edge` if both endpoints exist, they differ, and no edge of the
    /// same type already joins them
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        let source_idx = *self.node_map.get(&edge.source_id)?;
        let target_idx = *self.node_map.get(&edge.target_id)?;
        if source_idx == target_idx {
            return None;
        }

        if let Some(existing) = self
            .graph
            .edges_connecting(source_idx, target_idx)
            .find(|e| e.weight().edge_type == edge.edge_type)
        {
            return Some(existing.id());
        }

        Some(self.graph.add_edge(source_idx, target_idx, edge))
    }

    pub fn build(self) -> MethodGraph {
        self.graph
    }

    pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    fn add_method_nodes(&mut self, files: &FileTrees, classes: &ClassRegistry) {
        for (path, file) in files {
            let mut seen = HashSet::new();
            for class_name in PythonParser::declared_class_names(&file.tree, file.source_bytes()) {
                if !seen.insert(class_name.clone()) {
                    continue;
                }
                let Some(class) = classes.get(&ClassKey::new(path.clone(), class_name)) else {
                    continue;
                };
                for method in &class.methods {
                    self.add_node(Node::method(class, method));
                }
            }
        }
    }

    fn add_function_nodes(&mut self, files: &FileTrees) {
        for (path, file) in files {
            for function in &file.functions {
                self.add_node(Node::function(path, function));
            }
        }
    }

    fn add_class_nodes(&mut self, classes: &ClassRegistry) {
        for class in classes.values() {
            self.add_node(Node::class(class));
        }
    }

    /// Each call name links to the first other callable node with that name.
    /// When several unrelated methods share the name the pick is arbitrary.
    fn link_calls(&mut self) -> usize {
        let mut edges = Vec::new();

        for source_idx in self.graph.node_indices() {
            let source = &self.graph[source_idx];
            if !source.is_callable() {
                continue;
            }
            for call in &source.calls {
                let target = self
                    .name_index
                    .get(call)
                    .and_then(|candidates| candidates.iter().find(|&&idx| idx != source_idx));
                if let Some(&target_idx) = target {
                    edges.push(
                        Edge::new(
                            EdgeType::Call,
                            source.id.clone(),
                            self.graph[target_idx].id.clone(),
                        )
                        .with_context(call.clone()),
                    );
                }
            }
        }

        self.add_edges(edges)
    }

    /// Methods redefined by a subclass link to the base class's version. The
    /// base must be declared in a different file than the subclass.
    fn link_overrides(&mut self, classes: &ClassRegistry) -> usize {
        let mut edges = Vec::new();

        for class in classes.values() {
            for base in &class.bases {
                let Some(base_class) = classes
                    .values()
                    .find(|other| other.name == *base && other.file != class.file)
                else {
                    continue;
                };

                for method in &class.methods {
                    if base_class.method(&method.name).is_none() {
                        continue;
                    }
                    edges.push(
                        Edge::new(
                            EdgeType::Overrides,
                            method_node_id(&class.file, &class.name, &method.name),
                            method_node_id(&base_class.file, &base_class.name, &method.name),
                        )
                        .with_context(base_class.name.clone()),
                    );
                }
            }
        }

        self.add_edges(edges)
    }

    /// Class-to-class edges for dependencies that name a class node. Bare
    /// imported names have no node and are dropped, as are classes whose id
    /// was already taken by a same-named free function.
    fn link_dependencies(&mut self, dependencies: &DependencyMap) -> usize {
        let mut edges = Vec::new();

        for (key, targets) in dependencies {
            let source_id = class_node_id(key);
            if !self.is_class_node(&source_id) {
                continue;
            }
            for target in targets {
                if self.is_class_node(target) {
                    edges.push(
                        Edge::new(EdgeType::Dependency, source_id.clone(), target.clone())
                            .with_context(target.clone()),
                    );
                }
            }
        }

        self.add_edges(edges)
    }

    fn is_class_node(&self, id: &str) -> bool {
        self.get_node_index(id)
            .map_or(false, |idx| self.graph[idx].node_type == NodeType::Class)
    }

    fn add_edges(&mut self, edges: Vec<Edge>) -> usize {
        let before = self.graph.edge_count();
        for edge in edges {
            self.add_edge(edge);
        }
        self.graph.edge_count() - before
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
