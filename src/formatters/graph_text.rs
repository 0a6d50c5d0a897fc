use anyhow::{Context, Result};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::model::display_path;
use crate::core::{EdgeType, MethodGraph, Node, NodeType};

pub const EMPTY_GRAPH: &str = "Method Graph: Empty";

/// Plain-text and DOT renderings of a method graph
pub struct GraphTextFormatter;

impl GraphTextFormatter {
    pub fn new() -> Self {
        Self
    }

    /// One entry per node followed by its outgoing edges grouped by type
    pub fn format_graph(&self, graph: &MethodGraph) -> String {
        if graph.node_count() == 0 {
            return EMPTY_GRAPH.to_string();
        }

        let mut lines = vec!["Method Graph:".to_string()];
        for idx in graph.node_indices() {
            let node = &graph[idx];
            lines.push(self.node_line(node));

            let outgoing = outgoing_by_type(graph, idx);
            for (edge_type, label) in [
                (EdgeType::Call, "calls"),
                (EdgeType::Overrides, "overrides"),
                (EdgeType::Dependency, "depends on"),
            ] {
                let targets: Vec<&str> = outgoing
                    .iter()
                    .filter(|(ty, _)| *ty == edge_type)
                    .map(|(_, target)| target.as_str())
                    .collect();
                if !targets.is_empty() {
                    lines.push(format!("  -> {}: {}", label, targets.join(", ")));
                }
            }
        }
        lines.join("\n")
    }

    fn node_line(&self, node: &Node) -> String {
        match node.node_type {
            NodeType::Method | NodeType::Function => format!(
                "- {} (name: {}, class: {}, file: {}, args: {}, returns: {})",
                node.id,
                node.name,
                node.class_name.as_deref().unwrap_or("None"),
                display_path(&node.file_path),
                node.args.join(", "),
                node.return_type
            ),
            NodeType::Class => format!(
                "- {} (class: {}, file: {}, line: {})",
                node.id,
                node.name,
                display_path(&node.file_path),
                node.line_number
            ),
        }
    }

    /// Graphviz description: call edges dashed, overrides dotted, dependencies bold
    pub fn format_dot(&self, graph: &MethodGraph) -> String {
        let mut out = String::from("digraph MethodGraph {\n");

        for node in graph.node_weights() {
            let (label, shape) = match node.node_type {
                NodeType::Method | NodeType::Function => {
                    let title = match &node.class_name {
                        Some(class_name) => format!("{} ({})", node.name, class_name),
                        None => node.name.clone(),
                    };
                    (
                        format!(
                            "{}\\nArgs: {}\\nReturns: {}",
                            escape_dot(&title),
                            escape_dot(&node.args.join(", ")),
                            escape_dot(&node.return_type)
                        ),
                        "box",
                    )
                }
                NodeType::Class => (escape_dot(&node.name), "ellipse"),
            };
            let _ = writeln!(
                out,
                "    \"{}\" [label=\"{}\", shape={}];",
                escape_dot(&node.id),
                label,
                shape
            );
        }

        for edge in graph.edge_references() {
            let style = match edge.weight().edge_type {
                EdgeType::Call => "dashed",
                EdgeType::Overrides => "dotted",
                EdgeType::Dependency => "bold",
            };
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\" [style=\"{}\"];",
                escape_dot(&graph[edge.source()].id),
                escape_dot(&graph[edge.target()].id),
                style
            );
        }

        out.push_str("}\n");
        out
    }

    /// Class-level overview: each class with its methods, then the
    /// dependency edges between classes
    pub fn format_structure(&self, graph: &MethodGraph) -> String {
        let mut output = vec!["Codebase Structure:".to_string()];

        // First-seen order, indexed by (class, file)
        let mut classes: Vec<(String, String, Vec<&str>)> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();
        for node in graph.node_weights() {
            let Some(class_name) = &node.class_name else {
                continue;
            };
            let file = display_path(&node.file_path);
            let pos = *positions
                .entry((class_name.clone(), file.clone()))
                .or_insert_with(|| {
                    classes.push((class_name.clone(), file, Vec::new()));
                    classes.len() - 1
                });
            if node.node_type == NodeType::Method {
                classes[pos].2.push(node.name.as_str());
            }
        }

        for (name, file, methods) in &classes {
            output.push(format!("Class: {} (File: {})", name, file));
            if !methods.is_empty() {
                output.push(format!("  Methods: {}", methods.join(", ")));
            }
        }

        output.push("\nDependencies:".to_string());
        for edge in graph.edge_references() {
            if edge.weight().edge_type != EdgeType::Dependency {
                continue;
            }
            let source = &graph[edge.source()];
            let target = &graph[edge.target()];
            output.push(format!(
                "{} ({}) depends on {} ({})",
                source.name,
                display_path(&source.file_path),
                target.name,
                display_path(&target.file_path)
            ));
        }

        output.join("\n")
    }

    pub fn format_to_file(&self, graph: &MethodGraph, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_dot(graph))
            .with_context(|| format!("failed to write {}", output_path.display()))
    }
}

impl Default for GraphTextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Outgoing edges of `idx` as (type, target id), in insertion order
fn outgoing_by_type(graph: &MethodGraph, idx: NodeIndex) -> Vec<(EdgeType, String)> {
    let mut edges: Vec<_> = graph.edges(idx).collect();
    edges.sort_by_key(|edge| edge.id());
    edges
        .into_iter()
        .map(|edge| (edge.weight().edge_type, graph[edge.target()].id.clone()))
        .collect()
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
