use anyhow::{Context, Result};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{EdgeType, MethodGraph, NodeType};

/// JSON rendering of the method graph with file paths and ids interned
pub struct JsonCompactFormatter {
    /// Include full metadata or just essential information
    minimal: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { minimal: true }
    }

    pub fn detailed() -> Self {
        Self { minimal: false }
    }

    pub fn format_to_file(&self, graph: &MethodGraph, output_path: &Path) -> Result<()> {
        let json_content = self.format_graph(graph)?;
        fs::write(output_path, json_content)
            .with_context(|| format!("failed to write {}", output_path.display()))
    }

    pub fn format_graph(&self, graph: &MethodGraph) -> Result<String> {
        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();

        let mut nodes = Vec::with_capacity(node_indices.len());
        let mut node_id_map = HashMap::new();
        let mut file_map: HashMap<String, usize> = HashMap::new();
        let mut files: Vec<String> = Vec::new();

        for (position, &idx) in node_indices.iter().enumerate() {
            let node = &graph[idx];
            node_id_map.insert(idx, position);

            let path = node.file_path.to_string_lossy().to_string();
            let file_id = *file_map.entry(path.clone()).or_insert_with(|| {
                files.push(path);
                files.len() - 1
            });

            let mut node_json = json!({
                "n": node.name,
                "t": self.type_code(node.node_type),
                "f": file_id,
                "l": node.line_number
            });

            if !self.minimal {
                node_json["id"] = json!(node.id);
                node_json["class"] = json!(node.class_name);
                if node.node_type != NodeType::Class {
                    node_json["args"] = json!(node.args);
                    node_json["ret"] = json!(node.return_type);
                }
                if let Some(ref doc) = node.docstring {
                    node_json["doc"] = json!(doc);
                }
            }

            nodes.push(node_json);
        }

        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge_ref in graph.edge_references() {
            let (Some(&src_id), Some(&tgt_id)) = (
                node_id_map.get(&edge_ref.source()),
                node_id_map.get(&edge_ref.target()),
            ) else {
                continue;
            };

            let edge_json = if self.minimal {
                json!([src_id, tgt_id, self.edge_code(edge_ref.weight().edge_type)])
            } else {
                json!({
                    "src": src_id,
                    "tgt": tgt_id,
                    "type": self.edge_code(edge_ref.weight().edge_type),
                    "ctx": edge_ref.weight().context
                })
            };
            edges.push(edge_json);
        }

        let output = json!({
            "meta": {
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "format": if self.minimal { "compact" } else { "detailed" }
            },
            "files": files,
            "nodes": nodes,
            "edges": edges
        });

        Ok(serde_json::to_string(&output)?)
    }

    fn type_code(&self, node_type: NodeType) -> u8 {
        match node_type {
            NodeType::Method => 1,
            NodeType::Function => 2,
            NodeType::Class => 3,
        }
    }

    fn edge_code(&self, edge_type: EdgeType) -> u8 {
        match edge_type {
            EdgeType::Call => 1,
            EdgeType::Overrides => 2,
            EdgeType::Dependency => 3,
        }
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}
