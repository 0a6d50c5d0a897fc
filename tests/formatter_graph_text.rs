mod common;

use common::analysis_from;
use reqgraph::core::graph::{Edge, EdgeType, GraphBuilder, Node, NodeType};
use reqgraph::core::resolve_dependencies;
use reqgraph::formatters::GraphTextFormatter;
use std::path::PathBuf;

fn method_node(id: &str, name: &str, return_type: &str) -> Node {
    Node {
        id: id.to_string(),
        name: name.to_string(),
        node_type: NodeType::Method,
        class_name: Some("ClassA".to_string()),
        file_path: PathBuf::from("file1.py"),
        line_number: 1,
        args: Vec::new(),
        return_type: return_type.to_string(),
        docstring: None,
        calls: Vec::new(),
    }
}

fn two_node_graph() -> reqgraph::core::MethodGraph {
    let mut gb = GraphBuilder::new();
    gb.add_node(method_node("method1", "method1", "int"));
    gb.add_node(method_node("method2", "method2", "str"));
    gb.add_edge(Edge::new(
        EdgeType::Call,
        "method1".to_string(),
        "method2".to_string(),
    ));
    gb.build()
}

#[test]
fn graph_text_lists_nodes_and_outgoing_edges() {
    let text = GraphTextFormatter::new().format_graph(&two_node_graph());

    let expected = "Method Graph:\n\
        - method1 (name: method1, class: ClassA, file: file1.py, args: , returns: int)\n\
        \x20 -> calls: method2\n\
        - method2 (name: method2, class: ClassA, file: file1.py, args: , returns: str)";
    assert_eq!(text, expected);
}

#[test]
fn empty_graph_renders_sentinel() {
    let graph = GraphBuilder::new().build();
    assert_eq!(
        GraphTextFormatter::new().format_graph(&graph),
        "Method Graph: Empty"
    );
}

#[test]
fn missing_annotations_render_placeholders() {
    let analysis = analysis_from(&[("a.py", "class A:\n    def f(self, x):\n        pass\n")]);
    let graph = GraphBuilder::build_method_graph(&analysis.files, &analysis.classes, None);

    let text = GraphTextFormatter::new().format_graph(&graph);
    assert!(text.contains("args: self:Any, x:Any, returns: None)"));
}

#[test]
fn dot_output_marks_edge_types() {
    let dot = GraphTextFormatter::new().format_dot(&two_node_graph());

    assert!(dot.starts_with("digraph MethodGraph {\n"));
    assert!(dot.contains(
        "    \"method1\" [label=\"method1 (ClassA)\\nArgs: \\nReturns: int\", shape=box];\n"
    ));
    assert!(dot.contains("    \"method1\" -> \"method2\" [style=\"dashed\"];\n"));
    assert!(dot.ends_with("}\n"));
}

#[test]
fn structure_lists_classes_and_dependencies() {
    let analysis = analysis_from(&[
        ("file1.py", "class A:\n    def foo(self):\n        pass\n"),
        (
            "file2.py",
            "from file1 import A\n\nclass B(A):\n    def foo(self):\n        pass\n\n    def bar(self):\n        pass\n",
        ),
    ]);
    let deps = resolve_dependencies(&analysis.files, &analysis.classes);
    let graph = GraphBuilder::build_method_graph(&analysis.files, &analysis.classes, Some(&deps));

    let formatter = GraphTextFormatter::new();
    let structure = formatter.format_structure(&graph);
    assert_eq!(
        structure,
        "Codebase Structure:\n\
         Class: A (File: file1.py)\n  Methods: foo\n\
         Class: B (File: file2.py)\n  Methods: foo, bar\n\
         \nDependencies:\n\
         B (file2.py) depends on A (file1.py)"
    );

    let text = formatter.format_graph(&graph);
    assert!(text.contains("- file2.py:B (class: B, file: file2.py, line: 3)\n  -> depends on: file1.py:A"));
    assert!(text.contains("  -> overrides: file1.py:A:foo"));

    let dot = formatter.format_dot(&graph);
    assert!(dot.contains("\"file2.py:B\" -> \"file1.py:A\" [style=\"bold\"];"));
    assert!(dot.contains("\"file2.py:B:foo\" -> \"file1.py:A:foo\" [style=\"dotted\"];"));
}

#[test]
fn structure_groups_methods_by_class_and_file() {
    let analysis = analysis_from(&[
        ("a.py", "class Same:\n    def one(self):\n        pass\n\n    def two(self):\n        pass\n"),
        ("b.py", "class Same:\n    def three(self):\n        pass\n"),
    ]);
    let graph = GraphBuilder::build_method_graph(&analysis.files, &analysis.classes, None);

    assert_eq!(
        GraphTextFormatter::new().format_structure(&graph),
        "Codebase Structure:\n\
         Class: Same (File: a.py)\n  Methods: one, two\n\
         Class: Same (File: b.py)\n  Methods: three\n\
         \nDependencies:"
    );
}
