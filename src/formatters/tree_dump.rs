use std::fmt::Write as _;
use tree_sitter::TreeCursor;

use crate::core::SourceFile;

/// Indented dump of a file's named syntax nodes, one per line.
///
/// Each line carries the field name (if any), the node kind, its 1-based
/// start and end positions, and the source text for identifier leaves.
pub struct TreeDumpFormatter {
    indent: usize,
}

impl TreeDumpFormatter {
    pub fn new() -> Self {
        Self { indent: 2 }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn format_file(&self, file: &SourceFile) -> String {
        let mut out = String::new();
        let mut cursor = file.tree.walk();
        self.write_node(&mut cursor, file.source_bytes(), 0, &mut out);
        out
    }

    fn write_node(&self, cursor: &mut TreeCursor, source: &[u8], depth: usize, out: &mut String) {
        let node = cursor.node();
        let mut child_depth = depth;

        if node.is_named() {
            let start = node.start_position();
            let end = node.end_position();
            let _ = write!(out, "{:width$}", "", width = depth * self.indent);
            if let Some(field) = cursor.field_name() {
                let _ = write!(out, "{}: ", field);
            }
            let _ = write!(
                out,
                "{} [{}:{}-{}:{}]",
                node.kind(),
                start.row + 1,
                start.column + 1,
                end.row + 1,
                end.column + 1
            );
            if node.named_child_count() == 0 && node.kind().ends_with("identifier") {
                if let Ok(text) = node.utf8_text(source) {
                    let _ = write!(out, " {:?}", text);
                }
            }
            out.push('\n');
            child_depth += 1;
        }

        if cursor.goto_first_child() {
            loop {
                self.write_node(cursor, source, child_depth, out);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }
}

impl Default for TreeDumpFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::TreeDumpFormatter;
    use crate::parsers::python::PythonParser;
    use crate::parsers::LanguageParser;
    use std::path::Path;

    #[test]
    fn dump_indents_named_nodes_with_fields() {
        let extraction = PythonParser::new()
            .unwrap()
            .parse_source(Path::new("m.py"), "x = f(y)\n".to_string())
            .unwrap();

        let dump = TreeDumpFormatter::new().with_indent(1).format_file(&extraction.file);
        let lines: Vec<&str> = dump.lines().collect();

        assert!(lines[0].starts_with("module [1:1-"));
        assert_eq!(lines[1], " expression_statement [1:1-1:9]");
        assert_eq!(lines[2], "  assignment [1:1-1:9]");
        assert_eq!(lines[3], "   left: identifier [1:1-1:2] \"x\"");
        assert_eq!(lines[4], "   right: call [1:5-1:9]");
        assert_eq!(lines[5], "    function: identifier [1:5-1:6] \"f\"");
    }
}
