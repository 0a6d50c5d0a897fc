use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::error::{ExtractError, ExtractResult};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> ExtractResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| ExtractError::Language(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source`, rejecting trees that contain error or missing nodes
    pub fn parse_source(&mut self, file_path: &Path, source: &str) -> ExtractResult<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::ParseAborted(file_path.to_path_buf()))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(&root)
                .unwrap_or((root.start_position().row, root.start_position().column));
            return Err(ExtractError::Syntax {
                path: file_path.to_path_buf(),
                line: line + 1,
                column: column + 1,
            });
        }

        Ok(tree)
    }
}

/// Buffered read of a whole source file
pub fn read_source(file_path: &Path) -> ExtractResult<String> {
    let io_err = |source| ExtractError::Io {
        path: file_path.to_path_buf(),
        source,
    };

    let file = File::open(file_path).map_err(io_err)?;
    let file_size = file.metadata().map_err(io_err)?.len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content).map_err(io_err)?;
    Ok(content)
}

fn first_error_position(node: &TSNode) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let position = node.start_position();
        return Some((position.row, position.column));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(position) = first_error_position(&child) {
                return Some(position);
            }
        }
    }
    None
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Source text of `node` normalized to one line, `None` when the bytes are
/// not valid UTF-8 or the text is blank
pub fn render_node(node: &TSNode, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    let rendered = normalize_expression(text);
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

/// Collapse whitespace runs to one space, then drop spaces just inside
/// brackets and before commas: `Dict[\n  str,\n  int\n]` becomes `Dict[str, int]`
fn normalize_expression(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();

    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let after_open = matches!(out.chars().last(), Some('[' | '(' | '{'));
            let before_close = matches!(chars.get(i + 1), Some(']' | ')' | '}' | ','));
            if after_open || before_close {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Pre-order walk over `node` and all of its descendants
pub fn walk_preorder<'a, F>(node: TSNode<'a>, visit: &mut F)
where
    F: FnMut(TSNode<'a>),
{
    let mut cursor = node.walk();
    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.node() == node {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Strip quotes and a string prefix from a Python literal and clean its
/// indentation the way docstrings are conventionally presented
pub fn clean_docstring(literal: &str) -> Option<String> {
    let body = literal.trim_start_matches(|c: char| "rRuU".contains(c));
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|quote| {
            body.strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })?;

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first];
    for line in rest {
        let stripped = line.get(indent..).unwrap_or_else(|| line.trim_start());
        cleaned.push(stripped.trim_end().to_string());
    }

    while cleaned.first().map_or(false, |line| line.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().map_or(false, |line| line.is_empty()) {
        cleaned.pop();
    }

    let docstring = cleaned.join("\n");
    (!docstring.is_empty()).then_some(docstring)
}

#[cfg(test)]
mod tests {
    use super::{clean_docstring, normalize_expression};

    #[test]
    fn multi_line_expressions_render_like_single_line_ones() {
        assert_eq!(normalize_expression("Dict[\n    str,\n    int\n]"), "Dict[str, int]");
        assert_eq!(normalize_expression("Tuple[ int , str ]"), "Tuple[int, str]");
        assert_eq!(normalize_expression("Callable[[int], Optional[str]]"), "Callable[[int], Optional[str]]");
        assert_eq!(normalize_expression("Union[\n  A,\n  B,\n]"), "Union[A, B,]");
    }

    #[test]
    fn docstring_indentation_is_cleaned() {
        let literal = "\"\"\"Summary line.\n\n        Details here.\n          indented\n        \"\"\"";
        assert_eq!(
            clean_docstring(literal).as_deref(),
            Some("Summary line.\n\nDetails here.\n  indented")
        );
    }

    #[test]
    fn single_quoted_and_prefixed_literals() {
        assert_eq!(clean_docstring("'short'").as_deref(), Some("short"));
        assert_eq!(clean_docstring("r'''raw'''").as_deref(), Some("raw"));
        assert_eq!(clean_docstring("not a literal"), None);
        // Bytes literals are never docstrings
        assert_eq!(clean_docstring("b'''raw'''"), None);
        assert_eq!(clean_docstring("rb\"raw\""), None);
        assert_eq!(clean_docstring("\"\"\"   \"\"\""), None);
    }
}
