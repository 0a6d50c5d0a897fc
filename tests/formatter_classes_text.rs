mod common;

use common::analysis_from;
use reqgraph::core::ClassRegistry;
use reqgraph::formatters::ClassesTextFormatter;
use std::path::Path;

const SHAPES: &str = r#"class Shape:
    def area(self) -> float:
        """Surface of the shape.

        Subclasses override this.
        """
        return 0.0


class Square(Shape):
    def __init__(self, side: float):
        self.side = side

    def area(self):
        return square(self.side)


def square(x: float) -> float:
    return x * x
"#;

#[test]
fn empty_registry_renders_sentinel() {
    let formatter = ClassesTextFormatter::new();
    assert_eq!(formatter.format_registry(&ClassRegistry::new()), "Classes: None");
}

#[test]
fn registry_lists_classes_in_key_order() {
    let analysis = analysis_from(&[("shapes.py", SHAPES)]);

    let text = ClassesTextFormatter::new().format_registry(&analysis.classes);

    let expected = "Classes:\n\
        - shapes.py:Shape (name: Shape, file: shapes.py, line: 1)\n\
        \x20 Methods:\n\
        \x20   - area (args: self:Any, returns: float, docstring: Surface of the shape. Subclasses override this.)\n\
        - shapes.py:Square (name: Square, file: shapes.py, line: 10)\n\
        \x20 Inherits: Shape\n\
        \x20 Methods:\n\
        \x20   - __init__ (args: self:Any, side:float, returns: None, docstring: None)\n\
        \x20   - area (args: self:Any, returns: None, docstring: None)\n\
        \x20     Calls: square";
    assert_eq!(text, expected);
}

#[test]
fn file_dump_includes_classes_and_functions() {
    let analysis = analysis_from(&[("shapes.py", SHAPES)]);
    let file = &analysis.files[Path::new("shapes.py")];
    let classes: Vec<_> = analysis.classes.values().collect();

    let text = ClassesTextFormatter::new().format_file(file, &classes);

    assert!(text.starts_with("Class: Shape\nLine: 1\nMethods:\n  area (line 2)\n"));
    assert!(text.contains("Class: Square\nLine: 10\nInherits from: Shape\n"));
    assert!(text.contains("  __init__ (line 11)\n    Args: self: Any, side: float\n"));
    assert!(text.contains("Functions:\n  square (line 18)\n    Args: x: float\n    Returns: float\n"));
}

#[test]
fn file_without_classes_says_so() {
    let analysis = analysis_from(&[("util.py", "def helper():\n    pass\n")]);
    let file = &analysis.files[Path::new("util.py")];

    let text = ClassesTextFormatter::new().format_file(file, &[]);

    assert_eq!(
        text,
        "No classes found in this file.\nFunctions:\n  helper (line 1)\n"
    );
}
