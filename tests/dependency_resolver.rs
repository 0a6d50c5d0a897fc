mod common;

use common::analysis_from;
use reqgraph::core::{resolve_dependencies, ClassKey};
use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn imported_and_defined_base_yields_two_entries() {
    let analysis = analysis_from(&[
        ("file1.py", "class A:\n    pass\n"),
        ("file2.py", "from file1 import A\n\nclass B(A):\n    pass\n"),
    ]);

    let deps = resolve_dependencies(&analysis.files, &analysis.classes);

    assert_eq!(
        deps[&ClassKey::new("file2.py", "B")],
        set(&["A", "file1.py:A"])
    );
    assert!(deps[&ClassKey::new("file1.py", "A")].is_empty());
}

#[test]
fn base_sources_are_resolved_independently() {
    let analysis = analysis_from(&[
        ("lib_user.py", "from lib import Base\n\nclass C(Base):\n    pass\n"),
        ("models.py", "class Model:\n    pass\n"),
        ("views.py", "class View(Model, Unknown):\n    pass\n"),
    ]);

    let deps = resolve_dependencies(&analysis.files, &analysis.classes);

    // Imported but declared nowhere
    assert_eq!(deps[&ClassKey::new("lib_user.py", "C")], set(&["Base"]));
    // Declared elsewhere but never imported; `Unknown` resolves to nothing
    assert_eq!(
        deps[&ClassKey::new("views.py", "View")],
        set(&["models.py:Model"])
    );
}

#[test]
fn same_file_bases_are_not_qualified_dependencies() {
    let analysis = analysis_from(&[(
        "file1.py",
        "class A:\n    pass\n\nclass E(A):\n    pass\n",
    )]);

    let deps = resolve_dependencies(&analysis.files, &analysis.classes);
    assert!(deps[&ClassKey::new("file1.py", "E")].is_empty());
}

#[test]
fn every_class_with_the_base_name_elsewhere_is_listed() {
    let analysis = analysis_from(&[
        ("a.py", "class Base:\n    pass\n"),
        ("b.py", "class Base:\n    pass\n"),
        ("c.py", "class Child(Base):\n    pass\n"),
    ]);

    let deps = resolve_dependencies(&analysis.files, &analysis.classes);
    assert_eq!(
        deps[&ClassKey::new("c.py", "Child")],
        set(&["a.py:Base", "b.py:Base"])
    );
    assert_eq!(deps.len(), 3);
}
