#![allow(dead_code)]

use reqgraph::core::Analysis;
use reqgraph::parsers::python::PythonParser;
use reqgraph::parsers::LanguageParser;
use std::fs;
use std::path::Path;

/// Build an analysis from in-memory `(path, source)` pairs
pub fn analysis_from(files: &[(&str, &str)]) -> Analysis {
    let parser = PythonParser::new().unwrap();
    let mut analysis = Analysis::new("mem");
    for (path, source) in files {
        let extraction = parser
            .parse_source(Path::new(path), source.to_string())
            .unwrap();
        analysis.insert(extraction);
    }
    analysis
}

/// Write `(relative path, source)` pairs under `root`
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, source) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, source).unwrap();
    }
}
