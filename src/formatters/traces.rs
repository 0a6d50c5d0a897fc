use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use super::{ClassesTextFormatter, GraphTextFormatter, JsonCompactFormatter, TreeDumpFormatter};
use crate::core::ClassEntity;
use crate::AnalysisRun;

pub const GRAPH_DOT_FILE: &str = "methods_graph.dot";
pub const GRAPH_TEXT_FILE: &str = "methods_graph.txt";
pub const GRAPH_JSON_FILE: &str = "methods_graph.json";
pub const STRUCTURE_FILE: &str = "structure.txt";
pub const CLASSES_FILE: &str = "classes.txt";

/// Writes one run's artifacts into a run-specific directory
pub struct TraceWriter {
    run_dir: PathBuf,
    dump_trees: bool,
    emit_json: bool,
}

impl TraceWriter {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
            dump_trees: false,
            emit_json: false,
        }
    }

    pub fn with_tree_dumps(mut self, dump_trees: bool) -> Self {
        self.dump_trees = dump_trees;
        self
    }

    pub fn with_json(mut self, emit_json: bool) -> Self {
        self.emit_json = emit_json;
        self
    }

    /// Write every artifact, returning the paths written
    pub fn write_run(&self, run: &AnalysisRun) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.run_dir)
            .with_context(|| format!("failed to create {}", self.run_dir.display()))?;

        let mut written = Vec::new();
        let graph_text = GraphTextFormatter::new();

        let dot_path = self.run_dir.join(GRAPH_DOT_FILE);
        graph_text.format_to_file(&run.graph, &dot_path)?;
        written.push(dot_path);

        written.push(self.write(GRAPH_TEXT_FILE, &graph_text.format_graph(&run.graph))?);
        written.push(self.write(STRUCTURE_FILE, &graph_text.format_structure(&run.graph))?);
        written.push(self.write(
            CLASSES_FILE,
            &ClassesTextFormatter::new().format_registry(&run.analysis.classes),
        )?);

        if self.emit_json {
            let json_path = self.run_dir.join(GRAPH_JSON_FILE);
            JsonCompactFormatter::detailed().format_to_file(&run.graph, &json_path)?;
            written.push(json_path);
        }

        written.extend(self.write_file_dumps(run)?);

        if run.analysis.is_empty() {
            warn!("No parsed files; per-file traces skipped");
        }
        info!(
            "Wrote {} trace files to {}",
            written.len(),
            self.run_dir.display()
        );
        Ok(written)
    }

    fn write_file_dumps(&self, run: &AnalysisRun) -> Result<Vec<PathBuf>> {
        let mut by_file: BTreeMap<&Path, Vec<&ClassEntity>> = BTreeMap::new();
        for class in run.analysis.classes.values() {
            by_file.entry(class.file.as_path()).or_default().push(class);
        }

        let classes_text = ClassesTextFormatter::new();
        let tree_dump = TreeDumpFormatter::new();
        let mut written = Vec::new();
        let mut used_stems = HashSet::new();

        for (path, file) in &run.analysis.files {
            let stem = unique_stem(artifact_stem(path), &mut used_stems);
            let classes = by_file.get(path.as_path()).map(Vec::as_slice).unwrap_or(&[]);

            written.push(self.write(
                &format!("{stem}_classes.txt"),
                &classes_text.format_file(file, classes),
            )?);

            if self.dump_trees {
                written.push(self.write(&format!("{stem}_tree.txt"), &tree_dump.format_file(file))?);
            }
        }

        Ok(written)
    }

    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.run_dir.join(name);
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Flatten a source path into a file name: `pkg/mod/a.py` becomes `pkg_mod_a_py`
pub fn artifact_stem(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().replace('.', "_")),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        "file".to_string()
    } else {
        parts.join("_")
    }
}

/// `stem`, or `stem_2`, `stem_3`, ... when an earlier file already took it
fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
