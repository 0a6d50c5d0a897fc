use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Knobs for one analysis run, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// File extensions to analyze, without the leading dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
    pub follow_links: bool,
    /// Extract files on the rayon pool before the single-threaded stages
    pub parallel: bool,
    pub resolve_dependencies: bool,
    /// Write one indented syntax tree dump per parsed file next to the other traces
    pub dump_trees: bool,
    pub emit_json: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: ["py", "pyi", "pyw"].map(String::from).to_vec(),
            exclude_dirs: [".git", "__pycache__", ".venv", "venv", "node_modules"]
                .map(String::from)
                .to_vec(),
            follow_links: false,
            parallel: true,
            resolve_dependencies: true,
            dump_trees: false,
            emit_json: false,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
