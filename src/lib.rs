//! # REQGRAPH
//!
//! Static structural analysis of Python codebases.
//!
//! REQGRAPH parses every source file under a root into classes, methods and
//! free functions, resolves where class bases come from, and assembles a
//! directed graph of call, override and dependency relationships. The graph
//! and the class registry are rendered as plain-text traces meant to be fed
//! to a language model that writes the business-requirements summary.
//!
//! ## Pipeline
//!
//! 1. [`core::DirectoryAnalyzer`] walks the tree and extracts entities
//! 2. [`core::DependencyResolver`] maps class bases to imports and classes
//! 3. [`core::GraphBuilder`] builds the [`core::MethodGraph`]
//! 4. [`formatters`] render the graph, the registry and the raw trees
//!
//! Resolution is purely name-based. Edges are hints, not proofs.

pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod parsers;

use anyhow::Result;
use std::path::Path;

use crate::config::AnalysisConfig;
use crate::core::{Analysis, DependencyMap, DirectoryAnalyzer, GraphBuilder, MethodGraph};

/// Everything one run produces for downstream consumers
#[derive(Debug)]
pub struct AnalysisRun {
    pub analysis: Analysis,
    pub dependencies: Option<DependencyMap>,
    pub graph: MethodGraph,
}

/// Analyze `root_path` end to end with a fresh analyzer and graph
pub fn run_analysis(root_path: &Path, config: &AnalysisConfig) -> Result<AnalysisRun> {
    let analyzer = DirectoryAnalyzer::new(config.clone());
    let analysis = analyzer.analyze_directory(root_path)?;

    let dependencies = config
        .resolve_dependencies
        .then(|| core::resolve_dependencies(&analysis.files, &analysis.classes));

    let graph =
        GraphBuilder::build_method_graph(&analysis.files, &analysis.classes, dependencies.as_ref());

    Ok(AnalysisRun {
        analysis,
        dependencies,
        graph,
    })
}
