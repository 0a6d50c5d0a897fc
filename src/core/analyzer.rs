use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::scanner::{FileInfo, FileScanner};
use super::{ClassRegistry, FileExtraction, FileTrees};
use crate::config::AnalysisConfig;
use crate::error::ExtractResult;
use crate::parsers::{common::read_source, ParserFactory};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub classes: usize,
    pub functions: usize,
}

/// Accumulated result of one run over a codebase
#[derive(Debug, Default)]
pub struct Analysis {
    pub root: PathBuf,
    pub files: FileTrees,
    pub classes: ClassRegistry,
    pub stats: AnalysisStats,
}

impl Analysis {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Merge one file's entities. A class declared twice in the same file
    /// keeps its last declaration.
    pub fn insert(&mut self, extraction: FileExtraction) {
        let FileExtraction { file, classes } = extraction;

        for class in classes {
            self.classes.insert(class.key(), class);
        }
        let functions = file.functions.len();
        if let Some(replaced) = self.files.insert(file.path.clone(), file) {
            self.stats.functions -= replaced.functions.len();
        }

        self.stats.files_parsed = self.files.len();
        self.stats.classes = self.classes.len();
        self.stats.functions += functions;
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub struct DirectoryAnalyzer {
    config: AnalysisConfig,
    file_scanner: FileScanner,
    parser_factory: ParserFactory,
}

impl DirectoryAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let file_scanner = FileScanner::new(&config.extensions)
            .with_exclude_dirs(&config.exclude_dirs)
            .with_follow_links(config.follow_links);

        Self {
            config,
            file_scanner,
            parser_factory: ParserFactory::new(),
        }
    }

    /// Walk `root_path` and extract every matching file.
    ///
    /// Files that cannot be read or parsed are logged and left out; only a
    /// root that cannot be walked at all is an error.
    pub fn analyze_directory(&self, root_path: &Path) -> Result<Analysis> {
        let files = self.file_scanner.scan_directory(root_path)?;
        info!("Found {} files to analyze under {}", files.len(), root_path.display());

        let mut analysis = Analysis::new(root_path);
        analysis.stats.files_scanned = files.len();

        if files.is_empty() {
            warn!("No source files found under {}", root_path.display());
            return Ok(analysis);
        }

        // Extraction is independent per file; everything below the join is sequential
        let results: Vec<(&FileInfo, ExtractResult<FileExtraction>)> = if self.config.parallel {
            files
                .par_iter()
                .map(|info| (info, self.extract(root_path, info)))
                .collect()
        } else {
            files
                .iter()
                .map(|info| (info, self.extract(root_path, info)))
                .collect()
        };

        for (info, result) in results {
            match result {
                Ok(extraction) => {
                    debug!(
                        file = %info.path.display(),
                        classes = extraction.classes.len(),
                        functions = extraction.file.functions.len(),
                        "parsed"
                    );
                    analysis.insert(extraction);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", info.path.display(), err);
                    analysis.stats.files_failed += 1;
                }
            }
        }

        info!(
            "Parsed {} files ({} failed), {} classes, {} functions",
            analysis.stats.files_parsed,
            analysis.stats.files_failed,
            analysis.stats.classes,
            analysis.stats.functions
        );

        Ok(analysis)
    }

    /// Extract a single file, labelled by the path exactly as given
    pub fn analyze_file(&self, file_path: &Path) -> ExtractResult<FileExtraction> {
        let language = self
            .file_scanner
            .file_info(file_path)
            .map(|info| info.language)
            .unwrap_or_else(|| "python".to_string());
        self.parser_factory
            .get_parser(&language)?
            .parse_file(file_path)
    }

    fn extract(&self, root_path: &Path, info: &FileInfo) -> ExtractResult<FileExtraction> {
        let parser = self.parser_factory.get_parser(&info.language)?;
        let source = read_source(&info.path)?;
        let label = info.path.strip_prefix(root_path).unwrap_or(&info.path);
        parser.parse_source(label, source)
    }
}
