use std::path::PathBuf;
use thiserror::Error;

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Reasons a single file is excluded from an analysis run
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in {path} at line {line}, column {column}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("failed to load grammar: {0}")]
    Language(String),

    #[error("parser produced no tree for {0}")]
    ParseAborted(PathBuf),
}

impl ExtractError {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ExtractError::Io { path, .. } | ExtractError::Syntax { path, .. } => Some(path),
            ExtractError::ParseAborted(path) => Some(path),
            ExtractError::Language(_) => None,
        }
    }
}
