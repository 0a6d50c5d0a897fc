pub mod common;
pub mod python;

use std::path::Path;

use crate::core::FileExtraction;
use crate::error::{ExtractError, ExtractResult};

pub trait LanguageParser {
    fn parse_file(&self, file_path: &Path) -> ExtractResult<FileExtraction>;

    /// Extract from content already in memory; `file_path` only labels the result
    fn parse_source(&self, file_path: &Path, source: String) -> ExtractResult<FileExtraction>;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: &str) -> ExtractResult<Box<dyn LanguageParser + Send + Sync>> {
        match language {
            "python" => Ok(Box::new(python::PythonParser::new()?)),
            _ => Err(ExtractError::Language(format!(
                "unsupported language: {language}"
            ))),
        }
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
