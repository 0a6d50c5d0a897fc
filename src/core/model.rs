use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

/// Placeholder rendered for a parameter without a usable annotation
pub const ANY_TYPE: &str = "Any";

/// Placeholder rendered for a missing return annotation or docstring
pub const NONE_TYPE: &str = "None";

/// Canonical identifier of a class: names alone are not unique across files
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassKey {
    pub file: PathBuf,
    pub name: String,
}

impl ClassKey {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_annotation: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation,
        }
    }

    /// `name:type`, with `Any` standing in for a missing annotation
    pub fn render(&self) -> String {
        format!(
            "{}:{}",
            self.name,
            self.type_annotation.as_deref().unwrap_or(ANY_TYPE)
        )
    }
}

/// A method or a free function.
///
/// `calls` holds the textual callee names found in the body, in source
/// order. They are never verified against a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntity {
    pub name: String,
    pub line: usize,
    pub params: Vec<Parameter>,
    pub return_type: Option<String>,
    pub docstring: Option<String>,
    pub calls: Vec<String>,
}

impl MethodEntity {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            params: Vec::new(),
            return_type: None,
            docstring: None,
            calls: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.params = params;
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    pub fn with_calls<I, S>(mut self, calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls = calls.into_iter().map(Into::into).collect();
        self
    }

    pub fn rendered_params(&self) -> Vec<String> {
        self.params.iter().map(Parameter::render).collect()
    }

    pub fn rendered_return_type(&self) -> String {
        self.return_type
            .clone()
            .unwrap_or_else(|| NONE_TYPE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntity {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
    pub bases: Vec<String>,
    pub methods: Vec<MethodEntity>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
            bases: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_method(mut self, method: MethodEntity) -> Self {
        self.methods.push(method);
        self
    }

    pub fn key(&self) -> ClassKey {
        ClassKey::new(self.file.clone(), self.name.clone())
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntity> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// One successfully parsed file.
///
/// Owns the syntax tree together with the source it was parsed from,
/// since tree-sitter nodes only carry byte ranges.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
    pub imports: BTreeSet<String>,
    pub functions: Vec<MethodEntity>,
}

impl SourceFile {
    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn has_import(&self, name: &str) -> bool {
        self.imports.contains(name)
    }
}

/// Everything a single file contributes to an analysis run
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub file: SourceFile,
    pub classes: Vec<ClassEntity>,
}

pub type FileTrees = BTreeMap<PathBuf, SourceFile>;

pub type ClassRegistry = BTreeMap<ClassKey, ClassEntity>;

pub type DependencyMap = BTreeMap<ClassKey, BTreeSet<String>>;

/// Display form of a path used inside node ids and textual artifacts
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
