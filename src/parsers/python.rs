use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node as TSNode, Tree};

use super::common::{
    clean_docstring, extract_text, read_source, render_node, walk_preorder, TreeSitterParser,
};
use super::LanguageParser;
use crate::core::{ClassEntity, FileExtraction, MethodEntity, Parameter, SourceFile};
use crate::error::ExtractResult;

/// Syntax node kinds the extractor cares about
#[derive(Debug, Clone, Copy)]
enum PySyntax<'a> {
    Class(TSNode<'a>),
    Function(TSNode<'a>),
    Decorated(TSNode<'a>),
    Call(TSNode<'a>),
    Import(TSNode<'a>),
    ImportFrom(TSNode<'a>),
    Other,
}

impl<'a> PySyntax<'a> {
    fn classify(node: TSNode<'a>) -> Self {
        match node.kind() {
            "class_definition" => PySyntax::Class(node),
            "function_definition" => PySyntax::Function(node),
            "decorated_definition" => PySyntax::Decorated(node),
            "call" => PySyntax::Call(node),
            "import_statement" => PySyntax::Import(node),
            "import_from_statement" => PySyntax::ImportFrom(node),
            _ => PySyntax::Other,
        }
    }

    /// The function a definition statement declares, looking through decorators
    fn function(self) -> Option<TSNode<'a>> {
        match self {
            PySyntax::Function(node) => Some(node),
            PySyntax::Decorated(node) => node
                .child_by_field_name("definition")
                .filter(|definition| definition.kind() == "function_definition"),
            PySyntax::Class(_)
            | PySyntax::Call(_)
            | PySyntax::Import(_)
            | PySyntax::ImportFrom(_)
            | PySyntax::Other => None,
        }
    }
}

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> ExtractResult<Self> {
        // Fail early if the grammar and the runtime disagree on ABI version
        TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self)
    }

    fn extract_declarations(
        &self,
        root: TSNode,
        source: &[u8],
        file_path: &Path,
    ) -> (Vec<ClassEntity>, BTreeSet<String>) {
        let mut classes = Vec::new();
        let mut imports = BTreeSet::new();

        walk_preorder(root, &mut |node| match PySyntax::classify(node) {
            PySyntax::Class(class_node) => {
                if let Some(class) = self.process_class(&class_node, source, file_path) {
                    classes.push(class);
                }
            }
            PySyntax::Import(import_node) | PySyntax::ImportFrom(import_node) => {
                self.process_import(&import_node, source, &mut imports);
            }
            PySyntax::Function(_) | PySyntax::Decorated(_) | PySyntax::Call(_) | PySyntax::Other => {}
        });

        (classes, imports)
    }

    fn process_import(&self, import_node: &TSNode, source: &[u8], imports: &mut BTreeSet<String>) {
        // `from m import *` has no `name` field and binds nothing we can see
        let mut cursor = import_node.walk();
        for name in import_node.children_by_field_name("name", &mut cursor) {
            let bound = match name.kind() {
                "aliased_import" => name.child_by_field_name("alias"),
                _ => Some(name),
            };
            if let Some(bound) = bound.and_then(|node| render_node(&node, source)) {
                imports.insert(bound);
            }
        }
    }

    fn process_class(
        &self,
        class_node: &TSNode,
        source: &[u8],
        file_path: &Path,
    ) -> Option<ClassEntity> {
        let name_node = class_node.child_by_field_name("name")?;
        let class_name = extract_text(&name_node, source);
        if class_name.is_empty() {
            return None;
        }
        let line_number = class_node.start_position().row + 1;

        let mut class = ClassEntity::new(class_name, file_path, line_number)
            .with_bases(self.extract_bases(class_node, source));

        if let Some(body) = class_node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if let Some(func_node) = PySyntax::classify(child).function() {
                    if let Some(method) = self.process_function(&func_node, source) {
                        class = class.with_method(method);
                    }
                }
            }
        }

        debug!(
            class = class_name,
            file = %file_path.display(),
            methods = class.methods.len(),
            "extracted class"
        );
        Some(class)
    }

    fn extract_bases(&self, class_node: &TSNode, source: &[u8]) -> Vec<String> {
        let Some(superclasses) = class_node.child_by_field_name("superclasses") else {
            return Vec::new();
        };

        let mut cursor = superclasses.walk();
        let bases = superclasses
            .named_children(&mut cursor)
            .filter(|arg| !matches!(arg.kind(), "keyword_argument" | "comment"))
            .filter_map(|arg| render_node(&arg, source))
            .collect();
        bases
    }

    fn extract_functions(&self, root: &TSNode, source: &[u8]) -> Vec<MethodEntity> {
        let mut cursor = root.walk();
        let functions = root
            .named_children(&mut cursor)
            .filter_map(|child| PySyntax::classify(child).function())
            .filter_map(|func_node| self.process_function(&func_node, source))
            .collect();
        functions
    }

    fn process_function(&self, func_node: &TSNode, source: &[u8]) -> Option<MethodEntity> {
        let name_node = func_node.child_by_field_name("name")?;
        let func_name = extract_text(&name_node, source);
        if func_name.is_empty() {
            return None;
        }
        let line_number = func_node.start_position().row + 1;

        let params = func_node
            .child_by_field_name("parameters")
            .map(|params| self.extract_parameters(&params, source))
            .unwrap_or_default();

        let mut method = MethodEntity::new(func_name, line_number)
            .with_params(params)
            .with_calls(self.extract_calls(func_node, source));

        if let Some(return_type) = func_node
            .child_by_field_name("return_type")
            .and_then(|node| render_node(&node, source))
        {
            method = method.with_return_type(return_type);
        }

        if let Some(docstring) = func_node
            .child_by_field_name("body")
            .and_then(|body| self.extract_docstring(&body, source))
        {
            method = method.with_docstring(docstring);
        }

        Some(method)
    }

    fn extract_parameters(&self, params: &TSNode, source: &[u8]) -> Vec<Parameter> {
        let annotation = |param: &TSNode| {
            param
                .child_by_field_name("type")
                .and_then(|ty| render_node(&ty, source))
        };

        let mut cursor = params.walk();
        let parameters = params
            .named_children(&mut cursor)
            .filter_map(|param| match param.kind() {
                "identifier" => Some(Parameter::new(extract_text(&param, source), None)),
                "typed_parameter" => {
                    // `*args: int` wraps a splat pattern instead of a name
                    let name = param.named_child(0).filter(|n| n.kind() == "identifier")?;
                    Some(Parameter::new(extract_text(&name, source), annotation(&param)))
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = param
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")?;
                    Some(Parameter::new(extract_text(&name, source), annotation(&param)))
                }
                _ => None,
            })
            .filter(|param| !param.name.is_empty())
            .collect();
        parameters
    }

    fn extract_docstring(&self, body: &TSNode, source: &[u8]) -> Option<String> {
        let mut cursor = body.walk();
        let first_statement = body
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment")?;

        if first_statement.kind() != "expression_statement" || first_statement.named_child_count() != 1
        {
            return None;
        }
        let literal = first_statement.named_child(0).filter(|n| n.kind() == "string")?;
        clean_docstring(literal.utf8_text(source).ok()?)
    }

    /// Callee names in pre-order: `f()` yields `f`, `obj.m()` yields `m`
    fn extract_calls(&self, func_node: &TSNode, source: &[u8]) -> Vec<String> {
        let mut calls = Vec::new();

        walk_preorder(*func_node, &mut |node| {
            let PySyntax::Call(call) = PySyntax::classify(node) else {
                return;
            };
            let Some(callee) = call.child_by_field_name("function") else {
                return;
            };
            let name = match callee.kind() {
                "identifier" => Some(callee),
                "attribute" => callee.child_by_field_name("attribute"),
                _ => None,
            };
            if let Some(name) = name.map(|n| extract_text(&n, source)) {
                if !name.is_empty() {
                    calls.push(name.to_string());
                }
            }
        });

        calls
    }

    /// Names of every class declared in `tree`, in pre-order
    pub fn declared_class_names(tree: &Tree, source: &[u8]) -> Vec<String> {
        let mut names = Vec::new();
        walk_preorder(tree.root_node(), &mut |node| {
            if let PySyntax::Class(class_node) = PySyntax::classify(node) {
                if let Some(name) = class_node.child_by_field_name("name") {
                    names.push(extract_text(&name, source).to_string());
                }
            }
        });
        names
    }
}

impl LanguageParser for PythonParser {
    fn parse_file(&self, file_path: &Path) -> ExtractResult<FileExtraction> {
        let source = read_source(file_path)?;
        self.parse_source(file_path, source)
    }

    fn parse_source(&self, file_path: &Path, source: String) -> ExtractResult<FileExtraction> {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse_source(file_path, &source)?;

        let source_bytes = source.as_bytes();
        let root = tree.root_node();

        let (classes, imports) = self.extract_declarations(root, source_bytes, file_path);
        let functions = self.extract_functions(&root, source_bytes);

        Ok(FileExtraction {
            file: SourceFile {
                path: file_path.to_path_buf(),
                source,
                tree,
                imports,
                functions,
            },
            classes,
        })
    }
}
