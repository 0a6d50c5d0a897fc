use std::fmt::Write as _;

use crate::core::model::{display_path, ANY_TYPE, NONE_TYPE};
use crate::core::{ClassEntity, ClassRegistry, MethodEntity, SourceFile};

pub const EMPTY_REGISTRY: &str = "Classes: None";

/// Flat text renderings of the class registry
pub struct ClassesTextFormatter;

impl ClassesTextFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Whole-registry summary, one class block after another in key order
    pub fn format_registry(&self, classes: &ClassRegistry) -> String {
        if classes.is_empty() {
            return EMPTY_REGISTRY.to_string();
        }

        let mut lines = vec!["Classes:".to_string()];
        for (key, class) in classes {
            lines.push(format!(
                "- {} (name: {}, file: {}, line: {})",
                key,
                class.name,
                display_path(&class.file),
                class.line
            ));
            if !class.bases.is_empty() {
                lines.push(format!("  Inherits: {}", class.bases.join(", ")));
            }
            if class.methods.is_empty() {
                continue;
            }
            lines.push("  Methods:".to_string());
            for method in &class.methods {
                lines.push(format!(
                    "    - {} (args: {}, returns: {}, docstring: {})",
                    method.name,
                    method.rendered_params().join(", "),
                    method.rendered_return_type(),
                    method
                        .docstring
                        .as_deref()
                        .map(single_line)
                        .unwrap_or_else(|| NONE_TYPE.to_string())
                ));
                if !method.calls.is_empty() {
                    lines.push(format!("      Calls: {}", method.calls.join(", ")));
                }
            }
        }
        lines.join("\n")
    }

    /// Human-oriented dump of one file's classes and free functions
    pub fn format_file(&self, file: &SourceFile, classes: &[&ClassEntity]) -> String {
        let mut out = String::new();

        if classes.is_empty() {
            out.push_str("No classes found in this file.\n");
        }

        for class in classes {
            let _ = writeln!(out, "Class: {}", class.name);
            let _ = writeln!(out, "Line: {}", class.line);
            if !class.bases.is_empty() {
                let _ = writeln!(out, "Inherits from: {}", class.bases.join(", "));
            }
            if !class.methods.is_empty() {
                out.push_str("Methods:\n");
                for method in &class.methods {
                    self.write_entity(&mut out, method);
                }
            }
            out.push('\n');
        }

        if !file.functions.is_empty() {
            out.push_str("Functions:\n");
            for function in &file.functions {
                self.write_entity(&mut out, function);
            }
        }

        out
    }

    fn write_entity(&self, out: &mut String, entity: &MethodEntity) {
        let _ = writeln!(out, "  {} (line {})", entity.name, entity.line);
        if !entity.params.is_empty() {
            let args: Vec<String> = entity
                .params
                .iter()
                .map(|param| {
                    format!(
                        "{}: {}",
                        param.name,
                        param.type_annotation.as_deref().unwrap_or(ANY_TYPE)
                    )
                })
                .collect();
            let _ = writeln!(out, "    Args: {}", args.join(", "));
        }
        if let Some(return_type) = &entity.return_type {
            let _ = writeln!(out, "    Returns: {}", return_type);
        }
        if let Some(docstring) = &entity.docstring {
            let _ = writeln!(out, "    Docstring: {}", single_line(docstring));
        }
        if !entity.calls.is_empty() {
            let _ = writeln!(out, "    Calls: {}", entity.calls.join(", "));
        }
    }
}

impl Default for ClassesTextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
