use std::collections::BTreeSet;
use tracing::{debug, info};

use super::{ClassEntity, ClassKey, ClassRegistry, DependencyMap, FileTrees};

/// Name-based resolution of where each class's bases come from.
///
/// A base named `Base` contributes the bare `Base` when the class's file
/// imports that name, and independently `file:Base` for every class called
/// `Base` declared in another file. Neither form subsumes the other.
/// Aliases and re-exports are not followed.
pub struct DependencyResolver<'a> {
    files: &'a FileTrees,
    classes: &'a ClassRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(files: &'a FileTrees, classes: &'a ClassRegistry) -> Self {
        Self { files, classes }
    }

    pub fn resolve(&self) -> DependencyMap {
        let dependencies: DependencyMap = self
            .classes
            .iter()
            .map(|(key, class)| (key.clone(), self.resolve_class(key, class)))
            .collect();

        let resolved = dependencies.values().map(BTreeSet::len).sum::<usize>();
        info!(
            "Resolved {} dependencies across {} classes",
            resolved,
            dependencies.len()
        );
        dependencies
    }

    fn resolve_class(&self, key: &ClassKey, class: &ClassEntity) -> BTreeSet<String> {
        let mut dependencies = BTreeSet::new();

        for base in &class.bases {
            let imported = self
                .files
                .get(&key.file)
                .map_or(false, |file| file.has_import(base));
            if imported {
                dependencies.insert(base.clone());
            }

            for other in self.defined_elsewhere(base, key) {
                dependencies.insert(other.to_string());
            }
        }

        if !dependencies.is_empty() {
            debug!(class = %key, ?dependencies, "resolved bases");
        }
        dependencies
    }

    fn defined_elsewhere<'b>(
        &'b self,
        base: &'b str,
        key: &'b ClassKey,
    ) -> impl Iterator<Item = &'a ClassKey> + 'b {
        self.classes
            .keys()
            .filter(move |other| other.name == base && other.file != key.file)
    }
}

pub fn resolve_dependencies(files: &FileTrees, classes: &ClassRegistry) -> DependencyMap {
    DependencyResolver::new(files, classes).resolve()
}
