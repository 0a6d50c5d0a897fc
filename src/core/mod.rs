pub mod analyzer;
pub mod dependencies;
pub mod graph;
pub mod model;
pub mod scanner;

pub use analyzer::{Analysis, AnalysisStats, DirectoryAnalyzer};
pub use dependencies::{resolve_dependencies, DependencyResolver};
pub use graph::{Edge, EdgeType, GraphBuilder, MethodGraph, Node, NodeType};
pub use model::{
    ClassEntity, ClassKey, ClassRegistry, DependencyMap, FileExtraction, FileTrees, MethodEntity,
    Parameter, SourceFile,
};
pub use scanner::FileScanner;
