pub mod classes_text;
pub mod graph_text;
pub mod json_compact;
pub mod traces;
pub mod tree_dump;

pub use classes_text::ClassesTextFormatter;
pub use graph_text::GraphTextFormatter;
pub use json_compact::JsonCompactFormatter;
pub use traces::TraceWriter;
pub use tree_dump::TreeDumpFormatter;
