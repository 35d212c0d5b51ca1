//! Input readers - parse declaration source into the tree.

#[cfg(feature = "read-typescript")]
pub mod typescript;

#[cfg(feature = "read-typescript")]
pub use typescript::read_typescript;

/// Error that can occur when reading declaration source into the tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parser initialization failed: {0}")]
    Init(String),

    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}
