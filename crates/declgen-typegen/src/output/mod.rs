//! Output backends for code generation.
//!
//! Backends take an IR [`Schema`](crate::ir::Schema) and produce source text.

pub mod typescript;

pub use typescript::{TypeScriptOptions, generate_typescript_types};
