//! TypeScript declaration trees for generated type packages.
//!
//! `declgen-syntax` reads generated `.d.ts`-style source into a closed
//! declaration tree, rewrites away schema-compiler artifacts, and prints the
//! result back in a consistent style.
//!
//! # Architecture
//!
//! ```text
//!   source text ──> input::read_typescript ──> ast::Module
//!                                                  │
//!                               transform::transform (3 rewrites)
//!                                                  │
//!   source text <── output::print_module  <── ast::Module
//! ```
//!
//! # Example
//!
//! ```
//! use declgen_syntax::{FormatOptions, print_module, read_typescript, transform};
//!
//! let source = r#"export type Mode = ("a" | "b") & string;"#;
//! let module = transform(read_typescript(source).unwrap()).unwrap();
//! let out = print_module(&module, &FormatOptions::default());
//! assert_eq!(out, "export type Mode = \"a\" | \"b\";\n");
//! ```

pub mod ast;
pub mod input;
pub mod output;
pub mod transform;

pub use ast::{Keyword, Module, TypeNode};
pub use input::ReadError;
#[cfg(feature = "read-typescript")]
pub use input::read_typescript;
pub use output::{FormatOptions, print_module};
pub use transform::{Rewrite, TransformError, transform};
