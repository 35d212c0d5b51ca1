//! Output writers - print the declaration tree as source text.

pub mod typescript;

pub use typescript::{FormatOptions, TypeScriptPrinter, print_module};
