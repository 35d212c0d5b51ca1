//! Regenerate a TypeScript declaration package from a hosted JSON Schema.
//!
//! A run fetches the schema, skips everything if its fingerprint matches the
//! last generated one, and otherwise compiles it with [`declgen_typegen`],
//! strips compiler artifacts with [`declgen_syntax`], writes the module, and
//! optionally publishes it.

pub mod config;
pub mod fetch;
pub mod fingerprint;
pub mod pipeline;
pub mod publish;

pub use config::{CONFIG_FILE, Config, ConfigError};
pub use fetch::{FetchError, FetchedSchema, fetch_schema};
pub use pipeline::{RunError, RunOptions, RunOutcome, generate, run};
pub use publish::PublishError;
