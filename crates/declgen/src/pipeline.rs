//! One regeneration run: fetch, gate, compile, rewrite, print, publish.

use crate::config::Config;
use crate::fetch::{FetchError, fetch_schema};
use crate::fingerprint::{fingerprint, read_fingerprint, write_fingerprint};
use crate::publish::{PublishError, publish, write_output};
use declgen_syntax::{ReadError, TransformError, print_module, read_typescript, transform};
use declgen_typegen::{CompileError, CompileOptions, compile};
use serde_json::Value;
use std::path::PathBuf;

/// Options for a single run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Skip generation when the schema fingerprint matches the stored one.
    pub check_fingerprint: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            check_fingerprint: true,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The schema matched the stored fingerprint; nothing was written.
    Unchanged { fingerprint: String },
    /// Declarations were regenerated and written to `path`.
    Generated { path: PathBuf, fingerprint: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no schema source configured (set [source] url or pass --source)")]
    MissingSource,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to compile schema")]
    Compile(#[from] CompileError),
    #[error("compiled declarations did not parse")]
    Read(#[from] ReadError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("failed to access fingerprint file {path}")]
    State {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compile a schema and strip compiler artifacts, returning printed declarations.
pub fn generate(schema: &Value, config: &Config) -> Result<String, RunError> {
    let options = CompileOptions {
        banner_comment: config.banner(),
        additional_properties: config.output.additional_properties,
        export: true,
    };
    let compiled = compile(schema, &config.output.type_name, &options)?;
    tracing::debug!(bytes = compiled.len(), "compiled declarations");

    let module = read_typescript(&compiled)?;
    let module = transform(module)?;
    Ok(print_module(&module, &config.format))
}

/// Run the full regeneration flow.
///
/// Any failure before the last step leaves the stored fingerprint untouched,
/// so the next run retries.
pub fn run(config: &Config, options: &RunOptions) -> Result<RunOutcome, RunError> {
    let source = config.source().ok_or(RunError::MissingSource)?;
    let fetched = fetch_schema(&source)?;

    let current = fingerprint(&fetched.text);
    let state_path = config.fingerprint_path();
    tracing::info!(fingerprint = %current, "schema fingerprint");

    if options.check_fingerprint {
        let stored = read_fingerprint(&state_path).map_err(|source| RunError::State {
            path: state_path.clone(),
            source,
        })?;
        if stored.as_deref() == Some(current.as_str()) {
            tracing::info!("schema unchanged, skipping generation");
            return Ok(RunOutcome::Unchanged {
                fingerprint: current,
            });
        }
    }

    let declarations = generate(&fetched.json, config)?;

    let path = config.output_path();
    write_output(&path, &declarations)?;
    tracing::info!(path = %path.display(), "wrote declarations");

    publish(&config.publish.command, &config.publish_dir())?;

    write_fingerprint(&state_path, &current).map_err(|source| RunError::State {
        path: state_path.clone(),
        source,
    })?;

    Ok(RunOutcome::Generated {
        path,
        fingerprint: current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bare_config() -> Config {
        let mut config = Config::default();
        config.output.banner = Some(String::new());
        config
    }

    #[test]
    fn test_generate_strips_artifacts() {
        let schema = json!({
            "type": "object",
            "properties": {
                "mode": { "type": "string", "enum": ["a", "b"] },
                "extends": {
                    "anyOf": [{ "type": "string" }, { "type": "object" }]
                }
            }
        });
        let out = generate(&schema, &bare_config()).unwrap();
        insta::assert_snapshot!(out, @r#"
        export interface Configuration {
          mode?: "a" | "b";
          extends?: string;
        }
        "#);
    }

    #[test]
    fn test_missing_source() {
        let err = run(&Config::default(), &RunOptions::default()).unwrap_err();
        assert!(matches!(err, RunError::MissingSource));
    }
}
