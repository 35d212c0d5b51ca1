//! JSON Schema to TypeScript declaration compiler.
//!
//! `declgen-typegen` lowers a configuration-file JSON Schema into a small IR
//! and emits it as `.d.ts` source, the way schema-to-types compilers in the
//! npm ecosystem do, artifacts included: typed enums come out as
//! `("a" | "b") & string` and open objects carry `[k: string]: unknown`.
//!
//! # Architecture
//!
//! ```text
//! JSON Schema ──> input::parse_json_schema ──> ir::Schema ──> output::generate_typescript_types
//! ```
//!
//! # Example
//!
//! ```
//! use declgen_typegen::{CompileOptions, compile};
//!
//! let schema = serde_json::json!({
//!     "type": "object",
//!     "properties": { "mode": { "type": "string", "enum": ["a", "b"] } },
//!     "additionalProperties": false
//! });
//! let options = CompileOptions { banner_comment: None, ..Default::default() };
//! let ts = compile(&schema, "Config", &options).unwrap();
//! assert_eq!(ts, "export interface Config {\n  mode?: (\"a\" | \"b\") & string;\n}\n");
//! ```

pub mod input;
pub mod ir;
pub mod output;

use output::TypeScriptOptions;
use serde_json::Value;

/// Banner written at the top of compiled output.
pub const DEFAULT_BANNER: &str = "This file was automatically generated by declgen.\n\
DO NOT MODIFY IT BY HAND. Instead, modify the source JSON Schema file,\n\
and run declgen to regenerate this file.";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Comment placed above the declarations; `None` omits it.
    pub banner_comment: Option<String>,
    /// Give objects without `additionalProperties` a `[k: string]: unknown` signature.
    pub additional_properties: bool,
    /// Export every declaration.
    pub export: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            banner_comment: Some(DEFAULT_BANNER.to_string()),
            additional_properties: true,
            export: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("invalid schema: {0}")]
    Invalid(String),
    #[error("unresolved $ref `{0}`")]
    UnresolvedRef(String),
    #[error("unsupported schema construct: {0}")]
    Unsupported(String),
}

/// Compile a JSON Schema into TypeScript declarations rooted at `name`.
pub fn compile(schema: &Value, name: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let ir = input::parse_json_schema(schema, name, options.additional_properties)?;
    tracing::debug!(
        definitions = ir.definitions.len(),
        root = %name,
        "lowered schema"
    );
    let ts_options = TypeScriptOptions {
        banner: options.banner_comment.clone(),
        export: options.export,
    };
    Ok(output::generate_typescript_types(&ir, &ts_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_with_definitions() {
        let schema = json!({
            "type": "object",
            "description": "Linter configuration.",
            "properties": {
                "rules": {
                    "type": "object",
                    "additionalProperties": { "$ref": "#/definitions/rule" }
                },
                "extends": {
                    "anyOf": [
                        { "type": "string" },
                        { "type": "array", "items": { "type": "string" } }
                    ]
                }
            },
            "definitions": {
                "rule": {
                    "anyOf": [
                        { "type": "number", "enum": [0, 1, 2] },
                        { "type": "string", "enum": ["off", "warn", "error"] },
                        { "type": "array" }
                    ]
                }
            }
        });
        let options = CompileOptions {
            banner_comment: None,
            ..Default::default()
        };
        let out = compile(&schema, "Linter", &options).unwrap();
        insta::assert_snapshot!(out, @r#"
        /**
         * Linter configuration.
         */
        export interface Linter {
          rules?: {
            [k: string]: Rule;
          };
          extends?: string | string[];
          [k: string]: unknown;
        }

        export type Rule = ((0 | 1 | 2) & number) | (("off" | "warn" | "error") & string) | unknown[];
        "#);
    }

    #[test]
    fn test_default_banner() {
        let out = compile(&json!({ "type": "string" }), "Name", &CompileOptions::default()).unwrap();
        assert!(out.starts_with("/* eslint-disable */\n/**\n * This file was automatically generated"));
        assert!(out.ends_with("\n\nexport type Name = string;\n"));
    }

    #[test]
    fn test_compile_error_surfaces() {
        let err = compile(
            &json!({ "enum": [{ "a": 1 }] }),
            "Bad",
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::Unsupported(_)));
    }
}
