//! Input parsers for schema formats.

mod jsonschema;

pub use jsonschema::{parse_json_schema, type_name};
