//! JSON Schema to IR lowering.

use crate::CompileError;
use crate::ir::{Field, Schema, StructDef, Type, TypeDef, TypeDefKind};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Parse a JSON Schema document into an IR schema.
///
/// The root becomes a definition named `root_name`; `definitions` / `$defs`
/// entries and titled nested objects become their own definitions.
/// `additional_properties` decides whether objects that do not mention
/// `additionalProperties` get a `[k: string]: unknown` signature.
pub fn parse_json_schema(
    input: &Value,
    root_name: &str,
    additional_properties: bool,
) -> Result<Schema, CompileError> {
    let mut parser = Parser::new(additional_properties);
    let root = parser.names.claim(root_name);

    // Names first so refs can resolve regardless of definition order.
    let mut defs = Vec::new();
    for key in ["definitions", "$defs"] {
        if let Some(obj) = input.get(key).and_then(Value::as_object) {
            for (def_name, def) in obj {
                let base = def
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(def_name);
                let name = parser.names.claim(base);
                parser
                    .refs
                    .insert(format!("#/{}/{}", key, escape_pointer(def_name)), name.clone());
                parser.hoisted.insert(def as *const Value, name.clone());
                defs.push((name, def));
            }
        }
    }

    parser.root = root.clone();
    parser.hoisted.insert(input as *const Value, root.clone());

    let root_def = parser.parse_definition(&root, input)?;
    parser.schema.add(root_def);

    for (name, def) in defs {
        let type_def = parser.parse_definition(&name, def)?;
        parser.schema.add(type_def);
    }

    // Titled objects found while lowering, in discovery order.
    let Parser {
        mut schema,
        pending,
        ..
    } = parser;
    for def in pending {
        schema.add(def);
    }

    Ok(schema)
}

/// JSON pointer escaping for a single path segment.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Unique, identifier-safe type names.
#[derive(Default)]
struct Names {
    taken: HashSet<String>,
}

impl Names {
    fn claim(&mut self, base: &str) -> String {
        let base = type_name(base);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}{}", base, n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// PascalCase a title or key into a TypeScript identifier.
pub fn type_name(raw: &str) -> String {
    let mut out = String::new();
    for chunk in raw.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$')) {
        let mut chars = chunk.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        return "Type".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

struct Parser {
    additional_properties: bool,
    names: Names,
    root: String,
    /// `#/definitions/x` -> type name
    refs: HashMap<String, String>,
    /// Schemas that already have a definition, by address.
    hoisted: HashMap<*const Value, String>,
    schema: Schema,
    pending: Vec<TypeDef>,
}

impl Parser {
    fn new(additional_properties: bool) -> Self {
        Self {
            additional_properties,
            names: Names::default(),
            root: String::new(),
            refs: HashMap::new(),
            hoisted: HashMap::new(),
            schema: Schema::new(),
            pending: Vec::new(),
        }
    }

    fn parse_definition(&mut self, name: &str, schema: &Value) -> Result<TypeDef, CompileError> {
        let docs = description(schema);
        let kind = match self.lower_body(schema)? {
            Type::Object(def) => TypeDefKind::Interface(def),
            other => TypeDefKind::Alias(other),
        };
        Ok(TypeDef {
            name: name.to_string(),
            docs,
            kind,
        })
    }

    /// Lower a schema in type position, hoisting titled objects.
    fn lower(&mut self, schema: &Value) -> Result<Type, CompileError> {
        let key = schema as *const Value;
        if let Some(name) = self.hoisted.get(&key) {
            return Ok(Type::Ref(name.clone()));
        }

        if let Some(map) = schema.as_object() {
            let title = map.get("title").and_then(Value::as_str);
            if let Some(title) = title.filter(|_| is_object_like(map)) {
                let name = self.names.claim(title);
                self.hoisted.insert(key, name.clone());
                let def = self.parse_definition(&name, schema)?;
                self.pending.push(def);
                return Ok(Type::Ref(name));
            }
        }

        self.lower_body(schema)
    }

    fn lower_body(&mut self, schema: &Value) -> Result<Type, CompileError> {
        let map = match schema {
            Value::Bool(true) => return Ok(Type::Unknown),
            Value::Bool(false) => return Ok(Type::Never),
            Value::Object(map) => map,
            other => {
                return Err(CompileError::Invalid(format!(
                    "expected schema object or boolean, got {}",
                    other
                )));
            }
        };

        if let Some(ts) = map.get("tsType").and_then(Value::as_str) {
            return Ok(Type::Raw(ts.to_string()));
        }

        if let Some(reference) = map.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| CompileError::Invalid("$ref must be a string".into()))?;
            return self.resolve_ref(reference);
        }

        let combined = self.lower_combinators(map)?;
        let typed = self.lower_type_keyword(map)?;

        Ok(match (combined, typed) {
            // `type` next to a combinator: the combinator narrows the type.
            (Some(combined), Some(typed)) => Type::Intersection(vec![combined, typed]),
            (Some(ty), None) | (None, Some(ty)) => ty,
            (None, None) => Type::Unknown,
        })
    }

    fn resolve_ref(&self, reference: &str) -> Result<Type, CompileError> {
        if reference == "#" {
            return Ok(Type::Ref(self.root.clone()));
        }
        self.refs
            .get(reference)
            .map(|name| Type::Ref(name.clone()))
            .ok_or_else(|| CompileError::UnresolvedRef(reference.to_string()))
    }

    /// `enum`, `const`, `anyOf`, `oneOf`, `allOf`; several are intersected.
    fn lower_combinators(&mut self, map: &Map<String, Value>) -> Result<Option<Type>, CompileError> {
        let mut parts = Vec::new();

        if let Some(values) = map.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| CompileError::Invalid("enum must be an array".into()))?;
            let literals = values.iter().map(literal).collect::<Result<Vec<_>, _>>()?;
            parts.push(union(literals));
        }

        if let Some(value) = map.get("const") {
            parts.push(literal(value)?);
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(alternatives) = map.get(key) {
                let alternatives = self.lower_list(key, alternatives)?;
                parts.push(union(alternatives));
            }
        }

        if let Some(all) = map.get("allOf") {
            let all = self.lower_list("allOf", all)?;
            parts.push(if all.len() == 1 {
                all.into_iter().next().unwrap_or(Type::Unknown)
            } else {
                Type::Intersection(all)
            });
        }

        Ok(match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Type::Intersection(parts)),
        })
    }

    fn lower_list(&mut self, key: &str, value: &Value) -> Result<Vec<Type>, CompileError> {
        let items = value
            .as_array()
            .ok_or_else(|| CompileError::Invalid(format!("{} must be an array", key)))?;
        items.iter().map(|s| self.lower(s)).collect()
    }

    /// `type`, or the object/array shape implied by other keywords.
    fn lower_type_keyword(&mut self, map: &Map<String, Value>) -> Result<Option<Type>, CompileError> {
        match map.get("type") {
            Some(Value::String(name)) => self.lower_named_type(name, map).map(Some),
            Some(Value::Array(names)) => {
                let mut types = Vec::new();
                for name in names {
                    let name = name.as_str().ok_or_else(|| {
                        CompileError::Invalid("type array entries must be strings".into())
                    })?;
                    types.push(self.lower_named_type(name, map)?);
                }
                Ok(Some(union(types)))
            }
            Some(other) => Err(CompileError::Invalid(format!(
                "type must be a string or array, got {}",
                other
            ))),
            None if is_object_like(map) => self.lower_object(map).map(Some),
            None if map.contains_key("items") || map.contains_key("prefixItems") => {
                self.lower_array(map).map(Some)
            }
            None => Ok(None),
        }
    }

    fn lower_named_type(&mut self, name: &str, map: &Map<String, Value>) -> Result<Type, CompileError> {
        Ok(match name {
            "string" => Type::String,
            "number" | "integer" => Type::Number,
            "boolean" => Type::Boolean,
            "null" => Type::Null,
            "array" => self.lower_array(map)?,
            "object" => self.lower_object(map)?,
            other => {
                return Err(CompileError::Unsupported(format!("type \"{}\"", other)));
            }
        })
    }

    fn lower_array(&mut self, map: &Map<String, Value>) -> Result<Type, CompileError> {
        if let Some(prefix) = map.get("prefixItems") {
            return Ok(Type::Tuple(self.lower_list("prefixItems", prefix)?));
        }
        Ok(match map.get("items") {
            Some(Value::Array(items)) => Type::Tuple(
                items
                    .iter()
                    .map(|s| self.lower(s))
                    .collect::<Result<_, _>>()?,
            ),
            Some(items) => Type::Array(Box::new(self.lower(items)?)),
            None => Type::Array(Box::new(Type::Unknown)),
        })
    }

    fn lower_object(&mut self, map: &Map<String, Value>) -> Result<Type, CompileError> {
        let required: Vec<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = Vec::new();
        if let Some(props) = map.get("properties").and_then(Value::as_object) {
            for (prop_name, prop_schema) in props {
                let ty = self.lower(prop_schema)?;
                let mut field = if required.contains(&prop_name.as_str()) {
                    Field::required(prop_name.clone(), ty)
                } else {
                    Field::optional(prop_name.clone(), ty)
                };
                if let Some(docs) = description(prop_schema) {
                    field = field.with_docs(docs);
                }
                let deprecated = prop_schema
                    .get("deprecated")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                fields.push(field.deprecated(deprecated));
            }
        }

        let index = self.lower_index(map)?;
        Ok(Type::Object(StructDef {
            fields,
            index: index.map(Box::new),
        }))
    }

    fn lower_index(&mut self, map: &Map<String, Value>) -> Result<Option<Type>, CompileError> {
        let additional = map.get("additionalProperties");

        if let Some(patterns) = map
            .get("patternProperties")
            .and_then(Value::as_object)
            .filter(|p| !p.is_empty())
        {
            let mut types = patterns
                .values()
                .map(|s| self.lower(s))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(extra @ Value::Object(_)) = additional {
                types.push(self.lower(extra)?);
            }
            return Ok(Some(union(types)));
        }

        Ok(match additional {
            None => self.additional_properties.then_some(Type::Unknown),
            Some(Value::Bool(true)) => Some(Type::Unknown),
            Some(Value::Bool(false)) => None,
            Some(schema) => Some(self.lower(schema)?),
        })
    }
}

fn is_object_like(map: &Map<String, Value>) -> bool {
    if map.contains_key("$ref") {
        return false;
    }
    map.get("type").and_then(Value::as_str) == Some("object")
        || map.contains_key("properties")
        || map.contains_key("additionalProperties")
        || map.contains_key("patternProperties")
}

fn description(schema: &Value) -> Option<String> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(String::from)
}

fn literal(value: &Value) -> Result<Type, CompileError> {
    match value {
        Value::Null => Ok(Type::Null),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(Type::Literal(value.to_string())),
        other => Err(CompileError::Unsupported(format!(
            "non-scalar enum/const value {}",
            other
        ))),
    }
}

fn union(mut types: Vec<Type>) -> Type {
    match types.len() {
        0 => Type::Never,
        1 => types.pop().unwrap_or(Type::Never),
        _ => Type::Union(types),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(schema: Value) -> Schema {
        parse_json_schema(&schema, "Config", true).unwrap()
    }

    fn root_struct(schema: &Schema) -> &StructDef {
        match &schema.definitions[0].kind {
            TypeDefKind::Interface(def) => def,
            other => panic!("expected interface, got {:?}", other),
        }
    }

    #[test]
    fn test_object_root() {
        let schema = parse(json!({
            "type": "object",
            "description": "Root config.",
            "properties": {
                "name": { "type": "string", "description": "The name." },
                "count": { "type": "integer" }
            },
            "required": ["name"],
            "additionalProperties": false
        }));
        assert_eq!(schema.definitions.len(), 1);
        assert_eq!(schema.definitions[0].name, "Config");
        assert_eq!(schema.definitions[0].docs.as_deref(), Some("Root config."));

        let def = root_struct(&schema);
        assert_eq!(def.index, None);
        assert_eq!(
            def.fields,
            vec![
                Field::required("name", Type::String).with_docs("The name."),
                Field::optional("count", Type::Number),
            ]
        );
    }

    #[test]
    fn test_open_objects_get_catch_all() {
        let schema = parse(json!({ "type": "object", "properties": {} }));
        assert_eq!(root_struct(&schema).index, Some(Box::new(Type::Unknown)));

        let closed = parse_json_schema(&json!({ "type": "object" }), "Config", false).unwrap();
        assert_eq!(root_struct(&closed).index, None);
    }

    #[test]
    fn test_typed_enum_intersects() {
        let schema = parse(json!({ "type": "string", "enum": ["a", "b"] }));
        assert_eq!(
            schema.definitions[0].kind,
            TypeDefKind::Alias(Type::Intersection(vec![
                Type::Union(vec![
                    Type::Literal("\"a\"".into()),
                    Type::Literal("\"b\"".into()),
                ]),
                Type::String,
            ]))
        );
    }

    #[test]
    fn test_refs_and_definitions() {
        let schema = parse(json!({
            "type": "object",
            "properties": {
                "rule": { "$ref": "#/definitions/rule-level" },
                "self": { "$ref": "#" }
            },
            "definitions": {
                "rule-level": { "enum": ["off", "on", 0, 1, null] }
            }
        }));
        assert_eq!(schema.definitions[1].name, "RuleLevel");
        let def = root_struct(&schema);
        assert_eq!(def.fields[0].ty, Type::Ref("RuleLevel".into()));
        assert_eq!(def.fields[1].ty, Type::Ref("Config".into()));
        assert_eq!(
            schema.definitions[1].kind,
            TypeDefKind::Alias(Type::Union(vec![
                Type::Literal("\"off\"".into()),
                Type::Literal("\"on\"".into()),
                Type::Literal("0".into()),
                Type::Literal("1".into()),
                Type::Null,
            ]))
        );
    }

    #[test]
    fn test_unresolved_ref() {
        let err = parse_json_schema(
            &json!({ "$ref": "https://example.com/other.json" }),
            "Config",
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedRef(r) if r.contains("example.com")));
    }

    #[test]
    fn test_titled_objects_are_hoisted() {
        let schema = parse(json!({
            "type": "object",
            "properties": {
                "server": {
                    "title": "server options",
                    "type": "object",
                    "properties": { "port": { "type": "number" } }
                }
            }
        }));
        assert_eq!(schema.definitions.len(), 2);
        assert_eq!(schema.definitions[1].name, "ServerOptions");
        assert_eq!(
            root_struct(&schema).fields[0].ty,
            Type::Ref("ServerOptions".into())
        );
    }

    #[test]
    fn test_name_collisions() {
        let schema = parse(json!({
            "definitions": {
                "config": { "type": "string" },
                "Config": { "type": "number" }
            },
            "type": "object"
        }));
        let names: Vec<_> = schema.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Config", "Config1", "Config2"]);
    }

    #[test]
    fn test_arrays_and_tuples() {
        let schema = parse(json!({
            "type": "object",
            "properties": {
                "list": { "type": "array", "items": { "type": "string" } },
                "pair": { "type": "array", "items": [{ "type": "string" }, { "type": "number" }] },
                "any": { "type": "array" }
            }
        }));
        let fields = &root_struct(&schema).fields;
        assert_eq!(fields[0].ty, Type::Array(Box::new(Type::String)));
        assert_eq!(fields[1].ty, Type::Tuple(vec![Type::String, Type::Number]));
        assert_eq!(fields[2].ty, Type::Array(Box::new(Type::Unknown)));
    }

    #[test]
    fn test_any_of_with_open_object() {
        let schema = parse(json!({
            "anyOf": [
                { "type": "string" },
                { "type": "object" }
            ]
        }));
        assert_eq!(
            schema.definitions[0].kind,
            TypeDefKind::Alias(Type::Union(vec![
                Type::String,
                Type::Object(StructDef {
                    fields: vec![],
                    index: Some(Box::new(Type::Unknown)),
                }),
            ]))
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name("rule-level"), "RuleLevel");
        assert_eq!(type_name("Configuration"), "Configuration");
        assert_eq!(type_name("2fa options"), "_2faOptions");
        assert_eq!(type_name("---"), "Type");
    }
}
