//! TypeScript declaration emitter.

use crate::ir::{Field, Schema, StructDef, Type, TypeDef, TypeDefKind};
use std::fmt::Write;

/// Options for TypeScript emission.
#[derive(Debug, Clone)]
pub struct TypeScriptOptions {
    /// Comment text written before the first declaration, without delimiters.
    pub banner: Option<String>,
    /// Prefix every declaration with `export`.
    pub export: bool,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            banner: None,
            export: true,
        }
    }
}

/// Emit declarations for every definition in the schema.
pub fn generate_typescript_types(schema: &Schema, options: &TypeScriptOptions) -> String {
    let mut out = String::new();

    if let Some(banner) = &options.banner {
        out.push_str("/* eslint-disable */\n");
        write_doc(&mut out, banner, 0);
        out.push('\n');
    }

    for (i, def) in schema.definitions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_definition(&mut out, def, options.export);
    }

    out
}

fn write_definition(out: &mut String, def: &TypeDef, export: bool) {
    if let Some(docs) = &def.docs {
        write_doc(out, docs, 0);
    }
    let export = if export { "export " } else { "" };
    match &def.kind {
        TypeDefKind::Interface(body) => {
            let _ = write!(out, "{}interface {} ", export, def.name);
            write_struct(out, body, 0);
            out.push('\n');
        }
        TypeDefKind::Alias(ty) => {
            let _ = write!(out, "{}type {} = ", export, def.name);
            write_type(out, ty, 0, Position::Top);
            out.push_str(";\n");
        }
    }
}

/// Where a type appears, for parenthesization.
#[derive(Clone, Copy, PartialEq)]
enum Position {
    Top,
    UnionMember,
    IntersectionMember,
    ArrayElement,
}

fn write_type(out: &mut String, ty: &Type, depth: usize, position: Position) {
    match ty {
        Type::String => out.push_str("string"),
        Type::Number => out.push_str("number"),
        Type::Boolean => out.push_str("boolean"),
        Type::Null => out.push_str("null"),
        Type::Unknown => out.push_str("unknown"),
        Type::Never => out.push_str("never"),
        Type::Literal(raw) | Type::Ref(raw) => out.push_str(raw),
        Type::Raw(raw) => {
            if matches!(
                position,
                Position::IntersectionMember | Position::ArrayElement
            ) {
                let _ = write!(out, "({})", raw);
            } else {
                out.push_str(raw);
            }
        }
        Type::Array(inner) => {
            write_type(out, inner, depth, Position::ArrayElement);
            out.push_str("[]");
        }
        Type::Tuple(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_type(out, item, depth, Position::Top);
            }
            out.push(']');
        }
        Type::Union(members) => {
            let wrap = matches!(
                position,
                Position::IntersectionMember | Position::ArrayElement
            ) && members.len() > 1;
            write_joined(out, members, " | ", depth, Position::UnionMember, wrap);
        }
        Type::Intersection(members) => {
            let wrap = matches!(position, Position::UnionMember | Position::ArrayElement)
                && members.len() > 1;
            write_joined(
                out,
                members,
                " & ",
                depth,
                Position::IntersectionMember,
                wrap,
            );
        }
        Type::Object(body) => write_struct(out, body, depth),
    }
}

fn write_joined(
    out: &mut String,
    members: &[Type],
    separator: &str,
    depth: usize,
    position: Position,
    wrap: bool,
) {
    if wrap {
        out.push('(');
    }
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        write_type(out, member, depth, position);
    }
    if wrap {
        out.push(')');
    }
}

fn write_struct(out: &mut String, body: &StructDef, depth: usize) {
    if body.fields.is_empty() && body.index.is_none() {
        out.push_str("{}");
        return;
    }

    out.push_str("{\n");
    let inner = depth + 1;
    for field in &body.fields {
        write_field(out, field, inner);
    }
    if let Some(index) = &body.index {
        indent(out, inner);
        out.push_str("[k: string]: ");
        write_type(out, index, inner, Position::Top);
        out.push_str(";\n");
    }
    indent(out, depth);
    out.push('}');
}

fn write_field(out: &mut String, field: &Field, depth: usize) {
    match (&field.docs, field.deprecated) {
        (Some(docs), true) => write_doc(out, &format!("{}\n\n@deprecated", docs), depth),
        (None, true) => write_doc(out, "@deprecated", depth),
        (Some(docs), false) => write_doc(out, docs, depth),
        (None, false) => {}
    }
    indent(out, depth);
    out.push_str(&property_name(&field.name));
    if !field.required {
        out.push('?');
    }
    out.push_str(": ");
    write_type(out, &field.ty, depth, Position::Top);
    out.push_str(";\n");
}

/// Bare identifiers stay as-is; anything else is quoted as a JSON string.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

fn write_doc(out: &mut String, text: &str, depth: usize) {
    let text = text.replace("*/", "*\\/");
    indent(out, depth);
    out.push_str("/**\n");
    for line in text.trim_end().lines() {
        indent(out, depth);
        if line.trim().is_empty() {
            out.push_str(" *\n");
        } else {
            let _ = writeln!(out, " * {}", line.trim_end());
        }
    }
    indent(out, depth);
    out.push_str(" */\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
