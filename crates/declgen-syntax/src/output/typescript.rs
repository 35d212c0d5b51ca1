//! TypeScript printer for the declaration tree.
//!
//! Prints declarations in a fixed house style: one blank line between
//! top-level items, block bodies one member per line, and parentheses only
//! where precedence needs them. Comments are re-indented to their owner.

use crate::ast::*;
use serde::{Deserialize, Serialize};

/// Style options for printed declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation level (ignored with `use_tabs`).
    pub indent_width: usize,
    pub use_tabs: bool,
    /// Terminate members and type aliases with `;`.
    pub semicolons: bool,
    /// Type aliases whose union value exceeds this width get one member per line.
    pub print_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            use_tabs: false,
            semicolons: true,
            print_width: 80,
        }
    }
}

/// Print a module with the given style.
pub fn print_module(module: &Module, options: &FormatOptions) -> String {
    let mut printer = TypeScriptPrinter::new(options);
    printer.write_module(module);
    printer.finish()
}

/// Where a type is printed; decides whether it needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    UnionMember,
    IntersectionMember,
    ArrayElement,
}

/// Emits a declaration tree as TypeScript source.
pub struct TypeScriptPrinter<'o> {
    output: String,
    indent: usize,
    options: &'o FormatOptions,
}

impl<'o> TypeScriptPrinter<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            options,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn write_module(&mut self, module: &Module) {
        for (i, item) in module.items.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            match item {
                Item::Comment(text) => {
                    self.write_comment(text);
                }
                Item::Declaration(decl) => self.write_declaration(decl),
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            if self.options.use_tabs {
                self.output.push('\t');
            } else {
                for _ in 0..self.options.indent_width {
                    self.output.push(' ');
                }
            }
        }
    }

    fn terminator(&self) -> &'static str {
        if self.options.semicolons { ";" } else { "" }
    }

    /// Write a comment on its own line(s), re-indenting continuation lines.
    fn write_comment(&mut self, text: &str) {
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                self.output.push('\n');
                continue;
            }
            self.write_indent();
            if i > 0 && line.starts_with('*') {
                self.output.push(' ');
            }
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    fn write_declaration(&mut self, decl: &Declaration) {
        for comment in &decl.comments {
            self.write_comment(comment);
        }
        if decl.export {
            self.output.push_str("export ");
        }
        match &decl.kind {
            DeclarationKind::Interface(interface) => {
                self.output.push_str("interface ");
                self.output.push_str(&interface.name);
                if let Some(params) = &interface.type_parameters {
                    self.output.push_str(params);
                }
                if let Some(extends) = &interface.extends {
                    self.output.push(' ');
                    self.output.push_str(extends);
                }
                self.output.push(' ');
                self.write_body(&interface.members);
            }
            DeclarationKind::TypeAlias(alias) => self.write_type_alias(alias),
            DeclarationKind::Verbatim(text) => self.output.push_str(text.trim_end()),
        }
        self.output.push('\n');
    }

    fn write_type_alias(&mut self, alias: &TypeAlias) {
        let start = self.output.len();
        self.output.push_str("type ");
        self.output.push_str(&alias.name);
        if let Some(params) = &alias.type_parameters {
            self.output.push_str(params);
        }
        self.output.push_str(" =");

        let line_start = self.output[..start].rfind('\n').map_or(0, |i| i + 1);
        let header_width = self.output.len() - line_start;

        let flat = self.render(&alias.value, Position::Top);
        let fits = header_width + 1 + flat.len() + self.terminator().len()
            <= self.options.print_width;

        match collapse(&alias.value) {
            TypeNode::Union(types) if types.len() > 1 && !fits && !flat.contains('\n') => {
                self.indent += 1;
                for ty in types {
                    self.output.push('\n');
                    self.write_indent();
                    self.output.push_str("| ");
                    self.write_type(ty, Position::UnionMember);
                }
                self.indent -= 1;
            }
            _ => {
                self.output.push(' ');
                self.output.push_str(&flat);
            }
        }
        self.output.push_str(self.terminator());
    }

    /// Print a type at the current indentation into a separate buffer.
    fn render(&self, ty: &TypeNode, position: Position) -> String {
        let mut sub = TypeScriptPrinter {
            output: String::new(),
            indent: self.indent,
            options: self.options,
        };
        sub.write_type(ty, position);
        sub.output
    }

    /// `{ ... }` with one member per line.
    fn write_body(&mut self, members: &[Member]) {
        if members.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for member in members {
            for comment in &member.comments {
                self.write_comment(comment);
            }
            self.write_indent();
            self.write_member(&member.kind);
            self.output.push_str(self.terminator());
            if let Some(comment) = &member.trailing {
                self.output.push(' ');
                self.output.push_str(comment);
            }
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_member(&mut self, member: &MemberKind) {
        match member {
            MemberKind::Property(prop) => {
                if prop.readonly {
                    self.output.push_str("readonly ");
                }
                self.output.push_str(&prop.name);
                if prop.optional {
                    self.output.push('?');
                }
                if let Some(ty) = &prop.ty {
                    self.output.push_str(": ");
                    self.write_type(ty, Position::Top);
                }
            }
            MemberKind::Index(sig) => {
                if sig.readonly {
                    self.output.push_str("readonly ");
                }
                self.output.push('[');
                self.output.push_str(&sig.parameter);
                self.output.push_str(": ");
                self.write_type(&sig.key, Position::Top);
                self.output.push_str("]: ");
                self.write_type(&sig.value, Position::Top);
            }
            MemberKind::Verbatim(text) => self.output.push_str(text),
        }
    }

    fn write_type(&mut self, ty: &TypeNode, position: Position) {
        match collapse(ty) {
            TypeNode::Union(types) if types.is_empty() => self.output.push_str("never"),
            TypeNode::Intersection(types) if types.is_empty() => self.output.push_str("unknown"),
            TypeNode::Union(types) => {
                let parens = matches!(
                    position,
                    Position::IntersectionMember | Position::ArrayElement
                );
                self.write_joined(types, " | ", Position::UnionMember, parens);
            }
            TypeNode::Intersection(types) => {
                let parens = position == Position::ArrayElement;
                self.write_joined(types, " & ", Position::IntersectionMember, parens);
            }
            TypeNode::TypeLiteral(members) => self.write_body(members),
            TypeNode::Parenthesized(inner) => {
                self.output.push('(');
                self.write_type(inner, Position::Top);
                self.output.push(')');
            }
            TypeNode::StringLiteral(raw) | TypeNode::Literal(raw) | TypeNode::Verbatim(raw) => {
                self.output.push_str(raw)
            }
            TypeNode::Keyword(kw) => self.output.push_str(kw.as_str()),
            TypeNode::Reference { name, arguments } => {
                self.output.push_str(name);
                if !arguments.is_empty() {
                    self.output.push('<');
                    self.write_list(arguments);
                    self.output.push('>');
                }
            }
            TypeNode::Array(element) => {
                self.write_type(element, Position::ArrayElement);
                self.output.push_str("[]");
            }
            TypeNode::Tuple(elements) => {
                self.output.push('[');
                self.write_list(elements);
                self.output.push(']');
            }
        }
    }

    fn write_joined(&mut self, types: &[TypeNode], sep: &str, position: Position, parens: bool) {
        if parens {
            self.output.push('(');
        }
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.output.push_str(sep);
            }
            self.write_type(ty, position);
        }
        if parens {
            self.output.push(')');
        }
    }

    fn write_list(&mut self, types: &[TypeNode]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_type(ty, Position::Top);
        }
    }
}

/// A one-member union or intersection prints as its member.
fn collapse(ty: &TypeNode) -> &TypeNode {
    match ty {
        TypeNode::Union(types) | TypeNode::Intersection(types) if types.len() == 1 => {
            collapse(&types[0])
        }
        other => other,
    }
}
