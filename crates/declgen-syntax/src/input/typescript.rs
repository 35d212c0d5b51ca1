//! TypeScript declaration reader.
//!
//! Parses declaration source with tree-sitter and lowers the concrete syntax
//! tree into [`Module`]. Interfaces, type aliases and the type expressions
//! inside them are modelled; any other syntax is carried as verbatim text.

use super::ReadError;
use crate::ast::{
    Declaration, DeclarationKind, IndexSignature, Interface, Item, Keyword, Member, MemberKind,
    Module, PropertySignature, TypeAlias, TypeNode,
};
use tree_sitter::{Node, Parser};

/// Parse TypeScript declaration source into a declaration tree.
pub fn read_typescript(source: &str) -> Result<Module, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| ReadError::Init(format!("tree-sitter init: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Init("tree-sitter produced no tree".into()))?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root);
        let pos = at.start_position();
        return Err(ReadError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    let ctx = ReadContext::new(source);
    ctx.read_module(root)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

/// Comment `a` sits directly above `b`, with no blank line in between.
fn adjacent(a: Node, b: Node) -> bool {
    a.end_position().row + 1 >= b.start_position().row
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn named_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        let children = node.named_children(&mut cursor).collect();
        children
    }

    /// First named child that is not a comment.
    fn first_type_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        self.named_children(node)
            .into_iter()
            .find(|c| c.kind() != "comment")
    }

    fn has_token(&self, node: Node, token: &str) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && self.node_text(child) == token {
                return true;
            }
        }
        false
    }

    fn read_module(&self, root: Node) -> Result<Module, ReadError> {
        if root.kind() != "program" {
            return Err(ReadError::UnexpectedNode {
                expected: "program".into(),
                got: root.kind().into(),
            });
        }

        let mut module = Module::new();
        let mut pending: Vec<Node> = Vec::new();

        for child in self.named_children(root) {
            match child.kind() {
                "comment" => pending.push(child),
                "empty_statement" => {}
                _ => {
                    let leading = self.split_leading(&mut pending, child);
                    self.flush_comments(&mut pending, &mut module);
                    let mut decl = self.read_declaration(child)?;
                    decl.comments = leading;
                    module.items.push(Item::Declaration(decl));
                }
            }
        }

        self.flush_comments(&mut pending, &mut module);

        Ok(module)
    }

    /// Emit detached comments, one item per run of adjacent comments.
    fn flush_comments(&self, pending: &mut Vec<Node>, module: &mut Module) {
        let mut run: Option<(String, Node)> = None;
        for comment in pending.drain(..) {
            let text = self.node_text(comment);
            run = match run {
                Some((mut joined, last)) if adjacent(last, comment) => {
                    joined.push('\n');
                    joined.push_str(text);
                    Some((joined, comment))
                }
                Some((joined, _)) => {
                    module.items.push(Item::Comment(joined));
                    Some((text.to_string(), comment))
                }
                None => Some((text.to_string(), comment)),
            };
        }
        if let Some((joined, _)) = run {
            module.items.push(Item::Comment(joined));
        }
    }

    /// Split off the run of comments that directly precedes `next`,
    /// leaving the detached ones in `pending`.
    fn split_leading(&self, pending: &mut Vec<Node>, next: Node) -> Vec<String> {
        let mut start = pending.len();
        let mut below = next;
        while start > 0 && adjacent(pending[start - 1], below) {
            start -= 1;
            below = pending[start];
        }
        pending
            .split_off(start)
            .into_iter()
            .map(|c| self.node_text(c).to_string())
            .collect()
    }

    fn read_declaration(&self, node: Node) -> Result<Declaration, ReadError> {
        if node.kind() == "export_statement" {
            if let Some(decl) = node.child_by_field_name("declaration") {
                let mut inner = self.read_declaration(decl)?;
                inner.export = true;
                return Ok(inner);
            }
        }

        let kind = match node.kind() {
            "interface_declaration" => DeclarationKind::Interface(self.read_interface(node)?),
            "type_alias_declaration" => DeclarationKind::TypeAlias(self.read_type_alias(node)?),
            _ => DeclarationKind::Verbatim(self.node_text(node).to_string()),
        };

        Ok(Declaration {
            comments: Vec::new(),
            export: false,
            kind,
        })
    }

    fn read_interface(&self, node: Node) -> Result<Interface, ReadError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| self.unexpected("interface name", node))?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| self.unexpected("interface body", node))?;

        let extends = self
            .named_children(node)
            .into_iter()
            .find(|c| c.kind() == "extends_type_clause")
            .map(|c| self.node_text(c).to_string());

        Ok(Interface {
            name: self.node_text(name).to_string(),
            type_parameters: node
                .child_by_field_name("type_parameters")
                .map(|n| self.node_text(n).to_string()),
            extends,
            members: self.read_members(body)?,
        })
    }

    fn read_type_alias(&self, node: Node) -> Result<TypeAlias, ReadError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| self.unexpected("type alias name", node))?;
        let value = node
            .child_by_field_name("value")
            .ok_or_else(|| self.unexpected("type alias value", node))?;

        Ok(TypeAlias {
            name: self.node_text(name).to_string(),
            type_parameters: node
                .child_by_field_name("type_parameters")
                .map(|n| self.node_text(n).to_string()),
            value: self.read_type(value)?,
        })
    }

    /// Members of an interface body or object type.
    fn read_members(&self, body: Node) -> Result<Vec<Member>, ReadError> {
        let mut members: Vec<Member> = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut last_row = None;

        for child in self.named_children(body) {
            if child.kind() == "comment" {
                let text = self.node_text(child).to_string();
                let same_line = last_row == Some(child.start_position().row);
                match members.last_mut() {
                    Some(prev) if same_line && prev.trailing.is_none() => {
                        prev.trailing = Some(text)
                    }
                    _ => pending.push(text),
                }
                continue;
            }
            last_row = Some(child.end_position().row);
            let kind = match child.kind() {
                "property_signature" => self.read_property(child)?,
                "index_signature" => self.read_index_signature(child)?,
                _ => MemberKind::Verbatim(self.node_text(child).to_string()),
            };
            members.push(Member {
                comments: std::mem::take(&mut pending),
                kind,
                trailing: None,
            });
        }

        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "dropping comments after last member");
        }

        Ok(members)
    }

    fn read_property(&self, node: Node) -> Result<MemberKind, ReadError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| self.unexpected("property name", node))?;

        let ty = match node.child_by_field_name("type") {
            Some(annotation) => Some(self.read_annotation(annotation)?),
            None => None,
        };

        Ok(MemberKind::Property(PropertySignature {
            name: self.node_text(name).to_string(),
            optional: self.has_token(node, "?"),
            readonly: self.has_token(node, "readonly"),
            ty,
        }))
    }

    fn read_index_signature(&self, node: Node) -> Result<MemberKind, ReadError> {
        let (Some(name), Some(key), Some(annotation)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("index_type"),
            node.child_by_field_name("type"),
        ) else {
            // Mapped-type clauses and friends.
            return Ok(MemberKind::Verbatim(self.node_text(node).to_string()));
        };
        if annotation.kind() != "type_annotation" {
            return Ok(MemberKind::Verbatim(self.node_text(node).to_string()));
        }

        Ok(MemberKind::Index(IndexSignature {
            readonly: self.has_token(node, "readonly"),
            parameter: self.node_text(name).to_string(),
            key: self.read_type(key)?,
            value: self.read_annotation(annotation)?,
        }))
    }

    /// `: T` -> `T`
    fn read_annotation(&self, node: Node) -> Result<TypeNode, ReadError> {
        let inner = self
            .first_type_child(node)
            .ok_or_else(|| self.unexpected("type in annotation", node))?;
        self.read_type(inner)
    }

    fn read_type(&self, node: Node) -> Result<TypeNode, ReadError> {
        Ok(match node.kind() {
            "predefined_type" => {
                let text = self.node_text(node);
                match Keyword::parse(text) {
                    Some(kw) => TypeNode::Keyword(kw),
                    None => TypeNode::Verbatim(text.to_string()),
                }
            }

            "type_identifier" | "nested_type_identifier" => {
                TypeNode::reference(self.node_text(node))
            }

            "generic_type" => {
                let name = node
                    .child_by_field_name("name")
                    .ok_or_else(|| self.unexpected("generic type name", node))?;
                let mut arguments = Vec::new();
                if let Some(args) = node.child_by_field_name("type_arguments") {
                    for arg in self.named_children(args) {
                        if arg.kind() != "comment" {
                            arguments.push(self.read_type(arg)?);
                        }
                    }
                }
                TypeNode::Reference {
                    name: self.node_text(name).to_string(),
                    arguments,
                }
            }

            "union_type" => {
                let mut types = Vec::new();
                self.flatten(node, "union_type", &mut types)?;
                TypeNode::Union(types)
            }

            "intersection_type" => {
                let mut types = Vec::new();
                self.flatten(node, "intersection_type", &mut types)?;
                TypeNode::Intersection(types)
            }

            "parenthesized_type" => {
                let inner = self
                    .first_type_child(node)
                    .ok_or_else(|| self.unexpected("parenthesized type", node))?;
                TypeNode::Parenthesized(Box::new(self.read_type(inner)?))
            }

            "literal_type" => match self.first_type_child(node) {
                Some(lit) if lit.kind() == "string" => {
                    TypeNode::StringLiteral(self.node_text(lit).to_string())
                }
                _ => TypeNode::Literal(self.node_text(node).to_string()),
            },

            "object_type" => TypeNode::TypeLiteral(self.read_members(node)?),

            "array_type" => {
                let element = self
                    .first_type_child(node)
                    .ok_or_else(|| self.unexpected("array element type", node))?;
                TypeNode::Array(Box::new(self.read_type(element)?))
            }

            "tuple_type" => {
                let mut elements = Vec::new();
                for child in self.named_children(node) {
                    if child.kind() != "comment" {
                        elements.push(self.read_type(child)?);
                    }
                }
                TypeNode::Tuple(elements)
            }

            _ => TypeNode::Verbatim(self.node_text(node).to_string()),
        })
    }

    /// Collect the operands of a left-nested binary `|`/`&` chain.
    fn flatten(&self, node: Node, kind: &str, out: &mut Vec<TypeNode>) -> Result<(), ReadError> {
        for child in self.named_children(node) {
            match child.kind() {
                "comment" => {}
                k if k == kind => self.flatten(child, kind, out)?,
                _ => out.push(self.read_type(child)?),
            }
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str, node: Node) -> ReadError {
        ReadError::UnexpectedNode {
            expected: expected.to_string(),
            got: node.kind().to_string(),
        }
    }
}
