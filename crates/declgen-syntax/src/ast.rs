//! Declaration tree.
//!
//! A closed representation of a TypeScript declaration module. Only the node
//! kinds the rewrites inspect get their own variant; everything else is kept
//! as verbatim source text so printing never loses it.

use serde::Serialize;

/// A parsed declaration module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over the declarations, skipping standalone comments.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            Item::Declaration(decl) => Some(decl),
            Item::Comment(_) => None,
        })
    }

    /// Find a declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations().find(|d| d.name() == Some(name))
    }
}

/// A top-level module item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Item {
    /// A comment not attached to any declaration (e.g. the file banner).
    Comment(String),
    Declaration(Declaration),
}

/// A top-level declaration with its leading comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub comments: Vec<String>,
    pub export: bool,
    pub kind: DeclarationKind,
}

impl Declaration {
    /// Declared name, if the declaration is one the tree models.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclarationKind::Interface(i) => Some(&i.name),
            DeclarationKind::TypeAlias(a) => Some(&a.name),
            DeclarationKind::Verbatim(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    Interface(Interface),
    TypeAlias(TypeAlias),
    /// Enums, namespaces, ambient blocks: kept as written.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    /// Raw `<...>` text including the angle brackets.
    pub type_parameters: Option<String>,
    /// Raw `extends ...` clause, including the keyword.
    pub extends: Option<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAlias {
    pub name: String,
    pub type_parameters: Option<String>,
    pub value: TypeNode,
}

/// A member of an interface body or type literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub comments: Vec<String>,
    pub kind: MemberKind,
    /// Comment on the same line, after the member.
    pub trailing: Option<String>,
}

impl Member {
    pub fn new(kind: MemberKind) -> Self {
        Self {
            comments: Vec::new(),
            kind,
            trailing: None,
        }
    }

    pub fn as_index(&self) -> Option<&IndexSignature> {
        match &self.kind {
            MemberKind::Index(sig) => Some(sig),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MemberKind {
    Property(PropertySignature),
    Index(IndexSignature),
    /// Call, construct and method signatures.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySignature {
    /// Property name as written (quoted names keep their quotes).
    pub name: String,
    pub optional: bool,
    pub readonly: bool,
    pub ty: Option<TypeNode>,
}

/// `[parameter: key]: value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSignature {
    pub readonly: bool,
    pub parameter: String,
    pub key: TypeNode,
    pub value: TypeNode,
}

impl IndexSignature {
    /// Keyed by the primitive `string` type.
    pub fn is_string_keyed(&self) -> bool {
        self.key.is_keyword(Keyword::String)
    }

    /// `[k: string]: unknown`
    pub fn is_catch_all(&self) -> bool {
        self.is_string_keyed() && self.value.is_keyword(Keyword::Unknown)
    }
}

/// Predefined type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Any,
    Bigint,
    Boolean,
    Never,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Unknown,
    Void,
}

impl Keyword {
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "any" => Self::Any,
            "bigint" => Self::Bigint,
            "boolean" => Self::Boolean,
            "never" => Self::Never,
            "number" => Self::Number,
            "object" => Self::Object,
            "string" => Self::String,
            "symbol" => Self::Symbol,
            "undefined" => Self::Undefined,
            "unknown" => Self::Unknown,
            "void" => Self::Void,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bigint => "bigint",
            Self::Boolean => "boolean",
            Self::Never => "never",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Undefined => "undefined",
            Self::Unknown => "unknown",
            Self::Void => "void",
        }
    }
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeNode {
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    TypeLiteral(Vec<Member>),
    Parenthesized(Box<TypeNode>),
    /// String literal type, raw text including quotes.
    StringLiteral(String),
    Keyword(Keyword),
    /// Non-string literal types: numbers, `true`, `false`, `null`.
    Literal(String),
    Reference {
        name: String,
        arguments: Vec<TypeNode>,
    },
    Array(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    /// Any other type syntax, kept as written.
    Verbatim(String),
}

impl TypeNode {
    pub fn string_literal(value: &str) -> Self {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for c in value.chars() {
            match c {
                '"' => raw.push_str("\\\""),
                '\\' => raw.push_str("\\\\"),
                '\n' => raw.push_str("\\n"),
                _ => raw.push(c),
            }
        }
        raw.push('"');
        Self::StringLiteral(raw)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    /// A type literal holding a single string-keyed index signature,
    /// `{ [k: string]: T }`, whatever `T` is.
    pub fn is_string_keyed_record(&self) -> bool {
        match self {
            Self::TypeLiteral(members) => {
                members.len() == 1 && members[0].as_index().is_some_and(|s| s.is_string_keyed())
            }
            _ => false,
        }
    }

    /// Whether this type is, or structurally contains through unions,
    /// intersections and parentheses, a string literal type.
    pub fn intersects_string_literal(&self) -> bool {
        match self {
            Self::StringLiteral(_) => true,
            Self::Union(types) | Self::Intersection(types) => {
                types.iter().any(TypeNode::intersects_string_literal)
            }
            Self::Parenthesized(inner) => inner.intersects_string_literal(),
            _ => false,
        }
    }
}
