//! Intermediate representation between JSON Schema and TypeScript output.

/// A set of named type definitions, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub definitions: Vec<TypeDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, def: TypeDef) {
        self.definitions.push(def);
    }
}

/// A named, top-level type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub docs: Option<String>,
    pub kind: TypeDefKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// Emitted as an `interface`.
    Interface(StructDef),
    /// Emitted as a `type` alias.
    Alias(Type),
}

/// Object shape: named fields plus an optional string index signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructDef {
    pub fields: Vec<Field>,
    /// Value type of `[k: string]: T`, if the object is open.
    pub index: Option<Box<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub required: bool,
    pub docs: Option<String>,
    pub deprecated: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            docs: None,
            deprecated: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }
}

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Never,
    /// A literal type, as TypeScript source (`"a"`, `1`, `true`).
    Literal(String),
    /// Reference to a named definition.
    Ref(String),
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    /// Inline object type.
    Object(StructDef),
    /// Type text supplied by the schema (`tsType`).
    Raw(String),
}
