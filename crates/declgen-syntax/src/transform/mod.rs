//! Rewrites that strip schema-compiler artifacts from a declaration tree.
//!
//! Each rewrite consumes a [`Module`] and returns a freshly built one; none of
//! them mutate shared nodes. [`transform`] runs the standard pipeline:
//!
//! 1. [`RemoveCatchAllUnionMembers`] - drop `{ [k: string]: T }` union alternatives
//! 2. [`RemoveStringWidening`] - turn `("a" | "b") & string` into `"a" | "b"`
//! 3. [`RemoveCatchAllIndexSignatures`] - drop `[k: string]: unknown` beside other members
//!
//! Every rewrite is a no-op on subtrees it does not recognize, so the stages
//! compose in any order; the pipeline order is the one the generated output
//! is tested against.

mod index_signatures;
mod string_widening;
mod union_members;

pub use index_signatures::RemoveCatchAllIndexSignatures;
pub use string_widening::RemoveStringWidening;
pub use union_members::RemoveCatchAllUnionMembers;

use crate::ast::{Declaration, DeclarationKind, Item, Member, MemberKind, Module, TypeNode};

/// A whole-tree rewrite stage.
pub trait Rewrite: Send + Sync {
    /// Stage identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Rewrite the module, producing a new tree.
    fn rewrite(&self, module: Module) -> Module;
}

/// The artifact-stripping stages, in the order [`transform`] applies them.
pub static PIPELINE: &[&dyn Rewrite] = &[
    &RemoveCatchAllUnionMembers,
    &RemoveStringWidening,
    &RemoveCatchAllIndexSignatures,
];

/// A rewrite left the tree in a shape that cannot be printed.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("{stage} left an empty {kind} in `{declaration}`")]
    EmptyComposite {
        stage: &'static str,
        declaration: String,
        kind: &'static str,
    },
}

/// Run the standard pipeline over a module.
pub fn transform(module: Module) -> Result<Module, TransformError> {
    run_pipeline(module, PIPELINE)
}

/// Run `rewrites` in order, checking the tree after each one.
pub fn run_pipeline(
    mut module: Module,
    rewrites: &[&dyn Rewrite],
) -> Result<Module, TransformError> {
    for stage in rewrites {
        module = stage.rewrite(module);
        validate(&module, stage.name())?;
        tracing::debug!(stage = stage.name(), "rewrite applied");
    }
    Ok(module)
}

/// Reject unions and intersections with no members.
fn validate(module: &Module, stage: &'static str) -> Result<(), TransformError> {
    for decl in module.declarations() {
        let found = match &decl.kind {
            DeclarationKind::Interface(i) => find_empty_in_members(&i.members),
            DeclarationKind::TypeAlias(a) => find_empty(&a.value),
            DeclarationKind::Verbatim(_) => None,
        };
        if let Some(kind) = found {
            return Err(TransformError::EmptyComposite {
                stage,
                declaration: decl.name().unwrap_or("<anonymous>").to_string(),
                kind,
            });
        }
    }
    Ok(())
}

fn find_empty(ty: &TypeNode) -> Option<&'static str> {
    match ty {
        TypeNode::Union(types) if types.is_empty() => Some("union"),
        TypeNode::Intersection(types) if types.is_empty() => Some("intersection"),
        TypeNode::Union(types) | TypeNode::Intersection(types) | TypeNode::Tuple(types) => {
            types.iter().find_map(find_empty)
        }
        TypeNode::Reference { arguments, .. } => arguments.iter().find_map(find_empty),
        TypeNode::TypeLiteral(members) => find_empty_in_members(members),
        TypeNode::Parenthesized(inner) | TypeNode::Array(inner) => find_empty(inner),
        TypeNode::StringLiteral(_)
        | TypeNode::Keyword(_)
        | TypeNode::Literal(_)
        | TypeNode::Verbatim(_) => None,
    }
}

fn find_empty_in_members(members: &[Member]) -> Option<&'static str> {
    members.iter().find_map(|m| match &m.kind {
        MemberKind::Property(p) => p.ty.as_ref().and_then(find_empty),
        MemberKind::Index(sig) => find_empty(&sig.key).or_else(|| find_empty(&sig.value)),
        MemberKind::Verbatim(_) => None,
    })
}

/// Bottom-up tree rebuilding.
///
/// Implementors override the hook for the node they rewrite and call the
/// matching `walk_*` function to rebuild children.
pub(crate) trait Fold {
    fn fold_type(&mut self, ty: TypeNode) -> TypeNode {
        walk_type(self, ty)
    }

    fn fold_members(&mut self, members: Vec<Member>) -> Vec<Member> {
        walk_members(self, members)
    }
}

pub(crate) fn fold_module<F: Fold + ?Sized>(folder: &mut F, module: Module) -> Module {
    let items = module
        .items
        .into_iter()
        .map(|item| match item {
            Item::Declaration(decl) => Item::Declaration(fold_declaration(folder, decl)),
            comment => comment,
        })
        .collect();
    Module { items }
}

fn fold_declaration<F: Fold + ?Sized>(folder: &mut F, decl: Declaration) -> Declaration {
    let kind = match decl.kind {
        DeclarationKind::Interface(mut interface) => {
            interface.members = folder.fold_members(interface.members);
            DeclarationKind::Interface(interface)
        }
        DeclarationKind::TypeAlias(mut alias) => {
            alias.value = folder.fold_type(alias.value);
            DeclarationKind::TypeAlias(alias)
        }
        verbatim => verbatim,
    };
    Declaration { kind, ..decl }
}

pub(crate) fn walk_type<F: Fold + ?Sized>(folder: &mut F, ty: TypeNode) -> TypeNode {
    match ty {
        TypeNode::Union(types) => TypeNode::Union(fold_all(folder, types)),
        TypeNode::Intersection(types) => TypeNode::Intersection(fold_all(folder, types)),
        TypeNode::Tuple(types) => TypeNode::Tuple(fold_all(folder, types)),
        TypeNode::TypeLiteral(members) => TypeNode::TypeLiteral(folder.fold_members(members)),
        TypeNode::Parenthesized(inner) => {
            TypeNode::Parenthesized(Box::new(folder.fold_type(*inner)))
        }
        TypeNode::Array(inner) => TypeNode::Array(Box::new(folder.fold_type(*inner))),
        TypeNode::Reference { name, arguments } => TypeNode::Reference {
            name,
            arguments: fold_all(folder, arguments),
        },
        leaf => leaf,
    }
}

pub(crate) fn walk_members<F: Fold + ?Sized>(folder: &mut F, members: Vec<Member>) -> Vec<Member> {
    members
        .into_iter()
        .map(|member| {
            let kind = match member.kind {
                MemberKind::Property(mut prop) => {
                    prop.ty = prop.ty.map(|ty| folder.fold_type(ty));
                    MemberKind::Property(prop)
                }
                MemberKind::Index(mut sig) => {
                    sig.key = folder.fold_type(sig.key);
                    sig.value = folder.fold_type(sig.value);
                    MemberKind::Index(sig)
                }
                verbatim => verbatim,
            };
            Member { kind, ..member }
        })
        .collect()
}

fn fold_all<F: Fold + ?Sized>(folder: &mut F, types: Vec<TypeNode>) -> Vec<TypeNode> {
    types.into_iter().map(|t| folder.fold_type(t)).collect()
}
