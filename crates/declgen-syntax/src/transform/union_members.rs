//! Drop `{ [k: string]: T }` alternatives from unions.
//!
//! Schema compilers model "any other object" fallbacks as a record type next
//! to the concrete alternatives. The union is rebuilt even when one or no
//! member survives; collapsing it is left to the printer.

use super::{Fold, Rewrite, fold_module, walk_type};
use crate::ast::{Module, TypeNode};

pub struct RemoveCatchAllUnionMembers;

impl Rewrite for RemoveCatchAllUnionMembers {
    fn name(&self) -> &'static str {
        "remove-catch-all-union-members"
    }

    fn rewrite(&self, module: Module) -> Module {
        let mut folder = UnionFolder { removed: 0 };
        let module = fold_module(&mut folder, module);
        tracing::debug!(removed = folder.removed, "catch-all union members");
        module
    }
}

struct UnionFolder {
    removed: usize,
}

impl Fold for UnionFolder {
    fn fold_type(&mut self, ty: TypeNode) -> TypeNode {
        match walk_type(self, ty) {
            TypeNode::Union(types) => {
                let before = types.len();
                let kept: Vec<_> = types
                    .into_iter()
                    .filter(|t| !t.is_string_keyed_record())
                    .collect();
                self.removed += before - kept.len();
                TypeNode::Union(kept)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::read_typescript;
    use crate::output::{FormatOptions, print_module};

    fn run(source: &str) -> String {
        let module = read_typescript(source).unwrap();
        print_module(
            &RemoveCatchAllUnionMembers.rewrite(module),
            &FormatOptions::default(),
        )
    }

    #[test]
    fn test_removes_record_alternative() {
        assert_eq!(
            run("type T = Rule | { [k: string]: unknown } | Rule[];"),
            "type T = Rule | Rule[];\n"
        );
    }

    #[test]
    fn test_value_type_is_irrelevant() {
        assert_eq!(
            run("type T = \"off\" | { [name: string]: Options };"),
            "type T = \"off\";\n"
        );
    }

    #[test]
    fn test_keeps_order_of_remaining_members() {
        assert_eq!(
            run("type T = C | { [k: string]: unknown } | A | B;"),
            "type T = C | A | B;\n"
        );
    }

    #[test]
    fn test_nested_unions() {
        assert_eq!(
            run(
                "interface I { rules?: { [k: string]: Rule | { [k: string]: unknown } }; }"
            ),
            "interface I {\n  rules?: {\n    [k: string]: Rule;\n  };\n}\n"
        );
    }

    #[test]
    fn test_records_with_other_members_stay() {
        let source = "type T = A | { a: string; [k: string]: unknown };";
        let module = read_typescript(source).unwrap();
        assert_eq!(RemoveCatchAllUnionMembers.rewrite(module.clone()), module);
    }

    #[test]
    fn test_number_keyed_records_stay() {
        let source = "type T = A | { [k: number]: unknown };";
        let module = read_typescript(source).unwrap();
        assert_eq!(RemoveCatchAllUnionMembers.rewrite(module.clone()), module);
    }

    #[test]
    fn test_records_outside_unions_stay() {
        let source = "type T = { [k: string]: unknown };";
        let module = read_typescript(source).unwrap();
        assert_eq!(RemoveCatchAllUnionMembers.rewrite(module.clone()), module);
    }
}
