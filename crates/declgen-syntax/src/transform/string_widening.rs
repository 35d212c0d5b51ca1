//! Strip bare `string` from unions and intersections that already carry
//! string literals.
//!
//! Compilers emit `("a" | "b") & string` to say the literals are strings.
//! Wherever a union or intersection contains a string literal (directly, or
//! through nested unions, intersections and parentheses), its bare `string`
//! members are dropped and the parentheses on the way down are removed.

use super::{Fold, Rewrite, fold_module, walk_type};
use crate::ast::{Keyword, Module, TypeNode};

pub struct RemoveStringWidening;

impl Rewrite for RemoveStringWidening {
    fn name(&self) -> &'static str {
        "remove-string-widening"
    }

    fn rewrite(&self, module: Module) -> Module {
        let mut folder = WideningFolder { removed: 0 };
        let module = fold_module(&mut folder, module);
        tracing::debug!(removed = folder.removed, "string widening members");
        module
    }
}

struct WideningFolder {
    removed: usize,
}

impl WideningFolder {
    fn strip(&mut self, types: Vec<TypeNode>) -> Vec<TypeNode> {
        let before = types.len();
        let kept: Vec<_> = types
            .into_iter()
            .filter(|t| !t.is_keyword(Keyword::String))
            .collect();
        self.removed += before - kept.len();
        kept.into_iter().map(|t| self.fold_type(t)).collect()
    }
}

impl Fold for WideningFolder {
    fn fold_type(&mut self, ty: TypeNode) -> TypeNode {
        if !ty.intersects_string_literal() {
            return walk_type(self, ty);
        }
        match ty {
            TypeNode::Union(types) => TypeNode::Union(self.strip(types)),
            TypeNode::Intersection(types) => TypeNode::Intersection(self.strip(types)),
            TypeNode::Parenthesized(inner) => self.fold_type(*inner),
            literal => literal,
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
        print_module(&RemoveStringWidening.rewrite(module), &FormatOptions::default())
    }

    #[test]
    fn test_literal_union_intersected_with_string() {
        assert_eq!(
            run(r#"type T = ("a" | "b" | "c") & string;"#),
            "type T = \"a\" | \"b\" | \"c\";\n"
        );
    }

    #[test]
    fn test_string_first() {
        assert_eq!(
            run(r#"type T = string & ("a" | "b");"#),
            "type T = \"a\" | \"b\";\n"
        );
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(run(r#"type T = "a" & string;"#), "type T = \"a\";\n");
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(
            run(r#"type T = ((("a" | "b") & string) | "c") & string;"#),
            "type T = \"a\" | \"b\" | \"c\";\n"
        );
    }

    #[test]
    fn test_inside_property_and_array() {
        assert_eq!(
            run(r#"interface I { level?: (("low" | "high") & string)[]; }"#),
            "interface I {\n  level?: (\"low\" | \"high\")[];\n}\n"
        );
    }

    #[test]
    fn test_keeps_other_members() {
        assert_eq!(
            run(r#"type T = ("a" | Named) & string & Branded;"#),
            "type T = (\"a\" | Named) & Branded;\n"
        );
    }

    #[test]
    fn test_no_literal_no_change() {
        let source = "type T = (A | B) & string;";
        let module = read_typescript(source).unwrap();
        assert_eq!(RemoveStringWidening.rewrite(module.clone()), module);
    }
}
