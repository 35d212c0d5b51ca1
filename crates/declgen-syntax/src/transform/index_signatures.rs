//! Drop `[k: string]: unknown` from member lists that have other members.
//!
//! A lone catch-all is the only content of its body and stays.

use super::{Fold, Rewrite, fold_module, walk_members};
use crate::ast::{Member, Module};

pub struct RemoveCatchAllIndexSignatures;

impl Rewrite for RemoveCatchAllIndexSignatures {
    fn name(&self) -> &'static str {
        "remove-catch-all-index-signatures"
    }

    fn rewrite(&self, module: Module) -> Module {
        let mut folder = IndexFolder { removed: 0 };
        let module = fold_module(&mut folder, module);
        tracing::debug!(removed = folder.removed, "catch-all index signatures");
        module
    }
}

struct IndexFolder {
    removed: usize,
}

impl Fold for IndexFolder {
    fn fold_members(&mut self, members: Vec<Member>) -> Vec<Member> {
        let members = walk_members(self, members);
        if members.len() < 2 {
            return members;
        }
        let before = members.len();
        let kept: Vec<_> = members
            .into_iter()
            .filter(|m| !m.as_index().is_some_and(|sig| sig.is_catch_all()))
            .collect();
        self.removed += before - kept.len();
        kept
    }
}
