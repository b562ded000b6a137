//! Lookahead conflict analysis.
//!
//! Every choice, loop and optional in a BNF production is checked for
//! prefixes its branches share. Conflicts surface as warnings, and the
//! depth that resolves each construct is recorded in a [`LookaheadTable`]
//! for the parser generator.

mod checker;
mod conflict;
pub mod match_set;


pub use conflict::{image, overlap};
pub use match_set::{MatchInfo, MatchSetEngine, MatchSets};

use grammex_core::{Grammar, NodeId};
use indexmap::IndexMap;
use log::debug;

use crate::analyze::walk_pre_order;
use crate::diagnostics::Diagnostics;
use crate::options::Options;
use checker::LookaheadChecker;

/// Lookahead needed to pick a branch of one construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The construct carries a user-written `LOOKAHEAD`.
    Explicit,
    /// Deterministic with this many tokens.
    Resolved(u32),
    /// Still ambiguous at the deepest depth tried.
    Unresolved(u32),
}

impl Decision {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Decision::Unresolved(_))
    }
}

/// Per-node lookahead decisions, keyed by the construct's node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookaheadTable {
    /// One entry per alternative except the last.
    pub(crate) choices: IndexMap<NodeId, Vec<Decision>>,
    pub(crate) loops: IndexMap<NodeId, Decision>,
}

impl LookaheadTable {
    pub fn choice(&self, node: NodeId) -> Option<&[Decision]> {
        self.choices.get(&node).map(Vec::as_slice)
    }

    pub fn loop_decision(&self, node: NodeId) -> Option<Decision> {
        self.loops.get(&node).copied()
    }

    pub fn choices(&self) -> impl Iterator<Item = (NodeId, &[Decision])> {
        self.choices.iter().map(|(&node, d)| (node, d.as_slice()))
    }

    pub fn loops(&self) -> impl Iterator<Item = (NodeId, Decision)> {
        self.loops.iter().map(|(&node, &d)| (node, d))
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.loops.is_empty()
    }
}

/// Walks every BNF production and checks its choices and loops.
///
/// The grammar must be free of left recursion: run
/// [`check_left_recursion`](crate::analyze::check_left_recursion) first and
/// skip this pass when it reports errors. FIRST computation does not
/// terminate on a left-recursive production. [`crate::compile`] does both.
pub fn check_lookahead(grammar: &Grammar, options: &Options, diag: &mut Diagnostics) -> LookaheadTable {
    let mut checker = LookaheadChecker {
        options,
        diag,
        table: LookaheadTable::default(),
    };
    for (id, production) in grammar.productions() {
        if let Some(root) = production.root() {
            debug!("checking lookahead in {}", grammar.production_name(id));
            walk_pre_order(&mut checker, grammar, root);
        }
    }
    checker.table
}
