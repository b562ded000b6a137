//! Generic expansion tree traversal.
//!
//! # Usage
//!
//! Implement `Walker` for your pass. `action` runs once per visited node;
//! `go_deeper` decides whether a node's children are visited.
//!
//! ```ignore
//! impl Walker for MyPass {
//!     fn action(&mut self, grammar: &Grammar, node: NodeId) {
//!         // per-node logic
//!     }
//!
//!     fn go_deeper(&mut self, grammar: &Grammar, node: NodeId) -> bool {
//!         grammar.regex(node).is_none()
//!     }
//! }
//! ```
//!
//! Traversal never follows `NonTerminal` references, so it stays within
//! one expansion tree.

use grammex_core::{Expansion, Grammar, NodeId, RegexKind};

pub trait Walker {
    fn action(&mut self, grammar: &Grammar, node: NodeId);

    fn go_deeper(&mut self, _grammar: &Grammar, _node: NodeId) -> bool {
        true
    }
}

pub fn walk_pre_order<W: Walker>(walker: &mut W, grammar: &Grammar, node: NodeId) {
    walker.action(grammar, node);
    if walker.go_deeper(grammar, node) {
        for child in children(grammar, node) {
            walk_pre_order(walker, grammar, child);
        }
    }
}

pub fn walk_post_order<W: Walker>(walker: &mut W, grammar: &Grammar, node: NodeId) {
    if walker.go_deeper(grammar, node) {
        for child in children(grammar, node) {
            walk_post_order(walker, grammar, child);
        }
    }
    walker.action(grammar, node);
}

/// Child slots of a node, in traversal order.
pub fn children(grammar: &Grammar, node: NodeId) -> Vec<NodeId> {
    match grammar.expansion(node) {
        Expansion::Choice(alts) => alts.clone(),
        Expansion::Sequence(units) => units.clone(),
        Expansion::OneOrMore(body)
        | Expansion::ZeroOrMore(body)
        | Expansion::ZeroOrOne(body)
        | Expansion::TryBlock(body) => vec![*body],
        Expansion::Lookahead(la) => {
            // A plain `LOOKAHEAD(n)` scans the sequence it heads; descending
            // would revisit this node forever.
            let wraps_self = matches!(
                grammar.expansion(la.expansion),
                Expansion::Sequence(units) if units.first() == Some(&node)
            );
            if wraps_self { Vec::new() } else { vec![la.expansion] }
        }
        Expansion::NonTerminal(_) | Expansion::Action(_) => Vec::new(),
        Expansion::Regex(regex) => match &regex.kind {
            RegexKind::Choice(alts) => alts.clone(),
            RegexKind::Sequence(units) => units.clone(),
            RegexKind::OneOrMore(body)
            | RegexKind::ZeroOrMore(body)
            | RegexKind::ZeroOrOne(body)
            | RegexKind::RepetitionRange { body, .. } => vec![*body],
            RegexKind::StringLiteral(_)
            | RegexKind::CharacterList { .. }
            | RegexKind::EndOfFile
            | RegexKind::JustName(_) => Vec::new(),
        },
    }
}
