//! Loops and optionals whose body can match the empty string.

use grammex_core::{Expansion, Grammar, NodeId};

use super::nullable::empty_expansion_exists;
use super::walker::{Walker, walk_pre_order};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

pub fn check_empty_loops(grammar: &Grammar, diag: &mut Diagnostics) {
    let mut checker = EmptyLoopChecker { diag };
    for (_, production) in grammar.productions() {
        if let Some(root) = production.root() {
            walk_pre_order(&mut checker, grammar, root);
        }
    }
}

struct EmptyLoopChecker<'d> {
    diag: &'d mut Diagnostics,
}

impl Walker for EmptyLoopChecker<'_> {
    fn action(&mut self, grammar: &Grammar, node: NodeId) {
        let expansion = grammar.expansion(node);
        let body = match expansion {
            Expansion::OneOrMore(body) | Expansion::ZeroOrMore(body) | Expansion::ZeroOrOne(body) => *body,
            _ => return,
        };
        if empty_expansion_exists(grammar, body) {
            self.diag
                .report(DiagnosticKind::EmptyLoopBody, grammar.location(node))
                .message(expansion.construct_image())
                .emit();
        }
    }

    fn go_deeper(&mut self, grammar: &Grammar, node: NodeId) -> bool {
        grammar.regex(node).is_none()
    }
}
