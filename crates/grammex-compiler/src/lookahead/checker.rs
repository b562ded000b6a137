use grammex_core::{Expansion, Grammar, NodeId};

use super::LookaheadTable;
use super::conflict::{choice_calc, ebnf_calc, explicit_lookahead};
use crate::analyze::Walker;
use crate::diagnostics::Diagnostics;
use crate::options::Options;

pub(super) struct LookaheadChecker<'a> {
    pub(super) options: &'a Options,
    pub(super) diag: &'a mut Diagnostics,
    pub(super) table: LookaheadTable,
}

impl Walker for LookaheadChecker<'_> {
    fn action(&mut self, grammar: &Grammar, node: NodeId) {
        match grammar.expansion(node) {
            Expansion::Choice(alts) => {
                if self.options.checks_implicit_lookahead() {
                    let decisions = choice_calc(grammar, self.options, self.diag, node, alts);
                    self.table.choices.insert(node, decisions);
                }
            }
            Expansion::OneOrMore(body) | Expansion::ZeroOrMore(body) | Expansion::ZeroOrOne(body) => {
                let implicit = !explicit_lookahead(grammar, *body);
                if self.options.force_la_check || (implicit && self.options.lookahead == 1) {
                    let decision = ebnf_calc(grammar, self.options, self.diag, node, *body);
                    self.table.loops.insert(node, decision);
                }
            }
            _ => {}
        }
    }

    fn go_deeper(&mut self, grammar: &Grammar, node: NodeId) -> bool {
        !matches!(
            grammar.expansion(node),
            Expansion::Regex(_) | Expansion::Lookahead(_)
        )
    }
}
