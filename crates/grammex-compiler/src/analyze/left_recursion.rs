//! Left recursion detection.
//!
//! A production is left recursive when it can reach itself through the
//! "leftmost reachable production" relation: the non-terminals that may be
//! entered before any token is consumed.

use grammex_core::{Expansion, Grammar, NodeId, ProdId};
use indexmap::IndexSet;

use super::cycles::{Graph, find_cycle, is_cyclic, strongly_connected};
use super::nullable::empty_expansion_exists;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Reports one diagnostic per left-recursive loop.
///
/// Requires `empty_possible` to be computed.
pub fn check_left_recursion(grammar: &Grammar, diag: &mut Diagnostics) {
    let graph = left_corner_graph(grammar);
    let mut sccs = strongly_connected(&graph);
    sccs.sort_by_key(|scc| scc.iter().min().copied());

    for scc in sccs {
        if !is_cyclic(&graph, &scc) {
            continue;
        }
        let Some(&start) = scc.iter().min() else {
            continue;
        };
        let Some(chain) = find_cycle(&graph, &scc, start) else {
            continue;
        };

        let names: Vec<_> = chain
            .iter()
            .map(|&p| format!("{}...", grammar.production_name(p)))
            .collect();
        diag.report(DiagnosticKind::LeftRecursion, grammar.production(start).location)
            .message(format!("\"{}\"", names.join(" --> ")))
            .emit();
    }
}

pub(crate) fn left_corner_graph(grammar: &Grammar) -> Graph<ProdId> {
    let mut graph = Graph::new();
    for (id, production) in grammar.productions() {
        let Some(root) = production.root() else {
            continue;
        };
        let mut leftmost = IndexSet::new();
        add_left_most(grammar, root, &mut leftmost);
        graph.insert(id, leftmost);
    }
    graph
}

fn add_left_most(grammar: &Grammar, node: NodeId, out: &mut IndexSet<ProdId>) {
    match grammar.expansion(node) {
        Expansion::NonTerminal(target) => {
            out.insert(*target);
        }
        Expansion::OneOrMore(body)
        | Expansion::ZeroOrMore(body)
        | Expansion::ZeroOrOne(body)
        | Expansion::TryBlock(body) => add_left_most(grammar, *body, out),
        Expansion::Choice(alts) => {
            for &alt in alts {
                add_left_most(grammar, alt, out);
            }
        }
        Expansion::Sequence(units) => {
            for &unit in units {
                add_left_most(grammar, unit, out);
                if !empty_expansion_exists(grammar, unit) {
                    break;
                }
            }
        }
        Expansion::Lookahead(_) | Expansion::Action(_) | Expansion::Regex(_) => {}
    }
}
