//! Which expansions can derive the empty token sequence.

use grammex_core::{Expansion, Grammar, NodeId, ProdId};

/// Whether `node` can match without consuming a token, given the current
/// `empty_possible` flags of the productions it references.
pub fn empty_expansion_exists(grammar: &Grammar, node: NodeId) -> bool {
    match grammar.expansion(node) {
        Expansion::NonTerminal(target) => grammar.production(*target).empty_possible,
        Expansion::Action(_) => true,
        Expansion::Regex(_) => false,
        Expansion::OneOrMore(body) => empty_expansion_exists(grammar, *body),
        Expansion::ZeroOrMore(_) | Expansion::ZeroOrOne(_) | Expansion::Lookahead(_) => true,
        Expansion::Choice(alts) => alts.iter().any(|&alt| empty_expansion_exists(grammar, alt)),
        Expansion::Sequence(units) => units.iter().all(|&unit| empty_expansion_exists(grammar, unit)),
        Expansion::TryBlock(body) => empty_expansion_exists(grammar, *body),
    }
}

/// Fixpoint over BNF productions setting `empty_possible`.
///
/// Flags only ever flip from false to true, so the loop ends after at most
/// one round per production.
pub fn compute_empty_possible(grammar: &mut Grammar) {
    let bnf: Vec<(ProdId, NodeId)> = grammar
        .productions()
        .filter_map(|(id, p)| p.root().map(|root| (id, root)))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for &(id, root) in &bnf {
            if !grammar.production(id).empty_possible && empty_expansion_exists(grammar, root) {
                grammar.set_empty_possible(id, true);
                changed = true;
            }
        }
    }
}
