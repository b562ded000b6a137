use grammex_core::{Expr, GrammarBuilder};

use super::nullable::*;

#[test]
fn propagates_through_references() {
    let mut grammar = GrammarBuilder::new()
        .production("A", Expr::seq([Expr::nt("B"), Expr::nt("C")]))
        .production("B", Expr::lit("b").optional())
        .production("C", Expr::choice([Expr::nt("B"), Expr::lit("c")]))
        .production("D", Expr::seq([Expr::nt("A"), Expr::lit("d")]))
        .build()
        .unwrap();

    compute_empty_possible(&mut grammar);

    let empty: Vec<_> = grammar
        .productions()
        .filter(|(_, p)| p.empty_possible)
        .map(|(id, _)| grammar.production_name(id).to_owned())
        .collect();
    assert_eq!(empty, ["A", "B", "C"]);
}

#[test]
fn forward_references_reach_fixpoint() {
    // A needs B, which is declared later and itself needs C.
    let mut grammar = GrammarBuilder::new()
        .production("A", Expr::nt("B"))
        .production("B", Expr::nt("C"))
        .production("C", Expr::action("count++;"))
        .build()
        .unwrap();

    compute_empty_possible(&mut grammar);

    assert!(grammar.productions().all(|(_, p)| p.empty_possible));
}

#[test]
fn repetition_and_code() {
    let mut grammar = GrammarBuilder::new()
        .code_production("skip")
        .production("Plus", Expr::lit("x").one_or_more())
        .production("Star", Expr::lit("x").zero_or_more())
        .production("Code", Expr::nt("skip"))
        .production("Rec", Expr::seq([Expr::nt("Rec"), Expr::lit("r")]))
        .build()
        .unwrap();

    compute_empty_possible(&mut grammar);

    let by_name = |name: &str| {
        let id = grammar.production_by_name(name).unwrap();
        grammar.production(id).empty_possible
    };
    assert!(!by_name("Plus"));
    assert!(by_name("Star"));
    assert!(!by_name("Code"));
    assert!(!by_name("Rec"));
    assert!(!by_name("skip"));
}
