use grammex_core::{Expr, GrammarBuilder, RegexExpr, TokenDef, TokenKind, TokenSpec};

use super::*;
use crate::diagnostics::DiagnosticKind;

fn run(builder: GrammarBuilder) -> Diagnostics {
    let mut grammar = builder.build().unwrap();
    let mut diag = Diagnostics::new();
    analyze(&mut grammar, &Options::default(), &mut diag);
    diag
}

#[test]
fn empty_loop_bodies() {
    let diag = run(GrammarBuilder::new()
        .production("Opt", Expr::lit("a").optional())
        .production(
            "S",
            Expr::seq([
                Expr::nt("Opt").at(2, 3).one_or_more().at(2, 1),
                Expr::action("x();").zero_or_more().at(3, 1),
                Expr::lit("b").zero_or_more().optional().at(4, 1),
                Expr::lit("c").one_or_more(),
            ]),
        ));

    insta::assert_snapshot!(diag.render(), @r"
    error at 2:1: expansion within `(...)+` can be matched by the empty string
    error at 3:1: expansion within `(...)*` can be matched by the empty string
    error at 4:1: expansion within `[...]` can be matched by the empty string
    ");
}

#[test]
fn direct_and_indirect_left_recursion() {
    let diag = run(GrammarBuilder::new()
        .production(
            "Expr",
            Expr::choice([Expr::seq([Expr::nt("Expr"), Expr::lit("+"), Expr::nt("Term")]), Expr::nt("Term")])
                .at(1, 1),
        )
        .production("Term", Expr::lit("n").at(2, 1))
        .production("A", Expr::seq([Expr::lit("x").optional(), Expr::nt("B")]).at(3, 1))
        .production("B", Expr::seq([Expr::nt("C"), Expr::lit("y")]).at(4, 1))
        .production("C", Expr::choice([Expr::nt("A"), Expr::lit("z")]).at(5, 1)));

    insta::assert_snapshot!(diag.render(), @r#"
    error at 1:1: left recursion detected: "Expr... --> Expr..."
    error at 3:1: left recursion detected: "A... --> B... --> C... --> A..."
    "#);
}

#[test]
fn right_recursion_is_fine() {
    let diag = run(GrammarBuilder::new().production(
        "P",
        Expr::choice([Expr::seq([Expr::lit("a"), Expr::nt("P")]), Expr::lit("b")]),
    ));

    assert!(diag.is_empty());
}

#[test]
fn left_recursion_through_nullable_prefix() {
    let diag = run(GrammarBuilder::new()
        .production("Eps", Expr::action("").at(1, 1))
        .production("L", Expr::seq([Expr::nt("Eps"), Expr::nt("L"), Expr::lit("l")]).at(2, 1)));

    assert_eq!(diag.of_kind(DiagnosticKind::LeftRecursion).count(), 1);
    assert_eq!(diag.iter().next().unwrap().location().line, 2);
}

#[test]
fn regex_reference_loops() {
    let diag = run(GrammarBuilder::new().tokens(
        TokenDef::new(TokenKind::Token)
            .spec(TokenSpec::labeled("A", RegexExpr::seq([RegexExpr::lit("a"), RegexExpr::name("B")])).at(1, 3))
            .spec(TokenSpec::labeled("B", RegexExpr::name("A").optional()).at(2, 3))
            .spec(TokenSpec::labeled("C", RegexExpr::name("A").one_or_more()).at(3, 3)),
    ));

    insta::assert_snapshot!(diag.render(), @r#"error at 1:3: loop in regular expression detected: "...A... --> ...B... --> ...A...""#);
}

#[test]
fn inverted_ranges_reported_once_each() {
    let diag = run(GrammarBuilder::new().tokens(
        TokenDef::new(TokenKind::Token)
            .spec(TokenSpec::labeled("BAD", RegexExpr::chars([('z', 'a'), ('0', '9')])).at(1, 1))
            .spec(TokenSpec::labeled("REP", RegexExpr::lit("x").repeat(3, Some(1))).at(2, 1)),
    ));

    assert_eq!(diag.error_count(), 2);
    insta::assert_snapshot!(diag.render(), @r#"
    error at 1:1: invalid character range "z" - "a" (hint: the first character must not be greater than the second)
    error at 2:1: invalid repetition range {3,1} (hint: the minimum must not be greater than the maximum)
    "#);
}

#[test]
fn sanity_check_off_skips_structural_passes() {
    let mut grammar = GrammarBuilder::new()
        .production("L", Expr::seq([Expr::nt("L"), Expr::lit("l")]))
        .production("E", Expr::action("").one_or_more())
        .build()
        .unwrap();
    let mut diag = Diagnostics::new();

    analyze(&mut grammar, &Options::new().sanity_check(false), &mut diag);

    assert!(diag.is_empty());
    let e = grammar.production_by_name("E").unwrap();
    assert!(grammar.production(e).empty_possible);
}
