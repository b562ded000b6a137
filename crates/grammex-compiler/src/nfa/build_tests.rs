use grammex_core::{Grammar, GrammarBuilder, NodeId, RegexExpr, TokenDef, TokenKind, TokenSpec};

use super::build::{Fragment, Nfa, NfaBuilder};
use crate::test_utils::{build, fragment_matches, has_epsilon_cycle, language};

fn tokens(specs: impl IntoIterator<Item = (&'static str, RegexExpr)>) -> Grammar {
    let mut def = TokenDef::new(TokenKind::Token);
    for (label, regex) in specs {
        def = def.spec(TokenSpec::labeled(label, regex));
    }
    build(GrammarBuilder::new().tokens(def))
}

fn node(grammar: &Grammar, label: &str) -> NodeId {
    grammar.named_token(label).unwrap()
}

fn compile(grammar: &Grammar, label: &str, ignore_case: bool) -> (Nfa, Fragment) {
    let mut nfa = Nfa::new();
    let fragment = NfaBuilder::new(grammar, &mut nfa).compile(node(grammar, label), ignore_case);
    (nfa, fragment)
}

fn words(grammar: &Grammar, label: &str, alphabet: &str, max_len: usize) -> Vec<String> {
    let (nfa, fragment) = compile(grammar, label, false);
    language(&nfa, fragment, alphabet, max_len).into_iter().collect()
}

#[test]
fn literal_chain() {
    let grammar = tokens([("KW", RegexExpr::lit("if")), ("E", RegexExpr::lit(""))]);

    let (nfa, fragment) = compile(&grammar, "KW", false);
    insta::assert_snapshot!(nfa.dump(), @r"
    S0: [i] -> S1
    S1: [f] -> S2
    S2:
    ");
    assert_eq!((fragment.start.as_u32(), fragment.end.as_u32()), (0, 2));

    let (nfa, fragment) = compile(&grammar, "E", false);
    assert_eq!(nfa.len(), 1);
    assert_eq!(fragment.start, fragment.end);
}

#[test]
fn sequence_adds_no_states() {
    let grammar = tokens([
        ("A", RegexExpr::lit("ab")),
        ("B", RegexExpr::chars([('0', '9')])),
        ("C", RegexExpr::seq([RegexExpr::name("A"), RegexExpr::name("B")])),
    ]);

    let a = compile(&grammar, "A", false).0.len();
    let b = compile(&grammar, "B", false).0.len();
    let (nfa, fragment) = compile(&grammar, "C", false);

    assert_eq!(nfa.len(), a + b);
    assert!(fragment_matches(&nfa, fragment, "ab7"));
    assert!(!fragment_matches(&nfa, fragment, "ab"));
}

#[test]
fn choice_is_associative() {
    let ab = || RegexExpr::lit("ab");
    let cd = || RegexExpr::lit("cd");
    let ef = || RegexExpr::lit("ef");
    let grammar = tokens([
        ("L", RegexExpr::choice([RegexExpr::choice([ab(), cd()]), ef()])),
        ("R", RegexExpr::choice([ab(), RegexExpr::choice([cd(), ef()])])),
    ]);

    let left = words(&grammar, "L", "abcdef", 2);
    let right = words(&grammar, "R", "abcdef", 2);

    assert_eq!(left, ["ab", "cd", "ef"]);
    assert_eq!(left, right);
    assert_eq!(compile(&grammar, "L", false).0.len(), compile(&grammar, "R", false).0.len());
}

#[test]
fn single_character_alternatives_merge() {
    let grammar = tokens([
        ("AB", RegexExpr::choice([RegexExpr::lit("a"), RegexExpr::lit("b")])),
        (
            "MIX",
            RegexExpr::choice([
                RegexExpr::lit("cd"),
                RegexExpr::lit("a"),
                RegexExpr::chars([('x', 'z')]),
                RegexExpr::lit("b"),
            ]),
        ),
    ]);

    let (nfa, _) = compile(&grammar, "AB", false);
    insta::assert_snapshot!(nfa.dump(), @r"
    S0: [a-b] -> S1
    S1:
    ");

    let (nfa, fragment) = compile(&grammar, "MIX", false);
    // "cd" chain, one merged list, fresh start and end.
    assert_eq!(nfa.len(), 3 + 2 + 2);
    assert_eq!(words(&grammar, "MIX", "abcdxz", 2), ["a", "b", "cd", "x", "z"]);
    assert!(!has_epsilon_cycle(&nfa));
    assert!(fragment_matches(&nfa, fragment, "y"));
}

#[test]
fn negated_lists_are_denegated_before_merging() {
    let grammar = tokens([(
        "NOT",
        RegexExpr::choice([RegexExpr::not_chars([('a', 'y')]), RegexExpr::lit("b")]),
    )]);

    let (nfa, fragment) = compile(&grammar, "NOT", false);

    assert_eq!(nfa.len(), 2);
    assert!(fragment_matches(&nfa, fragment, "z"));
    assert!(fragment_matches(&nfa, fragment, "b"));
    assert!(fragment_matches(&nfa, fragment, "0"));
    assert!(!fragment_matches(&nfa, fragment, "c"));
}

#[test]
fn loops_and_optionals() {
    let grammar = tokens([
        ("PLUS", RegexExpr::lit("a").one_or_more()),
        ("STAR", RegexExpr::lit("a").zero_or_more()),
        ("OPT", RegexExpr::lit("a").optional()),
    ]);

    assert_eq!(words(&grammar, "PLUS", "ab", 3), ["a", "aa", "aaa"]);
    assert_eq!(words(&grammar, "STAR", "ab", 2), ["", "a", "aa"]);
    assert_eq!(words(&grammar, "OPT", "ab", 3), ["", "a"]);
}

#[test]
fn repetition_ranges_unroll() {
    let grammar = tokens([
        ("TWO_THREE", RegexExpr::lit("a").repeat(2, Some(3))),
        ("ONE_UP", RegexExpr::lit("a").repeat(1, None)),
        ("NONE", RegexExpr::lit("a").repeat(0, Some(0))),
    ]);

    let (nfa, _) = compile(&grammar, "TWO_THREE", false);
    // Two mandatory copies, one optional copy with its own start and end.
    assert_eq!(nfa.len(), 2 + 2 + 4);
    assert_eq!(words(&grammar, "TWO_THREE", "a", 4), ["aa", "aaa"]);
    assert_eq!(words(&grammar, "ONE_UP", "a", 3), ["a", "aa", "aaa"]);
    assert_eq!(words(&grammar, "NONE", "a", 2), [""]);
}

#[test]
fn ignore_case_adds_variants() {
    let grammar = tokens([
        ("KW", RegexExpr::lit("If")),
        ("HEX", RegexExpr::chars([('a', 'f')])),
    ]);

    let (nfa, fragment) = compile(&grammar, "KW", true);
    for input in ["if", "IF", "iF", "If"] {
        assert!(fragment_matches(&nfa, fragment, input), "{input}");
    }

    let (nfa, fragment) = compile(&grammar, "HEX", true);
    assert!(fragment_matches(&nfa, fragment, "C"));
    assert!(!fragment_matches(&nfa, fragment, "G"));
}

#[test]
fn ignore_case_folds_before_negating() {
    let grammar = tokens([
        ("NOT_A", RegexExpr::not_chars([('a', 'a')])),
        ("NOT_A_OR_B", RegexExpr::choice([RegexExpr::not_chars([('a', 'a')]), RegexExpr::lit("b")])),
    ]);

    let (nfa, fragment) = compile(&grammar, "NOT_A", true);
    assert_eq!(nfa.len(), 2);
    assert!(!fragment_matches(&nfa, fragment, "a"));
    assert!(!fragment_matches(&nfa, fragment, "A"));
    assert!(fragment_matches(&nfa, fragment, "b"));
    assert!(fragment_matches(&nfa, fragment, "\u{10FFFF}"));

    let (nfa, fragment) = compile(&grammar, "NOT_A_OR_B", true);
    assert!(!fragment_matches(&nfa, fragment, "A"));
    assert!(fragment_matches(&nfa, fragment, "B"));
}

#[test]
fn inverted_range_is_kept_and_matches_nothing() {
    let grammar = tokens([("BAD", RegexExpr::chars([('z', 'a')]))]);

    let (nfa, fragment) = compile(&grammar, "BAD", false);

    assert_eq!(nfa.len(), 2);
    assert!(!fragment_matches(&nfa, fragment, "m"));
}

#[test]
fn reference_loop_terminates() {
    let grammar = tokens([
        ("A", RegexExpr::seq([RegexExpr::lit("a"), RegexExpr::name("B")])),
        ("B", RegexExpr::name("A").optional()),
    ]);

    let (nfa, fragment) = compile(&grammar, "A", false);

    assert!(fragment_matches(&nfa, fragment, "a"));
    assert!(fragment_matches(&nfa, fragment, "aa"));
}
