use super::*;

fn id_token() -> TokenDef {
    TokenDef::new(TokenKind::Token).spec(TokenSpec::labeled(
        "ID",
        RegexExpr::chars([('a', 'z')]).one_or_more(),
    ))
}

#[test]
fn links_productions_tokens_and_alternatives() {
    let grammar = GrammarBuilder::new()
        .tokens(id_token())
        .production(
            "Start",
            Expr::choice([
                Expr::seq([Expr::lit("if"), Expr::nt("Start")]),
                Expr::token("ID"),
            ]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(grammar.dump(), @r#"
    P0 Start = N2
    T0 TOKEN <DEFAULT>: N0
    T1 TOKEN <DEFAULT>: N5
    N0: ROneOrMore(N1) <ID> #1
    N1: [a-z] ^N0
    N2: Choice(N3, N7) ^P0
    N3: Sequence(N4, N5, N6) ^N2
    N4: Lookahead(implicit) scan N3 ^N3
    N5: "if" #2 ^N3
    N6: NonTerminal(Start) ^N3
    N7: Sequence(N8, N9) ^N2
    N8: Lookahead(implicit) scan N7 ^N7
    N9: Ref(N0) <ID> #1 ^N7
    "#);
}

#[test]
fn sequence_positions_and_referrers() {
    let grammar = GrammarBuilder::new()
        .production("A", Expr::seq([Expr::lit("x"), Expr::nt("B"), Expr::nt("B")]))
        .production("B", Expr::lit("y"))
        .build()
        .unwrap();

    let a = grammar.production_by_name("A").unwrap();
    let b = grammar.production_by_name("B").unwrap();
    let Some(root) = grammar.production(a).root() else {
        panic!("A has a BNF body");
    };
    let Expansion::Sequence(units) = grammar.expansion(root) else {
        panic!("A is a sequence");
    };

    let bases: Vec<_> = units.iter().map(|&u| grammar.node(u).ordinal_base).collect();
    assert_eq!(bases, [0, 1, 2]);
    assert_eq!(grammar.production(b).referrers, [units[1], units[2]]);
    assert!(grammar.production(a).referrers.is_empty());
    assert_eq!(grammar.node(root).parent, Parent::Production(a));
}

#[test]
fn inline_literal_reuses_declared_token() {
    let grammar = GrammarBuilder::new()
        .tokens(
            TokenDef::new(TokenKind::Token)
                .spec(TokenSpec::labeled("IF", RegexExpr::lit("if")))
                .spec(TokenSpec::labeled("ELSE", RegexExpr::lit("else"))),
        )
        .production("S", Expr::seq([Expr::lit("else"), Expr::lit("then")]))
        .build()
        .unwrap();

    insta::assert_snapshot!(grammar.dump(), @r#"
    P0 S = N2
    T0 TOKEN <DEFAULT>: N0, N1
    T1 TOKEN <DEFAULT>: N4
    N0: "if" <IF> #1
    N1: "else" <ELSE> #2
    N2: Sequence(N3, N4) ^P0
    N3: "else" #2 ^N2
    N4: "then" #3 ^N2
    "#);
    assert_eq!(grammar.token_count(), 4);
}

#[test]
fn literal_in_other_state_is_not_reused() {
    let grammar = GrammarBuilder::new()
        .tokens(
            TokenDef::new(TokenKind::Token)
                .in_states(["STRING"])
                .spec(TokenSpec::new(RegexExpr::lit("\""))),
        )
        .production("S", Expr::lit("\""))
        .build()
        .unwrap();

    let root = grammar.production(ProdId::from_raw(0)).root().unwrap();
    assert_eq!(grammar.regex(root).unwrap().ordinal, Some(Ordinal::new(2)));
}

#[test]
fn explicit_lookahead_alternative_is_kept() {
    let grammar = GrammarBuilder::new()
        .production(
            "S",
            Expr::choice([
                Expr::seq([Expr::lookahead(2), Expr::lit("a"), Expr::lit("b")]),
                Expr::lit("a"),
            ]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(grammar.printer().show_parents(false).dump(), @r#"
    P0 S = N0
    T0 TOKEN <DEFAULT>: N3, N4
    N0: Choice(N1, N5)
    N1: Sequence(N2, N3, N4)
    N2: Lookahead(2) scan N1
    N3: "a" #1
    N4: "b" #2
    N5: Sequence(N6, N7)
    N6: Lookahead(implicit) scan N5
    N7: "a" #1
    "#);
}

#[test]
fn syntactic_lookahead_scans_nested_expansion() {
    let grammar = GrammarBuilder::new()
        .production(
            "S",
            Expr::seq([
                Expr::Lookahead {
                    amount: None,
                    semantic: None,
                    syntactic: Some(Box::new(Expr::lit("a"))),
                },
                Expr::lit("a"),
            ]),
        )
        .build()
        .unwrap();

    let Expansion::Lookahead(la) = grammar.expansion(NodeId::from_raw(1)) else {
        panic!("first unit is the lookahead");
    };
    assert!(la.explicit);
    assert_eq!(la.expansion, NodeId::from_raw(2));
    assert_eq!(grammar.node(la.expansion).parent, Parent::Node(NodeId::from_raw(1)));
}

#[test]
fn token_states_and_labels() {
    let grammar = GrammarBuilder::new()
        .tokens(
            TokenDef::new(TokenKind::Skip)
                .spec(TokenSpec::new(RegexExpr::lit("/*")).next_state("IN_COMMENT")),
        )
        .tokens(
            TokenDef::new(TokenKind::Skip)
                .in_states(["IN_COMMENT"])
                .spec(TokenSpec::new(RegexExpr::lit("*/")).next_state("DEFAULT")),
        )
        .tokens(
            TokenDef::new(TokenKind::Token)
                .spec(TokenSpec::labeled("DIGIT", RegexExpr::chars([('0', '9')])).private())
                .spec(TokenSpec::labeled(
                    "NUMBER",
                    RegexExpr::name("DIGIT").one_or_more(),
                )),
        )
        .build()
        .unwrap();

    let states: Vec<_> = grammar.lexical_states().map(|s| grammar.resolve(s)).collect();
    assert_eq!(states, ["DEFAULT", "IN_COMMENT"]);

    let digit = grammar.named_token("DIGIT").unwrap();
    let number = grammar.named_token("NUMBER").unwrap();
    assert!(grammar.regex(digit).unwrap().private);
    assert_eq!(grammar.regex(digit).unwrap().ordinal, Some(Ordinal::new(3)));
    assert_eq!(grammar.regex(number).unwrap().ordinal, Some(Ordinal::new(4)));
    assert_eq!(grammar.token(Ordinal::new(4)), Some(number));
    assert_eq!(grammar.token(Ordinal::EOF), None);
    assert_eq!(
        grammar.token_context(Ordinal::new(1)).map(|tp| tp.kind),
        Some(TokenKind::Skip)
    );

    let RegexKind::OneOrMore(body) = grammar.regex(number).unwrap().kind else {
        panic!("NUMBER is a repetition");
    };
    assert_eq!(grammar.regex(body).unwrap().kind, RegexKind::JustName(digit));
}

#[test]
fn locations_propagate_to_nested_nodes() {
    let grammar = GrammarBuilder::new()
        .production(
            "S",
            Expr::seq([Expr::lit("a").at(3, 5), Expr::lit("b")]).at(3, 1),
        )
        .build()
        .unwrap();

    let s = grammar.production(ProdId::from_raw(0));
    assert_eq!(s.location, Location::new(3, 1));
    assert_eq!(grammar.location(NodeId::from_raw(1)), Location::new(3, 5));
    assert_eq!(grammar.location(NodeId::from_raw(2)), Location::new(3, 1));
}

#[test]
fn code_production_has_no_root() {
    let grammar = GrammarBuilder::new()
        .code_production("skip_to_semicolon")
        .production("S", Expr::nt("skip_to_semicolon"))
        .build()
        .unwrap();

    let code = grammar.production_by_name("skip_to_semicolon").unwrap();
    assert!(grammar.production(code).is_code());
    assert_eq!(grammar.production(code).root(), None);
    assert_eq!(grammar.production(code).referrers.len(), 1);
}

#[test]
fn build_errors() {
    let undefined = GrammarBuilder::new()
        .production("S", Expr::nt("Missing").at(2, 4))
        .build();
    assert_eq!(
        undefined.unwrap_err().to_string(),
        "undefined production `Missing` at line 2, column 4"
    );

    let duplicate = GrammarBuilder::new()
        .production("S", Expr::lit("a"))
        .production("S", Expr::lit("b"))
        .build();
    assert_eq!(
        duplicate.unwrap_err(),
        BuildError::DuplicateProduction { name: "S".into() }
    );

    let unknown_token = GrammarBuilder::new()
        .production("S", Expr::token("NUM").at(1, 9))
        .build();
    assert_eq!(
        unknown_token.unwrap_err().to_string(),
        "undefined regular expression `<NUM>` at line 1, column 9"
    );

    let misplaced = GrammarBuilder::new()
        .production("S", Expr::seq([Expr::lit("a"), Expr::lookahead(2).at(1, 3)]))
        .build();
    assert_eq!(
        misplaced.unwrap_err(),
        BuildError::MisplacedLookahead {
            location: Location::new(1, 3)
        }
    );

    let duplicate_label = GrammarBuilder::new()
        .tokens(id_token())
        .tokens(id_token())
        .build();
    assert_eq!(
        duplicate_label.unwrap_err(),
        BuildError::DuplicateToken { label: "ID".into() }
    );

    let free_standing = GrammarBuilder::new()
        .tokens(id_token())
        .tokens(
            TokenDef::new(TokenKind::Token)
                .spec(TokenSpec::new(RegexExpr::name("ID")).at(4, 2)),
        )
        .build();
    assert_eq!(
        free_standing.unwrap_err().to_string(),
        "free-standing regular expression reference `<ID>` at line 4, column 2"
    );
}
