//! Test utilities: NFA simulation and snapshot helpers.

use std::collections::BTreeSet;

use grammex_core::{Grammar, GrammarBuilder, Ordinal};

use crate::nfa::{Fragment, Nfa, StateId};

/// Snapshot test for a lexer table dump.
#[macro_export]
macro_rules! shot_lexer {
    ($builder:expr, @$snapshot:literal) => {{
        let output = $crate::test_utils::lexer_dump($builder);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

pub fn lexer_dump(builder: GrammarBuilder) -> String {
    let grammar = builder.build().expect("grammar should link");
    let (compiled, diag) =
        crate::compile(grammar, &crate::Options::default()).expect("compile should not abort");
    assert!(!diag.has_errors(), "{}", diag.render());
    compiled.lexer.expect("lexer should be built").dump()
}

pub fn build(builder: GrammarBuilder) -> Grammar {
    builder.build().expect("grammar should link")
}

fn closure(nfa: &Nfa, states: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
    states
        .into_iter()
        .flat_map(|s| nfa.epsilon_closure(s))
        .collect()
}

fn step(nfa: &Nfa, states: &BTreeSet<StateId>, c: char) -> BTreeSet<StateId> {
    let moved = states.iter().filter_map(|&s| {
        let state = nfa.state(s);
        let next = state.next?;
        state.class.iter().any(|r| r.contains(c)).then_some(next)
    });
    closure(nfa, moved)
}

/// Whether `input` drives the fragment from its start to its end.
pub fn fragment_matches(nfa: &Nfa, fragment: Fragment, input: &str) -> bool {
    let mut current = closure(nfa, [fragment.start]);
    for c in input.chars() {
        current = step(nfa, &current, c);
    }
    current.contains(&fragment.end)
}

/// Ordinals accepted after reading all of `input` from `start`.
pub fn accepted(nfa: &Nfa, start: StateId, input: &str) -> BTreeSet<Ordinal> {
    let mut current = closure(nfa, [start]);
    for c in input.chars() {
        current = step(nfa, &current, c);
    }
    current.iter().filter_map(|&s| nfa.state(s).accepts).collect()
}

/// Every string over `alphabet` of at most `max_len` characters the
/// fragment matches.
pub fn language(nfa: &Nfa, fragment: Fragment, alphabet: &str, max_len: usize) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut frontier = vec![String::new()];
    for _ in 0..=max_len {
        let mut next = Vec::new();
        for word in frontier {
            if fragment_matches(nfa, fragment, &word) {
                out.insert(word.clone());
            }
            for c in alphabet.chars() {
                next.push(format!("{word}{c}"));
            }
        }
        frontier = next;
    }
    out
}

/// Whether some state reaches itself through epsilon moves alone.
pub fn has_epsilon_cycle(nfa: &Nfa) -> bool {
    nfa.states().any(|(id, state)| {
        state
            .epsilon
            .iter()
            .any(|&target| nfa.epsilon_closure(target).contains(&id))
    })
}
