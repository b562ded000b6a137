//! Text dump of NFAs and lexer tables for snapshot tests and debugging.

use std::fmt::Write;

use grammex_core::CharRange;

use super::build::{Nfa, NfaState};
use super::lexer::LexerTables;

impl Nfa {
    pub fn dump(&self) -> String {
        let mut out = String::new();
        format_nfa(self, &mut out).expect("String write never fails");
        out
    }
}

impl LexerTables {
    pub fn dump(&self) -> String {
        let mut out = String::new();
        format_tables(self, &mut out).expect("String write never fails");
        out
    }
}

fn format_tables(tables: &LexerTables, w: &mut String) -> std::fmt::Result {
    for (name, state) in &tables.states {
        writeln!(w, "<{name}> start {}", state.initial)?;
        format_nfa(&state.nfa, w)?;
    }
    for (ordinal, token) in tables.tokens.iter().enumerate().skip(1) {
        let Some(kind) = token.kind else {
            continue;
        };
        write!(w, "#{ordinal} {kind}")?;
        if let Some(label) = &token.label {
            write!(w, " <{label}>")?;
        }
        write!(w, " in {}", token.states.join(", "))?;
        if let Some(next) = &token.next_state {
            write!(w, " -> {next}")?;
        }
        if token.ignore_case {
            w.push_str(" ignore_case");
        }
        if let Some(action) = &token.action {
            write!(w, " {{{action}}}")?;
        }
        writeln!(w)?;
    }
    if let Some(eof) = &tables.eof {
        write!(w, "<EOF>")?;
        if let Some(next) = &eof.next_state {
            write!(w, " -> {next}")?;
        }
        if let Some(action) = &eof.action {
            write!(w, " {{{action}}}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn format_nfa(nfa: &Nfa, w: &mut String) -> std::fmt::Result {
    for (id, state) in nfa.states() {
        write!(w, "{id}:")?;
        format_state(state, w)?;
        writeln!(w)?;
    }
    Ok(())
}

fn format_state(state: &NfaState, w: &mut String) -> std::fmt::Result {
    if let Some(next) = state.next {
        write!(w, " {} -> {next}", class_image(&state.class))?;
    }
    if !state.epsilon.is_empty() {
        let targets: Vec<_> = state.epsilon.iter().map(|s| s.to_string()).collect();
        write!(w, " ε -> {}", targets.join(" "))?;
    }
    if let Some(ordinal) = state.accepts {
        write!(w, " accept #{ordinal}")?;
    }
    Ok(())
}

fn class_image(class: &[CharRange]) -> String {
    let mut out = String::from("[");
    for range in class {
        out.extend(range.low.escape_debug());
        if range.high != range.low {
            out.push('-');
            out.extend(range.high.escape_debug());
        }
    }
    out.push(']');
    out
}
