//! Per-lexical-state automata and token bookkeeping.

use grammex_core::{Grammar, NodeId, Ordinal, RegexKind, TokenKind};
use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use super::build::{Nfa, NfaBuilder, StateId};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::options::Options;

/// Everything the lexer generator consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexerTables {
    pub states: IndexMap<String, LexicalStateTable>,
    /// Indexed by ordinal; entry 0 is end of file.
    pub tokens: Vec<TokenInfo>,
    pub eof: Option<EofAction>,
}

impl LexerTables {
    pub fn state(&self, name: &str) -> Option<&LexicalStateTable> {
        self.states.get(name)
    }

    pub fn token(&self, ordinal: Ordinal) -> Option<&TokenInfo> {
        self.tokens.get(ordinal.as_u32() as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalStateTable {
    pub nfa: Nfa,
    pub initial: StateId,
    /// Epsilon closure of every state, indexed by state.
    pub closures: Vec<Vec<StateId>>,
}

impl LexicalStateTable {
    /// Ordinals accepted somewhere in this state's automaton.
    pub fn accepted(&self) -> Vec<Ordinal> {
        self.nfa.states().filter_map(|(_, s)| s.accepts).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub label: Option<String>,
    pub kind: Option<TokenKind>,
    pub states: Vec<String>,
    /// Lexical state entered after the match, when it differs.
    pub next_state: Option<String>,
    pub action: Option<String>,
    pub ignore_case: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EofAction {
    pub action: Option<String>,
    pub next_state: Option<String>,
}

/// Compiles every token production into per-state automata.
pub fn build_lexer(grammar: &Grammar, options: &Options, diag: &mut Diagnostics) -> Result<LexerTables, Error> {
    let mut tables = LexerTables {
        tokens: vec![TokenInfo::default(); grammar.token_count()],
        ..LexerTables::default()
    };
    tables.tokens[0].label = Some("EOF".to_string());

    for (_, tp) in grammar.token_productions() {
        let ignore_case = tp.ignore_case || options.ignore_case;
        let states: Vec<String> = tp.states.iter().map(|&s| grammar.resolve(s).to_owned()).collect();

        for spec in &tp.specs {
            let Some(regex) = grammar.regex(spec.regex) else {
                continue;
            };
            let next_state = spec.next_state.map(|s| grammar.resolve(s).to_owned());

            if matches!(regex.kind, RegexKind::EndOfFile) {
                tables.eof = Some(EofAction {
                    action: spec.action.clone(),
                    next_state,
                });
                continue;
            }
            let Some(ordinal) = regex.ordinal else {
                continue;
            };
            let stays = states.len() == 1 && next_state.as_deref() == Some(states[0].as_str());
            tables.tokens[ordinal.as_u32() as usize] = TokenInfo {
                label: regex.label.map(|l| grammar.resolve(l).to_owned()),
                kind: Some(tp.kind),
                states: states.clone(),
                next_state: next_state.filter(|_| !stays),
                action: spec.action.clone(),
                ignore_case,
            };

            check_unmatchable(grammar, spec.regex, diag);
        }
    }

    for state in grammar.lexical_states() {
        let name = grammar.resolve(state);
        let mut nfa = Nfa::new();
        let initial = nfa.add_state();
        let mut builder = NfaBuilder::new(grammar, &mut nfa);
        let mut accepting = Vec::new();

        for (_, tp) in grammar.token_productions() {
            if !tp.states.contains(&state) {
                continue;
            }
            let ignore_case = tp.ignore_case || options.ignore_case;
            for spec in &tp.specs {
                let Some(regex) = grammar.regex(spec.regex) else {
                    continue;
                };
                if regex.private || matches!(regex.kind, RegexKind::EndOfFile) {
                    continue;
                }
                let Some(ordinal) = regex.ordinal else {
                    continue;
                };
                let fragment = builder.compile(spec.regex, ignore_case);
                accepting.push((fragment, ordinal));
            }
        }

        for (fragment, ordinal) in accepting {
            nfa.add_epsilon(initial, fragment.start);
            nfa.state_mut(fragment.end).accepts = Some(ordinal);
        }

        debug!("lexical state {name}: {} NFA states", nfa.len());
        if let Some(limit) = options.nfa_state_limit
            && nfa.len() > limit
        {
            return Err(Error::NfaStateLimitExceeded {
                state: name.to_owned(),
                limit,
            });
        }

        let closures = nfa.epsilon_closures();
        tables.states.insert(
            name.to_owned(),
            LexicalStateTable {
                nfa,
                initial,
                closures,
            },
        );
    }

    Ok(tables)
}

/// Warns about choice alternatives naming an earlier token of the same
/// lexical state: the earlier token always wins.
fn check_unmatchable(grammar: &Grammar, node: NodeId, diag: &mut Diagnostics) {
    let Some(choice) = grammar.regex(node) else {
        return;
    };
    let RegexKind::Choice(alts) = &choice.kind else {
        return;
    };
    let Some(ordinal) = choice.ordinal else {
        return;
    };
    let states = choice
        .context
        .map(|c| grammar.token_production(c).states.as_slice())
        .unwrap_or_default();

    for &alt in alts {
        let Some(RegexKind::JustName(target)) = grammar.regex(alt).map(|r| &r.kind) else {
            continue;
        };
        let Some(target_regex) = grammar.regex(*target) else {
            continue;
        };
        let Some(target_ordinal) = target_regex.ordinal else {
            continue;
        };
        if target_regex.private || target_ordinal.is_eof() || target_ordinal >= ordinal {
            continue;
        }
        let shares_state = target_regex
            .context
            .map(|c| grammar.token_production(c).states.iter().any(|s| states.contains(s)))
            .unwrap_or(false);
        if !shares_state {
            continue;
        }

        let name = grammar.label(*target).unwrap_or_default();
        let detail = match grammar.label(node) {
            Some(label) => format!("<{name}> can never be matched as <{label}>"),
            None => format!("<{name}> can never be matched as token of kind {ordinal}"),
        };
        trace!("unmatchable alternative {alt} of {node}");
        diag.report(DiagnosticKind::UnmatchableRegex, grammar.location(node))
            .message(detail)
            .emit();
    }
}
