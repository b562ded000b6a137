//! Regular expression to NFA compilation.
//!
//! Each regex node compiles into a [`Fragment`] of fresh states in a shared
//! [`Nfa`] arena. Literal characters and character lists become labeled
//! moves; every combinator is wired with epsilon moves.

use std::fmt;

use grammex_core::{CharRange, Grammar, NodeId, Ordinal, RegexKind};
use serde::Serialize;

use super::char_class::{char_class, list_class, normalize};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NfaState {
    /// Characters consumed on the move to `next`.
    pub class: Vec<CharRange>,
    pub next: Option<StateId>,
    pub epsilon: Vec<StateId>,
    /// Token ordinal recognized on reaching this state.
    pub accepts: Option<Ordinal>,
}

/// State arena shared by every fragment of one lexical state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(NfaState::default());
        id
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut NfaState {
        &mut self.states[id.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &NfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s))
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        let epsilon = &mut self.state_mut(from).epsilon;
        if !epsilon.contains(&to) {
            epsilon.push(to);
        }
    }

    pub fn add_move(&mut self, from: StateId, class: Vec<CharRange>, to: StateId) {
        let state = self.state_mut(from);
        state.class = class;
        state.next = Some(to);
    }

    /// States reachable from `id` through epsilon moves alone, `id` included.
    pub fn epsilon_closure(&self, id: StateId) -> Vec<StateId> {
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![id];
        let mut out = Vec::new();
        while let Some(state) = stack.pop() {
            if std::mem::replace(&mut seen[state.index()], true) {
                continue;
            }
            out.push(state);
            stack.extend(self.state(state).epsilon.iter().rev().copied());
        }
        out.sort();
        out
    }

    pub fn epsilon_closures(&self) -> Vec<Vec<StateId>> {
        self.states().map(|(id, _)| self.epsilon_closure(id)).collect()
    }
}

/// A compiled regex: enter at `start`, done at `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// One alternative of a normalized regex choice.
enum Alternative {
    Node(NodeId),
    Chars(Vec<CharRange>),
}

pub struct NfaBuilder<'a> {
    grammar: &'a Grammar,
    nfa: &'a mut Nfa,
    /// Named regexes currently being inlined.
    active: Vec<NodeId>,
}

impl<'a> NfaBuilder<'a> {
    pub fn new(grammar: &'a Grammar, nfa: &'a mut Nfa) -> Self {
        Self {
            grammar,
            nfa,
            active: Vec::new(),
        }
    }

    pub fn compile(&mut self, node: NodeId, ignore_case: bool) -> Fragment {
        let grammar = self.grammar;
        let Some(regex) = grammar.regex(node) else {
            return self.empty();
        };
        match &regex.kind {
            RegexKind::StringLiteral(text) => self.literal(text, ignore_case),
            RegexKind::CharacterList { ranges, negated } => {
                let class = list_class(ranges, *negated, ignore_case);
                self.chars(class)
            }
            RegexKind::EndOfFile => self.empty(),
            RegexKind::JustName(target) => {
                if self.active.contains(target) {
                    return self.empty();
                }
                self.active.push(*target);
                let fragment = self.compile(*target, ignore_case);
                self.active.pop();
                fragment
            }
            RegexKind::Sequence(units) => {
                let parts = units.iter().map(|&unit| self.compile(unit, ignore_case)).collect();
                self.chain(parts)
            }
            RegexKind::Choice(alts) => self.choice(alts, ignore_case),
            RegexKind::OneOrMore(body) => {
                let body = self.compile(*body, ignore_case);
                self.one_or_more(body)
            }
            RegexKind::ZeroOrMore(body) => {
                let body = self.compile(*body, ignore_case);
                self.zero_or_more(body)
            }
            RegexKind::ZeroOrOne(body) => {
                let body = self.compile(*body, ignore_case);
                self.zero_or_one(body)
            }
            RegexKind::RepetitionRange { min, max, body } => {
                let mut parts = Vec::new();
                for _ in 0..*min {
                    parts.push(self.compile(*body, ignore_case));
                }
                match max {
                    None => {
                        let copy = self.compile(*body, ignore_case);
                        parts.push(self.zero_or_more(copy));
                    }
                    Some(max) => {
                        for _ in 0..max.saturating_sub(*min) {
                            let copy = self.compile(*body, ignore_case);
                            parts.push(self.zero_or_one(copy));
                        }
                    }
                }
                self.chain(parts)
            }
        }
    }

    fn empty(&mut self) -> Fragment {
        let state = self.nfa.add_state();
        Fragment {
            start: state,
            end: state,
        }
    }

    fn literal(&mut self, text: &str, ignore_case: bool) -> Fragment {
        let start = self.nfa.add_state();
        let mut end = start;
        for c in text.chars() {
            let next = self.nfa.add_state();
            self.nfa.add_move(end, char_class(c, ignore_case), next);
            end = next;
        }
        Fragment { start, end }
    }

    fn chars(&mut self, class: Vec<CharRange>) -> Fragment {
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.add_move(start, class, end);
        Fragment { start, end }
    }

    /// Sequential composition. Adds no states of its own.
    fn chain(&mut self, parts: Vec<Fragment>) -> Fragment {
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return self.empty();
        };
        let mut end = first.end;
        for part in parts {
            self.nfa.add_epsilon(end, part.start);
            end = part.end;
        }
        Fragment {
            start: first.start,
            end,
        }
    }

    fn one_or_more(&mut self, body: Fragment) -> Fragment {
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.add_epsilon(start, body.start);
        self.nfa.add_epsilon(body.end, body.start);
        self.nfa.add_epsilon(body.end, end);
        Fragment { start, end }
    }

    fn zero_or_more(&mut self, body: Fragment) -> Fragment {
        let fragment = self.one_or_more(body);
        self.nfa.add_epsilon(fragment.start, fragment.end);
        fragment
    }

    fn zero_or_one(&mut self, body: Fragment) -> Fragment {
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.add_epsilon(start, body.start);
        self.nfa.add_epsilon(start, end);
        self.nfa.add_epsilon(body.end, end);
        Fragment { start, end }
    }

    fn choice(&mut self, alts: &[NodeId], ignore_case: bool) -> Fragment {
        let alternatives = self.normalize_choice(alts, ignore_case);
        let mut fragments: Vec<Fragment> = alternatives
            .into_iter()
            .map(|alt| match alt {
                Alternative::Node(node) => self.compile(node, ignore_case),
                Alternative::Chars(class) => self.chars(class),
            })
            .collect();

        if fragments.len() == 1 {
            return fragments.remove(0);
        }
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        for fragment in fragments {
            self.nfa.add_epsilon(start, fragment.start);
            self.nfa.add_epsilon(fragment.end, end);
        }
        Fragment { start, end }
    }

    /// Flattens nested choices and merges every single-character
    /// alternative into one character list at the first such position.
    fn normalize_choice(&self, alts: &[NodeId], ignore_case: bool) -> Vec<Alternative> {
        let mut flat = Vec::new();
        let mut visited = Vec::new();
        self.flatten(alts, &mut flat, &mut visited);

        let mut out = Vec::with_capacity(flat.len());
        let mut merged: Option<(usize, Vec<CharRange>)> = None;
        for node in flat {
            let Some(ranges) = self.single_char_class(node, ignore_case) else {
                out.push(Alternative::Node(node));
                continue;
            };
            match &mut merged {
                Some((_, acc)) => acc.extend(ranges),
                None => {
                    merged = Some((out.len(), ranges));
                    out.push(Alternative::Chars(Vec::new()));
                }
            }
        }
        if let Some((at, ranges)) = merged {
            out[at] = Alternative::Chars(normalize(&ranges));
        }
        out
    }

    fn flatten(&self, alts: &[NodeId], out: &mut Vec<NodeId>, visited: &mut Vec<NodeId>) {
        for &alt in alts {
            let target = match self.grammar.regex(alt).map(|r| &r.kind) {
                Some(RegexKind::JustName(target)) => *target,
                _ => alt,
            };
            match self.grammar.regex(target).map(|r| &r.kind) {
                Some(RegexKind::Choice(inner)) => {
                    if visited.contains(&target) {
                        continue;
                    }
                    visited.push(target);
                    self.flatten(inner, out, visited);
                }
                _ => out.push(target),
            }
        }
    }

    /// Final class of a character list or one-character literal.
    fn single_char_class(&self, node: NodeId, ignore_case: bool) -> Option<Vec<CharRange>> {
        match &self.grammar.regex(node)?.kind {
            RegexKind::CharacterList { ranges, negated } => {
                Some(list_class(ranges, *negated, ignore_case))
            }
            RegexKind::StringLiteral(text) => {
                let mut chars = text.chars();
                let c = chars.next()?;
                chars.next().is_none().then(|| char_class(c, ignore_case))
            }
            _ => None,
        }
    }
}
