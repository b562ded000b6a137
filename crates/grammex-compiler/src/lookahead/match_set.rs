//! Bounded FIRST and FOLLOW computation over the expansion graph.
//!
//! Matches are token-ordinal prefixes no longer than the engine's limit.
//! Every computation returns a [`MatchSets`]: `live` matches that may still
//! be extended by whatever comes next, and `reached` matches that hit the
//! limit and are final.
//!
//! FOLLOW walks up through parents and across productions, so it can revisit
//! nodes on recursive grammars. Each node carries a generation stamp in the
//! engine; a walk never re-enters a node already stamped with its own
//! generation.

use std::collections::HashSet;

use grammex_core::{Expansion, Grammar, NodeId, Ordinal, Parent};
use log::trace;

/// A partial match: a prefix of token ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MatchInfo {
    tokens: Vec<Ordinal>,
    /// Set once a token was appended during the current FOLLOW step.
    extended: bool,
}

impl MatchInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = Ordinal>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            extended: false,
        }
    }

    pub fn tokens(&self) -> &[Ordinal] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn extended_with(&self, ordinal: Ordinal) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(ordinal);
        Self {
            tokens,
            extended: true,
        }
    }

    fn unextended(mut self) -> Self {
        self.extended = false;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSets {
    /// Matches shorter than the limit that end where the walked expansion ends.
    pub live: Vec<MatchInfo>,
    /// Matches of exactly the limit length.
    pub reached: Vec<MatchInfo>,
    /// A code-only production is entered before any token is consumed.
    pub forced: bool,
}

impl MatchSets {
    fn live(live: Vec<MatchInfo>) -> Self {
        Self {
            live,
            ..Self::default()
        }
    }

    fn absorb(&mut self, other: MatchSets) -> Vec<MatchInfo> {
        self.reached.extend(other.reached);
        self.forced |= other.forced;
        other.live
    }

    fn merge(&mut self, other: MatchSets) {
        let live = self.absorb(other);
        self.live.extend(live);
    }
}

/// Match-set engine for one top-level lookahead query.
pub struct MatchSetEngine<'g> {
    grammar: &'g Grammar,
    limit: usize,
    semantic_opaque: bool,
    stamps: Vec<u32>,
    generation: u32,
}

impl<'g> MatchSetEngine<'g> {
    pub fn new(grammar: &'g Grammar, limit: usize) -> Self {
        Self {
            grammar,
            limit,
            semantic_opaque: false,
            stamps: vec![0; grammar.node_count()],
            generation: 0,
        }
    }

    /// When set, semantic lookahead contributes no matches.
    pub fn set_semantic_opaque(&mut self, value: bool) {
        self.semantic_opaque = value;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// A generation no node has been stamped with yet.
    pub fn next_generation(&mut self) -> u32 {
        self.generation += 1;
        trace!("follow generation {}", self.generation);
        self.generation
    }

    /// Extends every partial by the token sequences `node` can derive.
    pub fn first_set(&self, partials: &[MatchInfo], node: NodeId) -> MatchSets {
        match self.grammar.expansion(node) {
            Expansion::Regex(regex) => {
                // Regular expressions in BNF position always carry an ordinal.
                let ordinal = regex.ordinal.unwrap_or(Ordinal::EOF);
                let mut out = MatchSets::default();
                for partial in partials {
                    let next = partial.extended_with(ordinal);
                    if next.len() >= self.limit {
                        out.reached.push(next);
                    } else {
                        out.live.push(next);
                    }
                }
                out
            }
            Expansion::NonTerminal(target) => match self.grammar.production(*target).root() {
                Some(root) => self.first_set(partials, root),
                None => MatchSets {
                    forced: partials.iter().any(MatchInfo::is_empty),
                    ..MatchSets::default()
                },
            },
            Expansion::Choice(alts) => {
                let mut out = MatchSets::default();
                for &alt in alts {
                    out.merge(self.first_set(partials, alt));
                }
                out
            }
            Expansion::Sequence(units) => self.first_through(partials, units),
            Expansion::OneOrMore(body) => self.repeat(partials, *body, false),
            Expansion::ZeroOrMore(body) => self.repeat(partials, *body, true),
            Expansion::ZeroOrOne(body) => {
                let mut out = MatchSets::live(partials.to_vec());
                out.merge(self.first_set(partials, *body));
                out
            }
            Expansion::TryBlock(body) => self.first_set(partials, *body),
            Expansion::Lookahead(la) if self.semantic_opaque && la.has_semantic_action() => {
                MatchSets::default()
            }
            Expansion::Lookahead(_) | Expansion::Action(_) => MatchSets::live(partials.to_vec()),
        }
    }

    /// Threads partials through `units` left to right.
    fn first_through(&self, partials: &[MatchInfo], units: &[NodeId]) -> MatchSets {
        let mut out = MatchSets::default();
        let mut live = partials.to_vec();
        for &unit in units {
            let step = self.first_set(&live, unit);
            live = out.absorb(step);
            if live.is_empty() {
                break;
            }
        }
        out.live = live;
        out
    }

    /// Repeated application of `body`.
    ///
    /// Only matches not produced by an earlier round feed the next one, so
    /// the loop ends even when the body can derive the empty sequence.
    fn repeat(&self, partials: &[MatchInfo], body: NodeId, include_input: bool) -> MatchSets {
        let mut out = MatchSets::default();
        let mut seen: HashSet<MatchInfo> = HashSet::new();
        if include_input {
            seen.extend(partials.iter().cloned());
            out.live.extend(partials.iter().cloned());
        }

        let mut frontier = partials.to_vec();
        loop {
            let step = self.first_set(&frontier, body);
            frontier = out
                .absorb(step)
                .into_iter()
                .filter(|m| seen.insert(m.clone()))
                .collect();
            if frontier.is_empty() {
                break;
            }
            out.live.extend(frontier.iter().cloned());
        }
        out
    }

    /// Matches that can follow `node` once it finishes.
    pub fn follow_set(&mut self, partials: Vec<MatchInfo>, node: NodeId, generation: u32) -> MatchSets {
        let stamp = &mut self.stamps[node.index()];
        if *stamp == generation {
            return MatchSets::default();
        }
        *stamp = generation;

        let grammar = self.grammar;
        match grammar.node(node).parent {
            Parent::None => MatchSets::live(partials),
            Parent::Production(production) => {
                let mut out = MatchSets::default();
                for &referrer in &grammar.production(production).referrers {
                    out.merge(self.follow_set(partials.clone(), referrer, generation));
                }
                out
            }
            Parent::Node(parent) => match grammar.expansion(parent) {
                Expansion::Sequence(units) => {
                    let base = grammar.node(node).ordinal_base as usize;
                    let tail = units.get(base + 1..).unwrap_or_default();
                    let partials: Vec<_> = partials.into_iter().map(MatchInfo::unextended).collect();
                    let step = self.first_through(&partials, tail);
                    if step.live.is_empty() {
                        return MatchSets {
                            live: Vec::new(),
                            ..step
                        };
                    }
                    self.split_follow(step, parent, generation)
                }
                Expansion::OneOrMore(_) | Expansion::ZeroOrMore(_) => {
                    let partials: Vec<_> = partials.into_iter().map(MatchInfo::unextended).collect();
                    let step = self.repeat(&partials, node, true);
                    self.split_follow(step, parent, generation)
                }
                _ => self.follow_set(partials, parent, generation),
            },
        }
    }

    /// Continues FOLLOW from `parent`: matches this step left untouched keep
    /// the current generation, extended ones start a fresh one.
    fn split_follow(&mut self, step: MatchSets, parent: NodeId, generation: u32) -> MatchSets {
        let mut out = MatchSets {
            live: Vec::new(),
            reached: step.reached,
            forced: step.forced,
        };
        let (unchanged, extended): (Vec<_>, Vec<_>) =
            step.live.into_iter().partition(|m| !m.extended);

        // Unchanged matches go first; a fresh walk restamps shared ancestors.
        if !unchanged.is_empty() {
            out.merge(self.follow_set(unchanged, parent, generation));
        }
        if !extended.is_empty() {
            let fresh = self.next_generation();
            out.merge(self.follow_set(extended, parent, fresh));
        }
        out
    }
}
