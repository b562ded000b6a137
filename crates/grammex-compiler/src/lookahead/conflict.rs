//! Choice and loop conflict detection.
//!
//! Each construct is probed at increasing lookahead depths. A depth
//! resolves the construct once no competing pair of bounded FIRST/FOLLOW
//! matches agrees on their common prefix.

use grammex_core::{Expansion, Grammar, NodeId, Ordinal, RegexKind};
use log::debug;

use super::match_set::{MatchInfo, MatchSetEngine, MatchSets};
use super::Decision;
use crate::analyze::empty_expansion_exists;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::options::Options;

/// Whether `node` is a sequence headed by a user-written `LOOKAHEAD`.
pub(crate) fn explicit_lookahead(grammar: &Grammar, node: NodeId) -> bool {
    let Expansion::Sequence(units) = grammar.expansion(node) else {
        return false;
    };
    units.first().is_some_and(|&unit| {
        matches!(grammar.expansion(unit), Expansion::Lookahead(la) if la.explicit)
    })
}

/// Index of the first alternative the checks cover.
fn first_checked(grammar: &Grammar, options: &Options, alts: &[NodeId]) -> usize {
    if options.force_la_check {
        return 0;
    }
    alts.iter()
        .position(|&alt| !explicit_lookahead(grammar, alt))
        .unwrap_or(alts.len())
}

/// First pair of matches agreeing on their common length. The shorter one
/// is returned.
pub fn overlap(left: &[MatchInfo], right: &[MatchInfo]) -> Option<MatchInfo> {
    for m1 in left {
        for m2 in right {
            let size = m1.len().min(m2.len());
            if size == 0 {
                continue;
            }
            if m1.tokens()[..size] == m2.tokens()[..size] {
                let shorter = if m1.len() <= m2.len() { m1 } else { m2 };
                return Some(shorter.clone());
            }
        }
    }
    None
}

/// A non-empty complete derivation both sides share. No depth tells such
/// alternatives apart.
fn identical(left: &[MatchInfo], right: &[MatchInfo]) -> Option<MatchInfo> {
    left.iter()
        .filter(|m| !m.is_empty())
        .find(|m| right.iter().any(|other| other.tokens() == m.tokens()))
        .cloned()
}

fn choice_overlap(left: &MatchSets, right: &MatchSets) -> Option<MatchInfo> {
    overlap(&left.reached, &right.reached).or_else(|| identical(&left.live, &right.live))
}

/// Space-separated images of the tokens in `m`.
pub fn image(grammar: &Grammar, m: &MatchInfo) -> String {
    m.tokens()
        .iter()
        .map(|&ordinal| token_image(grammar, ordinal))
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_image(grammar: &Grammar, ordinal: Ordinal) -> String {
    if ordinal.is_eof() {
        return "<EOF>".to_string();
    }
    let Some(regex) = grammar.token_regex(ordinal) else {
        return format!("<token of kind {ordinal}>");
    };
    if let RegexKind::StringLiteral(text) = &regex.kind {
        return format!("\"{}\"", text.escape_default());
    }
    match regex.label {
        Some(label) => format!("<{}>", grammar.resolve(label)),
        None => format!("<token of kind {ordinal}>"),
    }
}

fn depth_hint(depth: u32, max: u32, target: &str) -> String {
    let or_more = if depth > max { " or more" } else { "" };
    format!("consider using a lookahead of {depth}{or_more} for the {target}")
}

/// Checks the alternatives of `choice` and returns one decision for every
/// alternative except the last, which is the default branch.
pub(crate) fn choice_calc(
    grammar: &Grammar,
    options: &Options,
    diag: &mut Diagnostics,
    choice: NodeId,
    alts: &[NodeId],
) -> Vec<Decision> {
    let n = alts.len();
    if n < 2 {
        return Vec::new();
    }
    let first = first_checked(grammar, options, alts);
    let max = options.choice_ambiguity_check;

    let mut min_la = vec![0u32; n];
    let mut other = vec![0usize; n];
    let mut shared: Vec<Option<MatchInfo>> = vec![None; n];
    let seed = [MatchInfo::new()];

    for la in 1..=max {
        let mut engine = MatchSetEngine::new(grammar, la as usize);
        engine.set_semantic_opaque(options.semantic_lookahead_opaque());
        let left: Vec<MatchSets> = (0..n)
            .map(|i| {
                if i >= first && i + 1 < n {
                    engine.first_set(&seed, alts[i])
                } else {
                    MatchSets::default()
                }
            })
            .collect();
        engine.set_semantic_opaque(false);
        let right: Vec<MatchSets> = (0..n)
            .map(|i| {
                if i > first {
                    engine.first_set(&seed, alts[i])
                } else {
                    MatchSets::default()
                }
            })
            .collect();

        if la == 1 {
            for i in first..n - 1 {
                let alt = alts[i];
                if empty_expansion_exists(grammar, alt) {
                    diag.report(DiagnosticKind::EmptyAlternative, grammar.location(alt))
                        .emit();
                    break;
                }
                if left[i].forced {
                    diag.report(DiagnosticKind::CodeForcedChoice, grammar.location(alt))
                        .emit();
                    break;
                }
            }
        }

        let mut overlapped = false;
        for i in first..n - 1 {
            for j in i + 1..n {
                if let Some(m) = choice_overlap(&left[i], &right[j]) {
                    min_la[i] = la + 1;
                    other[i] = j;
                    shared[i] = Some(m);
                    overlapped = true;
                    break;
                }
            }
        }
        if !overlapped {
            break;
        }
    }

    let mut decisions = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let alt = alts[i];
        if i < first || (explicit_lookahead(grammar, alt) && !options.force_la_check) {
            decisions.push(Decision::Explicit);
            continue;
        }

        let depth = min_la[i];
        if depth <= 1 {
            decisions.push(Decision::Resolved(1));
            continue;
        }

        let at = grammar.location(alt);
        let with = grammar.location(alts[other[i]]);
        let prefix = shared[i]
            .as_ref()
            .map(|m| image(grammar, m))
            .unwrap_or_default();
        debug!("choice {choice} alternative {i}: lookahead {depth} (max {max})");
        diag.report(DiagnosticKind::ChoiceConflict, at)
            .message(format!(
                "expansions at {at} and {with} share the prefix {prefix}"
            ))
            .related_to("conflicting expansion", with)
            .hint(depth_hint(depth, max, "earlier expansion"))
            .emit();

        decisions.push(if depth > max {
            Decision::Unresolved(max)
        } else {
            Decision::Resolved(depth)
        });
    }
    decisions
}

/// Checks a loop or optional `node` against whatever follows it.
pub(crate) fn ebnf_calc(
    grammar: &Grammar,
    options: &Options,
    diag: &mut Diagnostics,
    node: NodeId,
    body: NodeId,
) -> Decision {
    let max = options.other_ambiguity_check;
    let construct = grammar.expansion(node).construct_image();
    let seed = [MatchInfo::new()];
    let mut shared = None;

    let mut la = 1;
    while la <= max {
        let mut engine = MatchSetEngine::new(grammar, la as usize);
        engine.set_semantic_opaque(options.semantic_lookahead_opaque());
        let first = engine.first_set(&seed, body);
        engine.set_semantic_opaque(false);
        let generation = engine.next_generation();
        let follow = engine.follow_set(seed.to_vec(), node, generation);

        if la == 1 && first.forced {
            diag.report(DiagnosticKind::CodeForcedLoop, grammar.location(body))
                .message(construct)
                .emit();
        }

        match overlap(&first.reached, &follow.reached) {
            Some(m) => shared = Some(m),
            None => break,
        }
        la += 1;
    }

    if la <= 1 {
        return Decision::Resolved(1);
    }

    let at = grammar.location(node);
    let prefix = shared.as_ref().map(|m| image(grammar, m)).unwrap_or_default();
    debug!("{construct} at {at}: lookahead {la} (max {max})");
    diag.report(DiagnosticKind::LoopConflict, at)
        .message(format!(
            "`{construct}` construct: expansions nested within it and following it share the prefix {prefix}"
        ))
        .related_to("nested expansion", grammar.location(body))
        .hint(depth_hint(la, max, "nested expansion"))
        .emit();

    if la > max {
        Decision::Unresolved(max)
    } else {
        Decision::Resolved(la)
    }
}
