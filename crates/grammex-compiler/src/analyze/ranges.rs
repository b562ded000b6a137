//! Character and repetition range validation.
//!
//! Inverted ranges are reported once here; the NFA builder keeps them as
//! written.

use grammex_core::{Grammar, RegexKind};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

pub fn check_ranges(grammar: &Grammar, diag: &mut Diagnostics) {
    for (_, node) in grammar.nodes() {
        let Some(regex) = node.expansion.as_regex() else {
            continue;
        };
        match &regex.kind {
            RegexKind::CharacterList { ranges, .. } => {
                for range in ranges.iter().filter(|r| !r.is_valid()) {
                    diag.report(DiagnosticKind::InvalidCharRange, node.location)
                        .message(format!(
                            "\"{}\" - \"{}\"",
                            range.low.escape_default(),
                            range.high.escape_default()
                        ))
                        .hint("the first character must not be greater than the second")
                        .emit();
                }
            }
            RegexKind::RepetitionRange {
                min, max: Some(max), ..
            } if max < min => {
                diag.report(DiagnosticKind::InvalidRepetitionRange, node.location)
                    .message(format!("{{{min},{max}}}"))
                    .hint("the minimum must not be greater than the maximum")
                    .emit();
            }
            _ => {}
        }
    }
}
