//! Semantic passes that run before lookahead analysis.
//!
//! - `ranges`: inverted character and repetition ranges
//! - `nullable`: which productions can derive the empty sequence
//! - `empty_loops`: loops whose body can match nothing
//! - `left_recursion`: productions reaching themselves before consuming input
//! - `regex_loops`: regular expressions defined through themselves

pub(crate) mod cycles;
mod empty_loops;
mod left_recursion;
pub mod nullable;
mod ranges;
mod regex_loops;
pub mod walker;

#[cfg(test)]
mod analyze_tests;
#[cfg(test)]
mod nullable_tests;

pub use empty_loops::check_empty_loops;
pub use left_recursion::check_left_recursion;
pub use nullable::{compute_empty_possible, empty_expansion_exists};
pub use ranges::check_ranges;
pub use regex_loops::check_regex_loops;
pub use walker::{Walker, walk_post_order, walk_pre_order};

use grammex_core::Grammar;

use crate::Diagnostics;
use crate::options::Options;

/// Runs every semantic pass, filling in `empty_possible` flags.
pub fn analyze(grammar: &mut Grammar, options: &Options, diag: &mut Diagnostics) {
    check_ranges(grammar, diag);
    compute_empty_possible(grammar);

    if options.sanity_check {
        check_empty_loops(grammar, diag);
        check_left_recursion(grammar, diag);
        check_regex_loops(grammar, diag);
    }
}
