//! grammex compiler: semantic checks, lookahead analysis and lexer NFAs.
//!
//! This crate analyzes a linked [`grammex_core::Grammar`]:
//! - `analyze` - range validation, emptiness, empty loops, recursion checks
//! - `lookahead` - bounded FIRST/FOLLOW sets and choice/loop conflicts
//! - `nfa` - per-lexical-state automata for the lexer generator
//! - `diagnostics` - error and warning reporting
//! - `compiler` - the pass pipeline tying them together

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compiler;
pub mod diagnostics;
pub mod lookahead;
pub mod nfa;
pub mod options;

#[cfg(test)]
pub mod test_utils;

/// Result type for analysis passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like the error limit) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use compiler::{Compiled, compile};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use lookahead::{Decision, LookaheadTable};
pub use nfa::LexerTables;
pub use options::Options;

/// Errors that stop the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("grammar analysis stopped after {} errors", .0.error_count())]
    ErrorLimitExceeded(Diagnostics),

    /// The automaton of one lexical state outgrew `nfa_state_limit`.
    #[error("NFA for lexical state {state} exceeds {limit} states")]
    NfaStateLimitExceeded { state: String, limit: usize },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
