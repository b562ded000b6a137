//! Lexer automata.
//!
//! - `char_class`: range normalization, negation and case folding
//! - `build`: regex to NFA fragment compilation
//! - `lexer`: per-lexical-state automata and token tables
//! - `dump`: text rendering for tests and debugging

mod build;
pub mod char_class;
mod dump;
mod lexer;

#[cfg(test)]
mod build_tests;

pub use build::{Fragment, Nfa, NfaBuilder, NfaState, StateId};
pub use lexer::{EofAction, LexerTables, LexicalStateTable, TokenInfo, build_lexer};
