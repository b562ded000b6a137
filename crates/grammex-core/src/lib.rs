#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar data model for the grammex parser generator.
//!
//! - **Expansion graph**: an arena of BNF and regular-expression nodes with
//!   parent back-references ([`expansion`]).
//! - **Grammar**: productions, token productions and the ordinal table
//!   ([`grammar`]).
//! - **Builder**: links a front end's description tree into a [`Grammar`]
//!   ([`builder`]).

pub mod builder;
pub mod dump;
pub mod expansion;
pub mod grammar;
pub mod ids;
pub mod interner;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod interner_tests;

pub use builder::{BuildError, BuildResult, Expr, GrammarBuilder, RegexExpr, TokenDef, TokenSpec};
pub use dump::GrammarPrinter;
pub use expansion::{CharRange, Expansion, Lookahead, Node, Parent, Regex, RegexKind};
pub use grammar::{
    DEFAULT_STATE, Grammar, Production, ProductionBody, RegexSpec, TokenKind, TokenProduction,
};
pub use ids::{Location, NodeId, Ordinal, ProdId, TokenProdId};
pub use interner::{Interner, Symbol};
