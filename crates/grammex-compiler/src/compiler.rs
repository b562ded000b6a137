//! The pass pipeline.
//!
//! Semantic checks run first. Lookahead analysis and lexer construction
//! need a structurally sound grammar, so they only run once no errors have
//! been reported.

use grammex_core::Grammar;
use log::debug;

use crate::analyze::analyze;
use crate::lookahead::{LookaheadTable, check_lookahead};
use crate::nfa::{LexerTables, build_lexer};
use crate::options::Options;
use crate::{Diagnostics, Error, PassResult};

/// Output of a full compiler run.
#[derive(Debug)]
pub struct Compiled {
    pub grammar: Grammar,
    pub lookahead: LookaheadTable,
    /// `None` when errors kept the lexer from being built.
    pub lexer: Option<LexerTables>,
}

pub fn compile(mut grammar: Grammar, options: &Options) -> PassResult<Compiled> {
    let mut diag = Diagnostics::new();

    analyze(&mut grammar, options, &mut diag);
    let mut diag = check_error_limit(diag, options)?;

    let mut lookahead = LookaheadTable::default();
    if options.sanity_check && !diag.has_errors() {
        lookahead = check_lookahead(&grammar, options, &mut diag);
    }

    let lexer = if diag.has_errors() {
        debug!("skipping lexer construction: {} errors", diag.error_count());
        None
    } else {
        Some(build_lexer(&grammar, options, &mut diag)?)
    };

    Ok((
        Compiled {
            grammar,
            lookahead,
            lexer,
        },
        diag,
    ))
}

fn check_error_limit(diag: Diagnostics, options: &Options) -> Result<Diagnostics, Error> {
    match options.error_limit {
        Some(limit) if diag.error_count() > 0 && diag.error_count() >= limit => {
            Err(Error::ErrorLimitExceeded(diag))
        }
        _ => Ok(diag),
    }
}
