//! Analysis options.

/// Knobs for the semantic, lookahead and lexer passes.
///
/// Defaults match the conventional generator settings: a global lookahead of
/// one, choices probed up to two tokens deep, loops up to one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Global `LOOKAHEAD`. Conflict checks only run when it is 1.
    pub(crate) lookahead: u32,
    /// Deepest lookahead tried when resolving a choice.
    pub(crate) choice_ambiguity_check: u32,
    /// Deepest lookahead tried when resolving a loop or optional.
    pub(crate) other_ambiguity_check: u32,
    /// Check every construct, even under explicit lookahead.
    pub(crate) force_la_check: bool,
    /// Treat semantic lookahead as opaque (no matches through it).
    pub(crate) consider_semantic_lookahead: bool,
    /// Run the empty-loop, recursion and lookahead checks.
    pub(crate) sanity_check: bool,
    /// Case-insensitive lexer for every token production.
    pub(crate) ignore_case: bool,
    /// Abort between passes once this many errors have been reported.
    pub(crate) error_limit: Option<usize>,
    /// Maximum NFA states per lexical state.
    pub(crate) nfa_state_limit: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lookahead: 1,
            choice_ambiguity_check: 2,
            other_ambiguity_check: 1,
            force_la_check: false,
            consider_semantic_lookahead: true,
            sanity_check: true,
            ignore_case: false,
            error_limit: None,
            nfa_state_limit: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookahead(mut self, value: u32) -> Self {
        self.lookahead = value;
        self
    }

    pub fn choice_ambiguity_check(mut self, value: u32) -> Self {
        self.choice_ambiguity_check = value;
        self
    }

    pub fn other_ambiguity_check(mut self, value: u32) -> Self {
        self.other_ambiguity_check = value;
        self
    }

    pub fn force_la_check(mut self, value: bool) -> Self {
        self.force_la_check = value;
        self
    }

    pub fn consider_semantic_lookahead(mut self, value: bool) -> Self {
        self.consider_semantic_lookahead = value;
        self
    }

    pub fn sanity_check(mut self, value: bool) -> Self {
        self.sanity_check = value;
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    pub fn error_limit(mut self, value: usize) -> Self {
        self.error_limit = Some(value);
        self
    }

    pub fn nfa_state_limit(mut self, value: usize) -> Self {
        self.nfa_state_limit = Some(value);
        self
    }

    /// Whether semantic lookahead hides matches when computing the
    /// candidate side of a comparison.
    pub(crate) fn semantic_lookahead_opaque(&self) -> bool {
        self.consider_semantic_lookahead && !self.force_la_check
    }

    /// Whether conflict checks run for constructs without explicit lookahead.
    pub(crate) fn checks_implicit_lookahead(&self) -> bool {
        self.lookahead == 1 || self.force_la_check
    }
}
