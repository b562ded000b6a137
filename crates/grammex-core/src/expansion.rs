//! Expansion graph node shapes.
//!
//! One closed sum type covers both BNF constructs and the regular
//! expressions nested in them or defined by token productions. Each
//! expansion subtree is a tree; cycles only appear through
//! [`Expansion::NonTerminal`] references to productions.

use crate::{Location, NodeId, Ordinal, ProdId, Symbol, TokenProdId};

/// A node in the grammar arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub expansion: Expansion,
    pub parent: Parent,
    /// Position within the parent sequence (0 when the parent is not a sequence).
    pub ordinal_base: u32,
    pub location: Location,
}

/// Non-owning back-reference to whatever contains a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top-level regular expression of a token production.
    None,
    /// Root expansion of a BNF production.
    Production(ProdId),
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    Choice(Vec<NodeId>),
    Sequence(Vec<NodeId>),
    OneOrMore(NodeId),
    ZeroOrMore(NodeId),
    ZeroOrOne(NodeId),
    NonTerminal(ProdId),
    Lookahead(Lookahead),
    TryBlock(NodeId),
    /// Embedded user code. Consumes nothing.
    Action(String),
    Regex(Regex),
}

impl Expansion {
    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Expansion::Regex(regex) => Some(regex),
            _ => None,
        }
    }

    /// Construct image used in diagnostics for loop and optional nodes.
    pub fn construct_image(&self) -> &'static str {
        match self {
            Expansion::OneOrMore(_) => "(...)+",
            Expansion::ZeroOrMore(_) => "(...)*",
            Expansion::ZeroOrOne(_) => "[...]",
            Expansion::Choice(_) => "(...|...)",
            Expansion::Sequence(_) => "(...)",
            Expansion::NonTerminal(_) => "non-terminal",
            Expansion::Lookahead(_) => "LOOKAHEAD",
            Expansion::TryBlock(_) => "try",
            Expansion::Action(_) => "{...}",
            Expansion::Regex(_) => "<...>",
        }
    }
}

/// `LOOKAHEAD(...)` unit. Always the first unit of its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookahead {
    /// False for the implicit lookahead the front end places at the head
    /// of every choice alternative.
    pub explicit: bool,
    /// Syntactic lookahead amount, `None` when not given.
    pub amount: Option<u32>,
    pub semantic: Option<String>,
    /// Expansion scanned by the lookahead. For a plain `LOOKAHEAD(n)` this is
    /// the enclosing sequence itself.
    pub expansion: NodeId,
}

impl Lookahead {
    pub fn has_semantic_action(&self) -> bool {
        self.semantic.as_deref().is_some_and(|code| !code.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Regex {
    /// Assigned to top-level token regular expressions and to references
    /// (`<NAME>`, inline literals) that stand for one. Nested sub-expressions
    /// have none.
    pub ordinal: Option<Ordinal>,
    pub label: Option<Symbol>,
    /// Defining-only expression (`<#NAME: ...>`).
    pub private: bool,
    pub context: Option<TokenProdId>,
    pub kind: RegexKind,
}

impl Regex {
    pub fn new(kind: RegexKind) -> Self {
        Self {
            ordinal: None,
            label: None,
            private: false,
            context: None,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegexKind {
    Choice(Vec<NodeId>),
    Sequence(Vec<NodeId>),
    OneOrMore(NodeId),
    ZeroOrMore(NodeId),
    ZeroOrOne(NodeId),
    RepetitionRange {
        min: u32,
        /// `None` for `{min,}`.
        max: Option<u32>,
        body: NodeId,
    },
    StringLiteral(String),
    CharacterList {
        ranges: Vec<CharRange>,
        negated: bool,
    },
    EndOfFile,
    /// Reference to a labelled regular expression.
    JustName(NodeId),
}

/// Inclusive character range.
///
/// Construction never fails: an inverted range is kept as written and
/// reported by the range validation pass. It contains no characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct CharRange {
    pub low: char,
    pub high: char,
}

impl CharRange {
    pub fn new(low: char, high: char) -> Self {
        Self { low, high }
    }

    pub fn single(c: char) -> Self {
        Self { low: c, high: c }
    }

    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }

    pub fn contains(&self, c: char) -> bool {
        self.low <= c && c <= self.high
    }
}
