//! The grammar arena handed to the analysis core.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::expansion::{Expansion, Node, Regex};
use crate::interner::{Interner, Symbol};
use crate::{Location, NodeId, Ordinal, ProdId, TokenProdId};

/// Name of the lexical state every grammar starts in.
pub const DEFAULT_STATE: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    pub name: Symbol,
    pub location: Location,
    pub body: ProductionBody,
    /// Every `NonTerminal` node that references this production.
    pub referrers: Vec<NodeId>,
    /// Whether the production can derive the empty token sequence.
    /// Filled in by the nullability pass.
    pub empty_possible: bool,
}

impl Production {
    pub fn root(&self) -> Option<NodeId> {
        match self.body {
            ProductionBody::Bnf(root) => Some(root),
            ProductionBody::Code => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self.body, ProductionBody::Code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionBody {
    Bnf(NodeId),
    /// Hand-written production. Opaque to static analysis.
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Token,
    SpecialToken,
    Skip,
    More,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Token => write!(f, "TOKEN"),
            TokenKind::SpecialToken => write!(f, "SPECIAL_TOKEN"),
            TokenKind::Skip => write!(f, "SKIP"),
            TokenKind::More => write!(f, "MORE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenProduction {
    pub states: Vec<Symbol>,
    pub kind: TokenKind,
    pub ignore_case: bool,
    /// False for the production collecting literals written inline in BNF.
    pub explicit: bool,
    pub specs: Vec<RegexSpec>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexSpec {
    pub regex: NodeId,
    pub action: Option<String>,
    pub next_state: Option<Symbol>,
}

/// Fully linked grammar: expansion arena, productions, and token table.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pub(crate) nodes: Vec<Node>,
    pub(crate) productions: Vec<Production>,
    pub(crate) token_productions: Vec<TokenProduction>,
    /// `tokens[i]` is the regular expression with ordinal `i + 1`.
    pub(crate) tokens: Vec<NodeId>,
    pub(crate) lexical_states: IndexSet<Symbol>,
    pub(crate) named_tokens: IndexMap<Symbol, NodeId>,
    pub(crate) production_names: IndexMap<Symbol, ProdId>,
    pub(crate) interner: Interner,
}

impl Grammar {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn expansion(&self, id: NodeId) -> &Expansion {
        &self.nodes[id.index()].expansion
    }

    pub fn location(&self, id: NodeId) -> Location {
        self.nodes[id.index()].location
    }

    pub fn regex(&self, id: NodeId) -> Option<&Regex> {
        self.expansion(id).as_regex()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_raw(i as u32), n))
    }

    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id.index()]
    }

    pub fn productions(&self) -> impl Iterator<Item = (ProdId, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| (ProdId::from_raw(i as u32), p))
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    pub fn production_by_name(&self, name: &str) -> Option<ProdId> {
        let sym = self.interner.get(name)?;
        self.production_names.get(&sym).copied()
    }

    pub fn production_name(&self, id: ProdId) -> &str {
        self.interner.resolve(self.production(id).name)
    }

    pub fn set_empty_possible(&mut self, id: ProdId, value: bool) {
        self.productions[id.index()].empty_possible = value;
    }

    pub fn token_production(&self, id: TokenProdId) -> &TokenProduction {
        &self.token_productions[id.index()]
    }

    pub fn token_productions(&self) -> impl Iterator<Item = (TokenProdId, &TokenProduction)> {
        self.token_productions
            .iter()
            .enumerate()
            .map(|(i, tp)| (TokenProdId::from_raw(i as u32), tp))
    }

    /// Number of token kinds including end of file.
    pub fn token_count(&self) -> usize {
        self.tokens.len() + 1
    }

    /// Node defining the token with the given ordinal.
    pub fn token(&self, ordinal: Ordinal) -> Option<NodeId> {
        let index = (ordinal.as_u32() as usize).checked_sub(1)?;
        self.tokens.get(index).copied()
    }

    pub fn token_regex(&self, ordinal: Ordinal) -> Option<&Regex> {
        self.regex(self.token(ordinal)?)
    }

    /// Token production the given token was declared in.
    pub fn token_context(&self, ordinal: Ordinal) -> Option<&TokenProduction> {
        let context = self.token_regex(ordinal)?.context?;
        Some(self.token_production(context))
    }

    pub fn named_token(&self, label: &str) -> Option<NodeId> {
        let sym = self.interner.get(label)?;
        self.named_tokens.get(&sym).copied()
    }

    pub fn lexical_states(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.lexical_states.iter().copied()
    }

    pub fn lexical_state(&self, name: &str) -> Option<Symbol> {
        let sym = self.interner.get(name)?;
        self.lexical_states.contains(&sym).then_some(sym)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Label of a regular expression, following references.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.regex(id)?.label.map(|sym| self.resolve(sym))
    }
}
