//! Lowering from a front end's description tree into the grammar arena.
//!
//! The grammar-text parser is an external collaborator. It describes what it
//! parsed with [`Expr`], [`RegexExpr`] and [`TokenDef`] values, and
//! [`GrammarBuilder`] links them: node ids and parent back-references,
//! sequence positions, production referrer lists, token ordinals, label
//! resolution, and implicit tokens for regular expressions written inline
//! in BNF.
//!
//! Like the usual front end, every choice alternative is given a leading
//! implicit `LOOKAHEAD` unit unless it already starts with an explicit one.

use std::collections::HashMap;

use crate::expansion::{CharRange, Expansion, Lookahead, Node, Parent, Regex, RegexKind};
use crate::grammar::{
    DEFAULT_STATE, Grammar, Production, ProductionBody, RegexSpec, TokenKind, TokenProduction,
};
use crate::interner::Symbol;
use crate::{Location, NodeId, Ordinal, ProdId, TokenProdId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("production `{name}` is defined more than once")]
    DuplicateProduction { name: String },

    #[error("undefined production `{name}` at {location}")]
    UndefinedProduction { name: String, location: Location },

    #[error("regular expression label `{label}` is defined more than once")]
    DuplicateToken { label: String },

    #[error("undefined regular expression `<{label}>` at {location}")]
    UndefinedToken { label: String, location: Location },

    #[error("free-standing regular expression reference `<{label}>` at {location}")]
    FreeStandingReference { label: String, location: Location },

    #[error("LOOKAHEAD at {location} is not the first unit of a sequence")]
    MisplacedLookahead { location: Location },
}

pub type BuildResult<T> = Result<T, BuildError>;

/// BNF expansion as produced by the grammar parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Choice(Vec<Expr>),
    Sequence(Vec<Expr>),
    OneOrMore(Box<Expr>),
    ZeroOrMore(Box<Expr>),
    ZeroOrOne(Box<Expr>),
    NonTerminal(String),
    Lookahead {
        amount: Option<u32>,
        semantic: Option<String>,
        syntactic: Option<Box<Expr>>,
    },
    TryBlock(Box<Expr>),
    Action(String),
    Regex(RegexExpr),
    /// Attaches a source location to the wrapped expression and, until
    /// overridden, to everything nested in it.
    At(Location, Box<Expr>),
}

impl Expr {
    pub fn nt(name: impl Into<String>) -> Self {
        Expr::NonTerminal(name.into())
    }

    pub fn lit(text: impl Into<String>) -> Self {
        Expr::Regex(RegexExpr::Literal(text.into()))
    }

    pub fn token(label: impl Into<String>) -> Self {
        Expr::Regex(RegexExpr::Name(label.into()))
    }

    pub fn eof() -> Self {
        Expr::Regex(RegexExpr::Eof)
    }

    pub fn seq(units: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Sequence(units.into_iter().collect())
    }

    pub fn choice(alternatives: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Choice(alternatives.into_iter().collect())
    }

    pub fn action(code: impl Into<String>) -> Self {
        Expr::Action(code.into())
    }

    /// `LOOKAHEAD(amount)`.
    pub fn lookahead(amount: u32) -> Self {
        Expr::Lookahead {
            amount: Some(amount),
            semantic: None,
            syntactic: None,
        }
    }

    /// `LOOKAHEAD({ code })`.
    pub fn semantic_lookahead(code: impl Into<String>) -> Self {
        Expr::Lookahead {
            amount: None,
            semantic: Some(code.into()),
            syntactic: None,
        }
    }

    pub fn one_or_more(self) -> Self {
        Expr::OneOrMore(Box::new(self))
    }

    pub fn zero_or_more(self) -> Self {
        Expr::ZeroOrMore(Box::new(self))
    }

    pub fn optional(self) -> Self {
        Expr::ZeroOrOne(Box::new(self))
    }

    pub fn try_block(self) -> Self {
        Expr::TryBlock(Box::new(self))
    }

    pub fn at(self, line: u32, column: u32) -> Self {
        Expr::At(Location::new(line, column), Box::new(self))
    }

    fn is_lookahead(&self) -> bool {
        match self {
            Expr::At(_, inner) => inner.is_lookahead(),
            Expr::Lookahead { .. } => true,
            _ => false,
        }
    }

    fn outer_location(&self) -> Option<Location> {
        match self {
            Expr::At(location, _) => Some(*location),
            _ => None,
        }
    }
}

/// Regular expression as produced by the grammar parser.
#[derive(Debug, Clone, PartialEq)]
pub enum RegexExpr {
    Choice(Vec<RegexExpr>),
    Sequence(Vec<RegexExpr>),
    OneOrMore(Box<RegexExpr>),
    ZeroOrMore(Box<RegexExpr>),
    ZeroOrOne(Box<RegexExpr>),
    Repeat {
        min: u32,
        max: Option<u32>,
        body: Box<RegexExpr>,
    },
    Literal(String),
    CharList {
        ranges: Vec<CharRange>,
        negated: bool,
    },
    Eof,
    Name(String),
    At(Location, Box<RegexExpr>),
}

impl RegexExpr {
    pub fn lit(text: impl Into<String>) -> Self {
        RegexExpr::Literal(text.into())
    }

    pub fn name(label: impl Into<String>) -> Self {
        RegexExpr::Name(label.into())
    }

    /// `["a"-"z", "_"]`: pairs are inclusive bounds.
    pub fn chars(ranges: impl IntoIterator<Item = (char, char)>) -> Self {
        RegexExpr::CharList {
            ranges: ranges
                .into_iter()
                .map(|(low, high)| CharRange::new(low, high))
                .collect(),
            negated: false,
        }
    }

    /// `~[...]`.
    pub fn not_chars(ranges: impl IntoIterator<Item = (char, char)>) -> Self {
        match Self::chars(ranges) {
            RegexExpr::CharList { ranges, .. } => RegexExpr::CharList {
                ranges,
                negated: true,
            },
            other => other,
        }
    }

    pub fn seq(units: impl IntoIterator<Item = RegexExpr>) -> Self {
        RegexExpr::Sequence(units.into_iter().collect())
    }

    pub fn choice(alternatives: impl IntoIterator<Item = RegexExpr>) -> Self {
        RegexExpr::Choice(alternatives.into_iter().collect())
    }

    pub fn one_or_more(self) -> Self {
        RegexExpr::OneOrMore(Box::new(self))
    }

    pub fn zero_or_more(self) -> Self {
        RegexExpr::ZeroOrMore(Box::new(self))
    }

    pub fn optional(self) -> Self {
        RegexExpr::ZeroOrOne(Box::new(self))
    }

    /// `(...){min,max}`; `max` of `None` means unbounded.
    pub fn repeat(self, min: u32, max: Option<u32>) -> Self {
        RegexExpr::Repeat {
            min,
            max,
            body: Box::new(self),
        }
    }

    pub fn at(self, line: u32, column: u32) -> Self {
        RegexExpr::At(Location::new(line, column), Box::new(self))
    }

    fn peeled(&self) -> &RegexExpr {
        match self {
            RegexExpr::At(_, inner) => inner.peeled(),
            other => other,
        }
    }
}

/// One `<LABEL: regex> { action } : NEXT_STATE` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpec {
    pub label: Option<String>,
    pub private: bool,
    pub regex: RegexExpr,
    pub action: Option<String>,
    pub next_state: Option<String>,
    pub location: Location,
}

impl TokenSpec {
    pub fn new(regex: RegexExpr) -> Self {
        Self {
            label: None,
            private: false,
            regex,
            action: None,
            next_state: None,
            location: Location::default(),
        }
    }

    pub fn labeled(label: impl Into<String>, regex: RegexExpr) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(regex)
        }
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn action(mut self, code: impl Into<String>) -> Self {
        self.action = Some(code.into());
        self
    }

    pub fn next_state(mut self, state: impl Into<String>) -> Self {
        self.next_state = Some(state.into());
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Location::new(line, column);
        self
    }
}

/// A `TOKEN`/`SKIP`/`MORE`/`SPECIAL_TOKEN` block.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDef {
    /// Empty means `DEFAULT` only.
    pub states: Vec<String>,
    pub kind: TokenKind,
    pub ignore_case: bool,
    pub specs: Vec<TokenSpec>,
    pub location: Location,
}

impl TokenDef {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            states: Vec::new(),
            kind,
            ignore_case: false,
            specs: Vec::new(),
            location: Location::default(),
        }
    }

    pub fn in_states<S: Into<String>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    pub fn spec(mut self, spec: TokenSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Location::new(line, column);
        self
    }
}

struct ProductionDef {
    name: String,
    body: Option<Expr>,
}

/// Collects productions and token blocks, then links them into a [`Grammar`].
#[derive(Default)]
pub struct GrammarBuilder {
    productions: Vec<ProductionDef>,
    token_defs: Vec<TokenDef>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn production(mut self, name: impl Into<String>, body: Expr) -> Self {
        self.productions.push(ProductionDef {
            name: name.into(),
            body: Some(body),
        });
        self
    }

    /// A hand-written (`JAVACODE`) production.
    pub fn code_production(mut self, name: impl Into<String>) -> Self {
        self.productions.push(ProductionDef {
            name: name.into(),
            body: None,
        });
        self
    }

    pub fn tokens(mut self, def: TokenDef) -> Self {
        self.token_defs.push(def);
        self
    }

    pub fn build(self) -> BuildResult<Grammar> {
        Lowering::new().run(self)
    }
}

struct Lowering {
    grammar: Grammar,
    default_state: Symbol,
    /// `<NAME>` references waiting for every label to be known.
    pending_names: Vec<(NodeId, String, Location)>,
    /// Plain `TOKEN` string literals of the default state, reused by inline literals.
    literal_tokens: HashMap<String, NodeId>,
    implicit_tokens: Option<TokenProdId>,
}

impl Lowering {
    fn new() -> Self {
        let mut grammar = Grammar::default();
        let default_state = grammar.interner.intern(DEFAULT_STATE);
        grammar.lexical_states.insert(default_state);
        Self {
            grammar,
            default_state,
            pending_names: Vec::new(),
            literal_tokens: HashMap::new(),
            implicit_tokens: None,
        }
    }

    fn run(mut self, defs: GrammarBuilder) -> BuildResult<Grammar> {
        for def in &defs.productions {
            let name = self.grammar.interner.intern(&def.name);
            let id = ProdId::from_raw(self.grammar.productions.len() as u32);
            if self.grammar.production_names.insert(name, id).is_some() {
                return Err(BuildError::DuplicateProduction {
                    name: def.name.clone(),
                });
            }
            self.grammar.productions.push(Production {
                name,
                location: def
                    .body
                    .as_ref()
                    .and_then(Expr::outer_location)
                    .unwrap_or_default(),
                body: ProductionBody::Code,
                referrers: Vec::new(),
                empty_possible: false,
            });
        }

        for def in defs.token_defs {
            self.lower_token_production(def)?;
        }

        for (index, def) in defs.productions.into_iter().enumerate() {
            let Some(body) = def.body else {
                continue;
            };
            let id = ProdId::from_raw(index as u32);
            let location = self.grammar.productions[index].location;
            let root = self.lower_expr(body, Parent::Production(id), 0, location)?;
            self.grammar.productions[index].body = ProductionBody::Bnf(root);
        }

        self.resolve_names()?;
        Ok(self.grammar)
    }

    fn alloc(
        &mut self,
        expansion: Expansion,
        parent: Parent,
        ordinal_base: u32,
        location: Location,
    ) -> NodeId {
        let id = NodeId::from_raw(self.grammar.nodes.len() as u32);
        self.grammar.nodes.push(Node {
            expansion,
            parent,
            ordinal_base,
            location,
        });
        id
    }

    fn set(&mut self, id: NodeId, expansion: Expansion) {
        self.grammar.nodes[id.index()].expansion = expansion;
    }

    fn regex_mut(&mut self, id: NodeId) -> &mut Regex {
        match &mut self.grammar.nodes[id.index()].expansion {
            Expansion::Regex(regex) => regex,
            other => unreachable!("regex node lowered as {other:?}"),
        }
    }

    fn assign_ordinal(&mut self, id: NodeId) -> Ordinal {
        self.grammar.tokens.push(id);
        let ordinal = Ordinal::new(self.grammar.tokens.len() as u32);
        self.regex_mut(id).ordinal = Some(ordinal);
        ordinal
    }

    fn lexical_state(&mut self, name: &str) -> Symbol {
        let sym = self.grammar.interner.intern(name);
        self.grammar.lexical_states.insert(sym);
        sym
    }

    fn lower_token_production(&mut self, def: TokenDef) -> BuildResult<()> {
        let states = if def.states.is_empty() {
            vec![self.default_state]
        } else {
            def.states.iter().map(|s| self.lexical_state(s)).collect()
        };
        let reusable_literals =
            def.kind == TokenKind::Token && !def.ignore_case && states.contains(&self.default_state);

        let context = TokenProdId::from_raw(self.grammar.token_productions.len() as u32);
        self.grammar.token_productions.push(TokenProduction {
            states,
            kind: def.kind,
            ignore_case: def.ignore_case,
            explicit: true,
            specs: Vec::new(),
            location: def.location,
        });

        for spec in def.specs {
            let location = spec.location;
            if let RegexExpr::Name(label) = spec.regex.peeled() {
                return Err(BuildError::FreeStandingReference {
                    label: label.clone(),
                    location,
                });
            }

            let id = self.lower_regex(spec.regex, Parent::None, 0, context, location)?;
            let label = spec.label.as_deref().map(|l| self.grammar.interner.intern(l));
            let regex = self.regex_mut(id);
            regex.label = label;
            regex.private = spec.private;
            let literal = match &regex.kind {
                RegexKind::StringLiteral(text) => Some(text.clone()),
                _ => None,
            };

            if matches!(regex.kind, RegexKind::EndOfFile) {
                regex.ordinal = Some(Ordinal::EOF);
            } else {
                self.assign_ordinal(id);
            }

            if let Some(label) = label
                && self.grammar.named_tokens.insert(label, id).is_some()
            {
                return Err(BuildError::DuplicateToken {
                    label: self.grammar.interner.resolve(label).to_owned(),
                });
            }

            if let Some(text) = literal
                && reusable_literals
                && !spec.private
            {
                self.literal_tokens.entry(text).or_insert(id);
            }

            let next_state = spec.next_state.as_deref().map(|s| self.lexical_state(s));
            self.grammar.token_productions[context.index()]
                .specs
                .push(RegexSpec {
                    regex: id,
                    action: spec.action,
                    next_state,
                });
        }
        Ok(())
    }

    fn lower_regex(
        &mut self,
        rx: RegexExpr,
        parent: Parent,
        ordinal_base: u32,
        context: TokenProdId,
        location: Location,
    ) -> BuildResult<NodeId> {
        let regex = |kind| {
            Expansion::Regex(Regex {
                context: Some(context),
                ..Regex::new(kind)
            })
        };

        let id = match rx {
            RegexExpr::At(location, inner) => {
                return self.lower_regex(*inner, parent, ordinal_base, context, location);
            }
            RegexExpr::Literal(text) => self.alloc(
                regex(RegexKind::StringLiteral(text)),
                parent,
                ordinal_base,
                location,
            ),
            RegexExpr::CharList { ranges, negated } => self.alloc(
                regex(RegexKind::CharacterList { ranges, negated }),
                parent,
                ordinal_base,
                location,
            ),
            RegexExpr::Eof => self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location),
            RegexExpr::Name(label) => {
                let id = self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location);
                self.pending_names.push((id, label, location));
                id
            }
            RegexExpr::Choice(alternatives) => {
                let id = self.alloc(regex(RegexKind::Choice(Vec::new())), parent, ordinal_base, location);
                let mut children = Vec::with_capacity(alternatives.len());
                for alt in alternatives {
                    children.push(self.lower_regex(alt, Parent::Node(id), 0, context, location)?);
                }
                self.set(id, regex(RegexKind::Choice(children)));
                id
            }
            RegexExpr::Sequence(units) => {
                let id = self.alloc(regex(RegexKind::Sequence(Vec::new())), parent, ordinal_base, location);
                let mut children = Vec::with_capacity(units.len());
                for (i, unit) in units.into_iter().enumerate() {
                    children.push(self.lower_regex(unit, Parent::Node(id), i as u32, context, location)?);
                }
                self.set(id, regex(RegexKind::Sequence(children)));
                id
            }
            RegexExpr::OneOrMore(body) => {
                let id = self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location);
                let body = self.lower_regex(*body, Parent::Node(id), 0, context, location)?;
                self.set(id, regex(RegexKind::OneOrMore(body)));
                id
            }
            RegexExpr::ZeroOrMore(body) => {
                let id = self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location);
                let body = self.lower_regex(*body, Parent::Node(id), 0, context, location)?;
                self.set(id, regex(RegexKind::ZeroOrMore(body)));
                id
            }
            RegexExpr::ZeroOrOne(body) => {
                let id = self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location);
                let body = self.lower_regex(*body, Parent::Node(id), 0, context, location)?;
                self.set(id, regex(RegexKind::ZeroOrOne(body)));
                id
            }
            RegexExpr::Repeat { min, max, body } => {
                let id = self.alloc(regex(RegexKind::EndOfFile), parent, ordinal_base, location);
                let body = self.lower_regex(*body, Parent::Node(id), 0, context, location)?;
                self.set(id, regex(RegexKind::RepetitionRange { min, max, body }));
                id
            }
        };
        Ok(id)
    }

    fn lower_expr(
        &mut self,
        expr: Expr,
        parent: Parent,
        ordinal_base: u32,
        location: Location,
    ) -> BuildResult<NodeId> {
        let id = match expr {
            Expr::At(location, inner) => {
                return self.lower_expr(*inner, parent, ordinal_base, location);
            }
            Expr::Choice(alternatives) => {
                let id = self.alloc(Expansion::Choice(Vec::new()), parent, ordinal_base, location);
                let mut children = Vec::with_capacity(alternatives.len());
                for alt in alternatives {
                    children.push(self.lower_alternative(alt, Parent::Node(id), location)?);
                }
                self.set(id, Expansion::Choice(children));
                id
            }
            Expr::Sequence(units) => {
                let id = self.alloc(Expansion::Sequence(Vec::new()), parent, ordinal_base, location);
                let mut children = Vec::with_capacity(units.len());
                for (i, unit) in units.into_iter().enumerate() {
                    children.push(self.lower_expr(unit, Parent::Node(id), i as u32, location)?);
                }
                self.set(id, Expansion::Sequence(children));
                id
            }
            Expr::OneOrMore(body) => {
                let id = self.alloc(Expansion::Action(String::new()), parent, ordinal_base, location);
                let body = self.lower_expr(*body, Parent::Node(id), 0, location)?;
                self.set(id, Expansion::OneOrMore(body));
                id
            }
            Expr::ZeroOrMore(body) => {
                let id = self.alloc(Expansion::Action(String::new()), parent, ordinal_base, location);
                let body = self.lower_expr(*body, Parent::Node(id), 0, location)?;
                self.set(id, Expansion::ZeroOrMore(body));
                id
            }
            Expr::ZeroOrOne(body) => {
                let id = self.alloc(Expansion::Action(String::new()), parent, ordinal_base, location);
                let body = self.lower_expr(*body, Parent::Node(id), 0, location)?;
                self.set(id, Expansion::ZeroOrOne(body));
                id
            }
            Expr::TryBlock(body) => {
                let id = self.alloc(Expansion::Action(String::new()), parent, ordinal_base, location);
                let body = self.lower_expr(*body, Parent::Node(id), 0, location)?;
                self.set(id, Expansion::TryBlock(body));
                id
            }
            Expr::NonTerminal(name) => {
                let target = self
                    .grammar
                    .interner
                    .get(&name)
                    .and_then(|sym| self.grammar.production_names.get(&sym).copied());
                let Some(target) = target else {
                    return Err(BuildError::UndefinedProduction { name, location });
                };
                let id = self.alloc(Expansion::NonTerminal(target), parent, ordinal_base, location);
                self.grammar.productions[target.index()].referrers.push(id);
                id
            }
            Expr::Lookahead {
                amount,
                semantic,
                syntactic,
            } => {
                let enclosing = match parent {
                    Parent::Node(seq)
                        if ordinal_base == 0
                            && matches!(self.grammar.node(seq).expansion, Expansion::Sequence(_)) =>
                    {
                        seq
                    }
                    _ => return Err(BuildError::MisplacedLookahead { location }),
                };
                let id = self.alloc(
                    Expansion::Lookahead(Lookahead {
                        explicit: true,
                        amount,
                        semantic,
                        expansion: enclosing,
                    }),
                    parent,
                    ordinal_base,
                    location,
                );
                if let Some(syntactic) = syntactic {
                    let nested = self.lower_expr(*syntactic, Parent::Node(id), 0, location)?;
                    if let Expansion::Lookahead(la) = &mut self.grammar.nodes[id.index()].expansion {
                        la.expansion = nested;
                    }
                }
                id
            }
            Expr::Action(code) => self.alloc(Expansion::Action(code), parent, ordinal_base, location),
            Expr::Regex(rx) => return self.lower_inline_regex(rx, parent, ordinal_base, location),
        };
        Ok(id)
    }

    fn lower_alternative(&mut self, alt: Expr, parent: Parent, location: Location) -> BuildResult<NodeId> {
        match alt {
            Expr::At(location, inner) => self.lower_alternative(*inner, parent, location),
            Expr::Sequence(units) if units.first().is_some_and(Expr::is_lookahead) => {
                self.lower_expr(Expr::Sequence(units), parent, 0, location)
            }
            Expr::Sequence(units) => self.lower_guarded(units, parent, location),
            other => self.lower_guarded(vec![other], parent, location),
        }
    }

    /// Sequence headed by an implicit lookahead scanning the sequence itself.
    fn lower_guarded(&mut self, units: Vec<Expr>, parent: Parent, location: Location) -> BuildResult<NodeId> {
        let seq = self.alloc(Expansion::Sequence(Vec::new()), parent, 0, location);
        let lookahead = self.alloc(
            Expansion::Lookahead(Lookahead {
                explicit: false,
                amount: None,
                semantic: None,
                expansion: seq,
            }),
            Parent::Node(seq),
            0,
            location,
        );
        let mut children = vec![lookahead];
        for (i, unit) in units.into_iter().enumerate() {
            children.push(self.lower_expr(unit, Parent::Node(seq), i as u32 + 1, location)?);
        }
        self.set(seq, Expansion::Sequence(children));
        Ok(seq)
    }

    fn lower_inline_regex(
        &mut self,
        rx: RegexExpr,
        parent: Parent,
        ordinal_base: u32,
        location: Location,
    ) -> BuildResult<NodeId> {
        match rx {
            RegexExpr::At(location, inner) => {
                self.lower_inline_regex(*inner, parent, ordinal_base, location)
            }
            RegexExpr::Name(label) => {
                let id = self.alloc(
                    Expansion::Regex(Regex::new(RegexKind::EndOfFile)),
                    parent,
                    ordinal_base,
                    location,
                );
                self.pending_names.push((id, label, location));
                Ok(id)
            }
            RegexExpr::Eof => {
                let regex = Regex {
                    ordinal: Some(Ordinal::EOF),
                    ..Regex::new(RegexKind::EndOfFile)
                };
                Ok(self.alloc(Expansion::Regex(regex), parent, ordinal_base, location))
            }
            RegexExpr::Literal(text) => match self.literal_tokens.get(&text).copied() {
                Some(existing) => {
                    let (ordinal, context) = match self.grammar.regex(existing) {
                        Some(def) => (def.ordinal, def.context),
                        None => (None, None),
                    };
                    let regex = Regex {
                        ordinal,
                        context,
                        ..Regex::new(RegexKind::StringLiteral(text))
                    };
                    Ok(self.alloc(Expansion::Regex(regex), parent, ordinal_base, location))
                }
                None => {
                    let id = self.lower_implicit_token(RegexExpr::Literal(text.clone()), parent, ordinal_base, location)?;
                    self.literal_tokens.insert(text, id);
                    Ok(id)
                }
            },
            other => self.lower_implicit_token(other, parent, ordinal_base, location),
        }
    }

    /// Registers an inline regular expression as its own `TOKEN` in the
    /// default lexical state.
    fn lower_implicit_token(
        &mut self,
        rx: RegexExpr,
        parent: Parent,
        ordinal_base: u32,
        location: Location,
    ) -> BuildResult<NodeId> {
        let context = self.implicit_token_production();
        let id = self.lower_regex(rx, parent, ordinal_base, context, location)?;
        self.assign_ordinal(id);
        self.grammar.token_productions[context.index()]
            .specs
            .push(RegexSpec {
                regex: id,
                action: None,
                next_state: None,
            });
        Ok(id)
    }

    fn implicit_token_production(&mut self) -> TokenProdId {
        if let Some(id) = self.implicit_tokens {
            return id;
        }
        let id = TokenProdId::from_raw(self.grammar.token_productions.len() as u32);
        self.grammar.token_productions.push(TokenProduction {
            states: vec![self.default_state],
            kind: TokenKind::Token,
            ignore_case: false,
            explicit: false,
            specs: Vec::new(),
            location: Location::default(),
        });
        self.implicit_tokens = Some(id);
        id
    }

    fn resolve_names(&mut self) -> BuildResult<()> {
        for (id, label, location) in std::mem::take(&mut self.pending_names) {
            let Some(target) = self
                .grammar
                .interner
                .get(&label)
                .and_then(|sym| self.grammar.named_tokens.get(&sym).copied())
            else {
                return Err(BuildError::UndefinedToken { label, location });
            };
            let (ordinal, label, context) = match self.grammar.regex(target) {
                Some(def) => (def.ordinal, def.label, def.context),
                None => (None, None, None),
            };
            let regex = self.regex_mut(id);
            regex.kind = RegexKind::JustName(target);
            regex.ordinal = ordinal;
            regex.label = label;
            regex.context = regex.context.or(context);
        }
        Ok(())
    }
}
