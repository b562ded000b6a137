//! Text dump of a grammar arena for snapshot tests and debugging.

use std::fmt::Write;

use crate::expansion::{Expansion, Parent, Regex, RegexKind};
use crate::grammar::{Grammar, ProductionBody};
use crate::NodeId;

pub struct GrammarPrinter<'a> {
    grammar: &'a Grammar,
    show_parents: bool,
}

impl<'a> GrammarPrinter<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            show_parents: true,
        }
    }

    pub fn show_parents(mut self, value: bool) -> Self {
        self.show_parents = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        let g = self.grammar;

        for (id, production) in g.productions() {
            let name = g.resolve(production.name);
            match production.body {
                ProductionBody::Bnf(root) => writeln!(w, "{id} {name} = {root}")?,
                ProductionBody::Code => writeln!(w, "{id} {name} = <code>")?,
            }
        }

        for (id, tp) in g.token_productions() {
            let states: Vec<_> = tp.states.iter().map(|&s| g.resolve(s)).collect();
            let specs: Vec<_> = tp.specs.iter().map(|s| s.regex.to_string()).collect();
            writeln!(
                w,
                "{id} {} <{}>: {}",
                tp.kind,
                states.join(", "),
                specs.join(", ")
            )?;
        }

        for (id, node) in g.nodes() {
            write!(w, "{id}: ")?;
            self.format_expansion(w, &node.expansion)?;
            if self.show_parents {
                match node.parent {
                    Parent::None => {}
                    Parent::Production(p) => write!(w, " ^{p}")?,
                    Parent::Node(n) => write!(w, " ^{n}")?,
                }
            }
            writeln!(w)?;
        }

        Ok(())
    }

    fn format_expansion(&self, w: &mut String, expansion: &Expansion) -> std::fmt::Result {
        match expansion {
            Expansion::Choice(alts) => write!(w, "Choice({})", ids(alts)),
            Expansion::Sequence(units) => write!(w, "Sequence({})", ids(units)),
            Expansion::OneOrMore(body) => write!(w, "OneOrMore({body})"),
            Expansion::ZeroOrMore(body) => write!(w, "ZeroOrMore({body})"),
            Expansion::ZeroOrOne(body) => write!(w, "ZeroOrOne({body})"),
            Expansion::NonTerminal(p) => {
                write!(w, "NonTerminal({})", self.grammar.production_name(*p))
            }
            Expansion::Lookahead(la) => {
                let mut parts = Vec::new();
                if !la.explicit {
                    parts.push("implicit".to_owned());
                }
                if let Some(amount) = la.amount {
                    parts.push(amount.to_string());
                }
                if let Some(code) = &la.semantic {
                    parts.push(format!("{{{code}}}"));
                }
                write!(w, "Lookahead({}) scan {}", parts.join(", "), la.expansion)
            }
            Expansion::TryBlock(body) => write!(w, "TryBlock({body})"),
            Expansion::Action(code) => write!(w, "Action({{{code}}})"),
            Expansion::Regex(regex) => self.format_regex(w, regex),
        }
    }

    fn format_regex(&self, w: &mut String, regex: &Regex) -> std::fmt::Result {
        match &regex.kind {
            RegexKind::Choice(alts) => write!(w, "RChoice({})", ids(alts))?,
            RegexKind::Sequence(units) => write!(w, "RSequence({})", ids(units))?,
            RegexKind::OneOrMore(body) => write!(w, "ROneOrMore({body})")?,
            RegexKind::ZeroOrMore(body) => write!(w, "RZeroOrMore({body})")?,
            RegexKind::ZeroOrOne(body) => write!(w, "RZeroOrOne({body})")?,
            RegexKind::RepetitionRange { min, max, body } => match max {
                Some(max) => write!(w, "RRepeat{{{min},{max}}}({body})")?,
                None => write!(w, "RRepeat{{{min},}}({body})")?,
            },
            RegexKind::StringLiteral(text) => write!(w, "{text:?}")?,
            RegexKind::CharacterList { ranges, negated } => {
                if *negated {
                    w.push('~');
                }
                let items: Vec<_> = ranges
                    .iter()
                    .map(|r| {
                        if r.low == r.high {
                            r.low.escape_debug().to_string()
                        } else {
                            format!("{}-{}", r.low.escape_debug(), r.high.escape_debug())
                        }
                    })
                    .collect();
                write!(w, "[{}]", items.join(", "))?;
            }
            RegexKind::EndOfFile => w.push_str("<EOF>"),
            RegexKind::JustName(target) => write!(w, "Ref({target})")?,
        }

        if let Some(label) = regex.label {
            write!(w, " <{}>", self.grammar.resolve(label))?;
        }
        if regex.private {
            w.push_str(" private");
        }
        if let Some(ordinal) = regex.ordinal {
            write!(w, " #{ordinal}")?;
        }
        Ok(())
    }
}

fn ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Grammar {
    pub fn printer(&self) -> GrammarPrinter<'_> {
        GrammarPrinter::new(self)
    }

    pub fn dump(&self) -> String {
        self.printer().dump()
    }
}
