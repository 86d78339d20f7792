//! Abstract syntax for Propositional Dynamic Logic
//!
//! Formulas are propositional logic extended with the `<π>φ` (diamond) and `[π]φ` (box)
//! modalities; programs are regular expressions over atomic program names with sequence
//! (`;`), choice (`U`), iteration (`*`), and formula tests (`φ?`).
//!
//! The concrete syntax accepted by [`Formula::parse`]:
//!
//! ```text
//! <a;(bUc)>(p -> q)      diamond over a compound program
//! [a*](p & !q)           box over iterated a
//! <(p|q)?;a>r            test, then a
//! ```
//!
//! Operator precedence for formulas, loosest first: `<->`, `->`, `|`, `&`, unary
//! (`!`, `<π>`, `[π]`). For programs: `;`, `U`, postfix `*`/`?`. Compound sub-formulas
//! and sub-programs are parenthesized when ambiguous; whitespace is insignificant.

use std::fmt;

mod lexer;
mod parser;

pub use lexer::{Token, tokenize};

use crate::error::PdlParseError;

/// A PDL formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// Atomic proposition, referenced by name
    Atom(String),
    /// Negation `!φ`
    Not(Box<Formula>),
    /// Conjunction `φ & ψ`
    And(Box<Formula>, Box<Formula>),
    /// Disjunction `φ | ψ`
    Or(Box<Formula>, Box<Formula>),
    /// Implication `φ -> ψ`
    Imp(Box<Formula>, Box<Formula>),
    /// Biconditional `φ <-> ψ`
    Iff(Box<Formula>, Box<Formula>),
    /// Diamond `<π>φ`: some π-successor satisfies φ
    Diamond(Box<Program>, Box<Formula>),
    /// Box `[π]φ`: every π-successor satisfies φ
    Box(Box<Program>, Box<Formula>),
}

/// A regular program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Atomic program, referenced by name
    Atom(String),
    /// Sequential composition `π₁;π₂`
    Seq(Box<Program>, Box<Program>),
    /// Nondeterministic choice `π₁Uπ₂`
    Choice(Box<Program>, Box<Program>),
    /// Kleene iteration `π*`
    Star(Box<Program>),
    /// Test `φ?`: proceed only where φ holds
    Test(Box<Formula>),
}

impl Formula {
    /// Parse a formula from its concrete syntax
    pub fn parse(input: &str) -> Result<Formula, PdlParseError> {
        let tokens = lexer::tokenize(input)?;
        parser::Parser::new(&tokens).parse_complete()
    }

    fn is_atom(&self) -> bool {
        matches!(self, Formula::Atom(_))
    }
}

impl Program {
    fn is_atom(&self) -> bool {
        matches!(self, Program::Atom(_))
    }
}

struct Parenthesized<'a>(&'a Formula);

impl fmt::Display for Parenthesized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_atom() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

struct ParenthesizedProg<'a>(&'a Program);

impl fmt::Display for ParenthesizedProg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_atom() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{}", name),
            Formula::Not(inner) => write!(f, "!{}", Parenthesized(inner)),
            Formula::And(l, r) => write!(f, "{} & {}", Parenthesized(l), Parenthesized(r)),
            Formula::Or(l, r) => write!(f, "{} | {}", Parenthesized(l), Parenthesized(r)),
            Formula::Imp(l, r) => write!(f, "{} -> {}", Parenthesized(l), Parenthesized(r)),
            Formula::Iff(l, r) => write!(f, "{} <-> {}", Parenthesized(l), Parenthesized(r)),
            Formula::Diamond(p, inner) => write!(f, "<{}>{}", p, Parenthesized(inner)),
            Formula::Box(p, inner) => write!(f, "[{}]{}", p, Parenthesized(inner)),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Atom(name) => write!(f, "{}", name),
            Program::Seq(l, r) => {
                write!(f, "{};{}", ParenthesizedProg(l), ParenthesizedProg(r))
            }
            Program::Choice(l, r) => {
                write!(f, "{}U{}", ParenthesizedProg(l), ParenthesizedProg(r))
            }
            Program::Star(p) => write!(f, "{}*", ParenthesizedProg(p)),
            Program::Test(formula) => write!(f, "{}?", Parenthesized(formula)),
        }
    }
}
