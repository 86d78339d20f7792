//! Recursive-descent parser for the PDL concrete syntax
//!
//! Formula precedence, loosest first: `<->` (right), `->` (right), `|` (left),
//! `&` (left), unary. Program precedence: `;` (right), `U` (left), postfix `*`.
//!
//! Program atoms are inherently ambiguous up front: in `<(p|q)?;a>r` the `(` opens a
//! formula (a test), in `<(aUb);c>r` it opens a program, and the decision point is
//! arbitrarily far ahead. The parser resolves this the simple way: it first attempts
//! `formula "?"` and rewinds on failure, which needs no lookahead bound.

use super::lexer::{Spanned, Token};
use super::{Formula, Program};
use crate::error::PdlParseError;

pub(super) struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse a formula and require the input to be fully consumed
    pub(super) fn parse_complete(mut self) -> Result<Formula, PdlParseError> {
        let formula = self.parse_formula()?;
        match self.peek() {
            None => Ok(formula),
            Some(spanned) => Err(PdlParseError::UnexpectedToken {
                found: spanned.token.to_string(),
                position: spanned.position,
                expected: "end of input",
            }),
        }
    }

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Spanned> {
        let spanned = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(spanned)
    }

    /// Consume the next token if it matches
    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|s| &s.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), PdlParseError> {
        match self.advance() {
            Some(spanned) if spanned.token == token => Ok(()),
            Some(spanned) => Err(PdlParseError::UnexpectedToken {
                found: spanned.token.to_string(),
                position: spanned.position,
                expected,
            }),
            None => Err(PdlParseError::UnexpectedEnd { expected }),
        }
    }

    fn unexpected(&mut self, expected: &'static str) -> PdlParseError {
        match self.advance() {
            Some(spanned) => PdlParseError::UnexpectedToken {
                found: spanned.token.to_string(),
                position: spanned.position,
                expected,
            },
            None => PdlParseError::UnexpectedEnd { expected },
        }
    }

    fn parse_formula(&mut self) -> Result<Formula, PdlParseError> {
        self.parse_iff()
    }

    fn parse_iff(&mut self) -> Result<Formula, PdlParseError> {
        let left = self.parse_imp()?;
        if self.eat(&Token::Iff) {
            let right = self.parse_iff()?;
            Ok(Formula::Iff(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    fn parse_imp(&mut self) -> Result<Formula, PdlParseError> {
        let left = self.parse_or()?;
        if self.eat(&Token::Imp) {
            let right = self.parse_imp()?;
            Ok(Formula::Imp(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    fn parse_or(&mut self) -> Result<Formula, PdlParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Formula::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Formula, PdlParseError> {
        let mut left = self.parse_unary()?;
        while self.eat(&Token::And) {
            let right = self.parse_unary()?;
            left = Formula::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Formula, PdlParseError> {
        match self.peek().map(|s| s.token.clone()) {
            Some(Token::Not) => {
                self.pos += 1;
                let inner = self.parse_unary()?;
                Ok(Formula::Not(Box::new(inner)))
            }
            Some(Token::DiamondOpen) => {
                self.pos += 1;
                let program = self.parse_program()?;
                self.expect(Token::DiamondClose, "`>` closing the diamond")?;
                let inner = self.parse_unary()?;
                Ok(Formula::Diamond(Box::new(program), Box::new(inner)))
            }
            Some(Token::BoxOpen) => {
                self.pos += 1;
                let program = self.parse_program()?;
                self.expect(Token::BoxClose, "`]` closing the box")?;
                let inner = self.parse_unary()?;
                Ok(Formula::Box(Box::new(program), Box::new(inner)))
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(Formula::Atom(name))
            }
            Some(Token::ParenOpen) => {
                self.pos += 1;
                let inner = self.parse_formula()?;
                self.expect(Token::ParenClose, "`)` closing the formula")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("a formula")),
        }
    }

    fn parse_program(&mut self) -> Result<Program, PdlParseError> {
        self.parse_seq()
    }

    fn parse_seq(&mut self) -> Result<Program, PdlParseError> {
        let left = self.parse_choice()?;
        if self.eat(&Token::Seq) {
            let right = self.parse_seq()?;
            Ok(Program::Seq(Box::new(left), Box::new(right)))
        } else {
            Ok(left)
        }
    }

    fn parse_choice(&mut self) -> Result<Program, PdlParseError> {
        let mut left = self.parse_iter()?;
        while self.eat(&Token::Choice) {
            let right = self.parse_iter()?;
            left = Program::Choice(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_iter(&mut self) -> Result<Program, PdlParseError> {
        let mut program = self.parse_program_atom()?;
        while self.eat(&Token::Star) {
            program = Program::Star(Box::new(program));
        }
        Ok(program)
    }

    fn parse_program_atom(&mut self) -> Result<Program, PdlParseError> {
        // Try a test first: `formula ?`, rewinding on any failure
        let checkpoint = self.pos;
        if let Ok(formula) = self.parse_formula() {
            if self.eat(&Token::Test) {
                return Ok(Program::Test(Box::new(formula)));
            }
        }
        self.pos = checkpoint;

        match self.peek().map(|s| s.token.clone()) {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(Program::Atom(name))
            }
            Some(Token::ParenOpen) => {
                self.pos += 1;
                let program = self.parse_program()?;
                self.expect(Token::ParenClose, "`)` closing the program")?;
                Ok(program)
            }
            _ => Err(self.unexpected("a program")),
        }
    }
}
