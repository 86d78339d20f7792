//! Boolean-expression input language
//!
//! Symbolic model files describe their law and transitions as boolean expressions over
//! the declared variables (primed names included), and per-state queries describe a
//! state the same way. This module parses that language into a small AST and lowers the
//! AST onto a model's BDD manager, where referencing an undeclared variable is an error.
//!
//! Supported operators: `!`, `&`, `|`, `->`, `<->`, parentheses, and the constants
//! `0`/`1`/`true`/`false`.

use crate::bdd::{Bdd, Manager};
use crate::error::{CheckError, ExprParseError, ModelBuildError};
use std::fmt;

// Lalrpop-generated parser module (generated in OUT_DIR at build time)
#[allow(clippy::all)]
mod parser_impl {
    #![allow(clippy::all)]
    #![allow(dead_code)]
    #![allow(unused_imports)]
    include!(concat!(env!("OUT_DIR"), "/expr/bool_expr.rs"));
}

/// Parsed boolean expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprAst {
    /// A named variable, possibly primed
    Var(String),
    /// A constant value
    Const(bool),
    /// Negation
    Not(Box<ExprAst>),
    /// Conjunction
    And(Box<ExprAst>, Box<ExprAst>),
    /// Disjunction
    Or(Box<ExprAst>, Box<ExprAst>),
    /// Implication
    Imp(Box<ExprAst>, Box<ExprAst>),
    /// Biconditional
    Iff(Box<ExprAst>, Box<ExprAst>),
}

/// An identifier with no declared variable behind it
///
/// Raised when lowering an expression onto a manager; converted into the appropriate
/// construction or query error at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndeclaredVariable {
    /// The unknown variable name
    pub name: String,
}

impl fmt::Display for UndeclaredVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable '{}' is not declared", self.name)
    }
}

impl std::error::Error for UndeclaredVariable {}

impl From<UndeclaredVariable> for ModelBuildError {
    fn from(err: UndeclaredVariable) -> Self {
        ModelBuildError::UndeclaredVariable { name: err.name }
    }
}

impl From<UndeclaredVariable> for CheckError {
    fn from(err: UndeclaredVariable) -> Self {
        CheckError::UndeclaredVariable { name: err.name }
    }
}

impl ExprAst {
    /// Parse a boolean expression from a string
    pub fn parse(input: &str) -> Result<Self, ExprParseError> {
        parser_impl::ExprParser::new()
            .parse(input)
            .map_err(|e| match e {
                lalrpop_util::ParseError::InvalidToken { location } => {
                    ExprParseError::InvalidOperator {
                        input: input.to_string(),
                        position: location,
                    }
                }
                other => ExprParseError::InvalidSyntax {
                    message: other.to_string(),
                    input: input.to_string(),
                },
            })
    }

    /// Lower this expression onto a manager by variable lookup
    ///
    /// Every identifier must already be declared; this is where the builders catch law
    /// and transition lines referencing unknown variables.
    pub fn to_bdd(&self, manager: &Manager) -> Result<Bdd, UndeclaredVariable> {
        match self {
            ExprAst::Var(name) => manager.var(name).ok_or_else(|| UndeclaredVariable {
                name: name.clone(),
            }),
            ExprAst::Const(value) => Ok(manager.constant(*value)),
            ExprAst::Not(inner) => Ok(inner.to_bdd(manager)?.not()),
            ExprAst::And(l, r) => Ok(l.to_bdd(manager)?.and(&r.to_bdd(manager)?)),
            ExprAst::Or(l, r) => Ok(l.to_bdd(manager)?.or(&r.to_bdd(manager)?)),
            ExprAst::Imp(l, r) => Ok(l.to_bdd(manager)?.implies(&r.to_bdd(manager)?)),
            ExprAst::Iff(l, r) => Ok(l.to_bdd(manager)?.iff(&r.to_bdd(manager)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable_and_constants() {
        assert_eq!(ExprAst::parse("p").unwrap(), ExprAst::Var("p".to_string()));
        assert_eq!(ExprAst::parse("1").unwrap(), ExprAst::Const(true));
        assert_eq!(ExprAst::parse("0").unwrap(), ExprAst::Const(false));
        assert_eq!(ExprAst::parse("true").unwrap(), ExprAst::Const(true));
        assert_eq!(ExprAst::parse("false").unwrap(), ExprAst::Const(false));
    }

    #[test]
    fn test_parse_primed_variable() {
        assert_eq!(
            ExprAst::parse("v1'").unwrap(),
            ExprAst::Var("v1'".to_string())
        );
    }

    #[test]
    fn test_parse_precedence() {
        // & over |, | over ->
        let parsed = ExprAst::parse("a & b | c -> d").unwrap();
        assert_eq!(
            parsed,
            ExprAst::Imp(
                Box::new(ExprAst::Or(
                    Box::new(ExprAst::And(
                        Box::new(ExprAst::Var("a".to_string())),
                        Box::new(ExprAst::Var("b".to_string())),
                    )),
                    Box::new(ExprAst::Var("c".to_string())),
                )),
                Box::new(ExprAst::Var("d".to_string())),
            )
        );
    }

    #[test]
    fn test_parse_negation_and_parens() {
        let parsed = ExprAst::parse("!(a | b)").unwrap();
        assert_eq!(
            parsed,
            ExprAst::Not(Box::new(ExprAst::Or(
                Box::new(ExprAst::Var("a".to_string())),
                Box::new(ExprAst::Var("b".to_string())),
            )))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ExprAst::parse("a &").is_err());
        assert!(ExprAst::parse("(a").is_err());
        assert!(matches!(
            ExprAst::parse("a $ b"),
            Err(ExprParseError::InvalidOperator { position: 2, .. })
        ));
    }

    #[test]
    fn test_to_bdd_and_undeclared() {
        let mgr = Manager::new();
        let p = mgr.declare("p");
        let q = mgr.declare("q");

        let bdd = ExprAst::parse("p & !q").unwrap().to_bdd(&mgr).unwrap();
        assert_eq!(bdd, p.and(&q.not()));

        let err = ExprAst::parse("p & r").unwrap().to_bdd(&mgr).unwrap_err();
        assert_eq!(err.name, "r");
    }

    #[test]
    fn test_to_bdd_connectives() {
        let mgr = Manager::new();
        let p = mgr.declare("p");
        let q = mgr.declare("q");

        let imp = ExprAst::parse("p -> q").unwrap().to_bdd(&mgr).unwrap();
        assert_eq!(imp, p.implies(&q));

        let iff = ExprAst::parse("p <-> q").unwrap().to_bdd(&mgr).unwrap();
        assert_eq!(iff, p.iff(&q));

        let taut = ExprAst::parse("p | !p").unwrap().to_bdd(&mgr).unwrap();
        assert!(taut.is_true());
    }
}
