//! # PDL Model Checker
//!
//! A symbolic model checker for Propositional Dynamic Logic over finite Kripke
//! structures. Models and formulas are represented as reduced ordered binary decision
//! diagrams (ROBDDs), so checking a formula never enumerates states: modalities become
//! quantifier eliminations over the transition relations, and the Kleene star becomes a
//! fixpoint computation inside the BDD lattice.
//!
//! ## Overview
//!
//! A Kripke model is encoded as:
//!
//! - a **law** `L`: a boolean function over the proposition variables that holds
//!   exactly on the legal states
//! - per program, a **transition relation** over proposition variables and their primed
//!   copies (`v'` carries the successor state's valuation)
//!
//! Evaluating `<π>φ` then asks whether some legal primed assignment satisfies both the
//! relation and `φ` moved onto the primed column; `[π]φ` asks whether all of them do.
//! Sequencing routes the intermediate state through a temporary variable family that is
//! existentially eliminated, and `π*` iterates `X ↦ I ∨ X;π` from the identity
//! relation until the BDD stops changing.
//!
//! ## Building a model
//!
//! From an explicit state list (valuation vectors plus 0/1 transition matrices):
//!
//! ```
//! use pdl_checker::{Formula, Model};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Model::from_explicit(
//!     2,
//!     &[("p".to_string(), vec![1, 0])],
//!     &[("a".to_string(), vec![vec![0, 1], vec![0, 0]])],
//! )?;
//!
//! let formula = Formula::parse("<a>(!p)")?;
//! assert_eq!(model.check_vector(&formula)?, vec![1, 0]);
//! # Ok(())
//! # }
//! ```
//!
//! Or symbolically, from a law and transition expressions:
//!
//! ```
//! use pdl_checker::{Formula, Model};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (model, _renames) = Model::from_symbolic(
//!     &["v1".to_string(), "v2".to_string()],
//!     "v1 | v2",
//!     &[("a".to_string(), vec!["v1 & v2'".to_string()])],
//! )?;
//!
//! let formula = Formula::parse("<a>v2")?;
//! assert!(model.check_in_state(&formula, "v1 & !v2")?);
//! # Ok(())
//! # }
//! ```
//!
//! States that share a propositional valuation are automatically told apart: the
//! explicit builder refines their cubes with synthetic `x0, x1, …` propositions until
//! every state has a distinct boolean identity, which is what makes per-state truth
//! vectors well defined.
//!
//! ## Queries
//!
//! - [`Model::check`] — the BDD of states satisfying a formula
//! - [`Model::check_vector`] — a 0/1 vector over the explicit state list
//! - [`Model::check_in_state`] — a boolean answer for one nominated state valuation
//! - [`Model::check_dump`] — persist the result BDD as a Graphviz file
//!
//! Queries are recoverable: a bad formula or an unknown name aborts only that query,
//! never the model.
//!
//! The `pdlcheck` binary (behind the `cli` feature) wraps all of this in a command-line
//! tool with both model file formats, random model synthesis, and an interactive loop.

pub mod bdd;
pub mod error;
pub mod eval;
pub mod expr;
pub mod model;
pub mod pdl;

// Re-export the high-level public API
pub use bdd::{Bdd, Manager};
pub use error::{
    CheckError, EvalError, ExprParseError, ModelBuildError, ModelReadError, PdlParseError,
};
pub use eval::Evaluator;
pub use expr::ExprAst;
pub use model::{Model, Rename};
pub use pdl::{Formula, Program};
