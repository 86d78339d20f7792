//! The query surface: evaluating formulas against a model
//!
//! Four forms, all built on the same evaluation: the raw BDD of satisfying states, a
//! 0/1 truth vector over an explicit model's state list, a yes/no answer for one
//! nominated state, and a Graphviz dump of the result. Query failures never invalidate
//! the model.

use super::Model;
use crate::bdd::Bdd;
use crate::error::CheckError;
use crate::eval::Evaluator;
use crate::expr::ExprAst;
use crate::pdl::Formula;
use std::path::Path;
use tracing::debug;

impl Model {
    /// Evaluate a formula to the BDD of states satisfying it
    pub fn check(&self, formula: &Formula) -> Result<Bdd, CheckError> {
        let result = Evaluator::new(self).eval_formula(formula)?;
        debug!(formula = %formula, nodes = result.node_count(), "formula evaluated");
        Ok(result)
    }

    /// Evaluate a formula to a 0/1 truth vector over the explicit state list
    ///
    /// `vector[i]` is 1 iff state `i` satisfies the formula, i.e. the state's cube
    /// implies the result everywhere. Only available on models that retain their state
    /// list (the explicit builder); symbolic models fail with
    /// [`CheckError::NoStateList`].
    pub fn check_vector(&self, formula: &Formula) -> Result<Vec<u8>, CheckError> {
        let states = self.states.as_ref().ok_or(CheckError::NoStateList)?;
        let result = self.check(formula)?;
        Ok(states
            .iter()
            .map(|state| u8::from(state.implies_everywhere(&result)))
            .collect())
    }

    /// Evaluate a formula in one nominated state
    ///
    /// The state is given as a boolean expression over the model's variables (a cube of
    /// literals describing its valuation). The expression must describe states of the
    /// model: if it does not imply the law, the query fails with
    /// [`CheckError::StateNotInModel`].
    pub fn check_in_state(&self, formula: &Formula, valuation: &str) -> Result<bool, CheckError> {
        let cube = ExprAst::parse(valuation)?.to_bdd(&self.manager)?;
        if !cube.implies_everywhere(&self.law) {
            return Err(CheckError::StateNotInModel);
        }

        let result = self.check(formula)?;
        Ok(cube.implies_everywhere(&result))
    }

    /// Evaluate a formula and persist the resulting BDD as a Graphviz file
    pub fn check_dump<P: AsRef<Path>>(
        &self,
        formula: &Formula,
        path: P,
    ) -> Result<(), CheckError> {
        let result = self.check(formula)?;
        result.dump_dot(path)?;
        Ok(())
    }
}
