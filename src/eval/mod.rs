//! Semantic evaluation of PDL formulas over a symbolic model
//!
//! Formulas evaluate to BDDs over the base variables: `s ⊨ φ` iff `⟦φ⟧` holds at `s`.
//! Programs evaluate to BDDs over base and primed variables: `(s, s')` is a transition
//! of `π` iff `⟦π⟧(s, s')` holds.
//!
//! The modalities are quantifier eliminations over the primed column: the diamond is
//! `∃V'. (P ∧ L' ∧ F')` and the box is `∀V'. ((P ∧ L') → F')`, where `L'` is the law
//! renamed to the primed column. Conjoining `L'` restricts to legal successors even
//! when a program relation was not tightened at construction time.
//!
//! Sequence is relational composition: the first relation's primed column and the
//! second relation's base column are renamed into the temporary family, conjoined, and
//! the temporaries are existentially eliminated. Iteration is the least fixpoint of
//! `X ↦ I ∨ compose(X, P)` starting from the identity relation, iterated to stability;
//! the variable set is frozen during the loop, so the chain is monotone inside a finite
//! lattice and must converge.

use crate::bdd::Bdd;
use crate::error::EvalError;
use crate::model::{Model, add_primes, add_temporary, is_primed, is_temporary};
use crate::pdl::{Formula, Program};
use std::sync::Arc;
use tracing::trace;

/// Evaluates formulas and programs against one model
///
/// Borrow-scoped to the model; the identity relation and primed law it needs are
/// computed once per model and cached there.
pub struct Evaluator<'m> {
    model: &'m Model,
}

impl<'m> Evaluator<'m> {
    pub fn new(model: &'m Model) -> Self {
        Evaluator { model }
    }

    /// Evaluate a formula to the BDD of states satisfying it
    pub fn eval_formula(&self, formula: &Formula) -> Result<Bdd, EvalError> {
        match formula {
            Formula::Atom(name) => self.model.formula_symbol(name),
            Formula::Not(inner) => Ok(self.eval_formula(inner)?.not()),
            Formula::And(l, r) => Ok(self.eval_formula(l)?.and(&self.eval_formula(r)?)),
            Formula::Or(l, r) => Ok(self.eval_formula(l)?.or(&self.eval_formula(r)?)),
            Formula::Imp(l, r) => Ok(self.eval_formula(l)?.implies(&self.eval_formula(r)?)),
            Formula::Iff(l, r) => {
                // !(a ^ b), not (a ^ b): the biconditional holds where the sides agree
                Ok(self.eval_formula(l)?.xor(&self.eval_formula(r)?).not())
            }
            Formula::Diamond(program, inner) => {
                let relation = self.eval_program(program)?;
                let target = self.eval_formula(inner)?;
                Ok(self.diamond(&relation, &target))
            }
            Formula::Box(program, inner) => {
                let relation = self.eval_program(program)?;
                let target = self.eval_formula(inner)?;
                Ok(self.box_modality(&relation, &target))
            }
        }
    }

    /// Evaluate a program to its transition relation
    pub fn eval_program(&self, program: &Program) -> Result<Bdd, EvalError> {
        match program {
            Program::Atom(name) => self.model.program_symbol(name),
            Program::Seq(first, second) => {
                let first = self.eval_program(first)?;
                let second = self.eval_program(second)?;
                Ok(self.compose(&first, &second))
            }
            Program::Choice(left, right) => {
                Ok(self.eval_program(left)?.or(&self.eval_program(right)?))
            }
            Program::Star(inner) => {
                let relation = self.eval_program(inner)?;
                Ok(self.star(&relation))
            }
            Program::Test(formula) => {
                // The identity relation filtered to where the formula holds
                Ok(self.model.identity().and(&self.eval_formula(formula)?))
            }
        }
    }

    /// `∃V'. (P ∧ L' ∧ F')`: states with some legal successor satisfying the target
    ///
    /// `V'` is the set of primed variables in the relation's support, determined
    /// before the law and target conjuncts come in.
    fn diamond(&self, relation: &Bdd, target: &Bdd) -> Bdd {
        let primed = primed_vars(relation);
        relation
            .and(self.model.law_primed())
            .and(&add_primes(target))
            .exists(&primed)
    }

    /// `∀V'. ((P ∧ L') → F')`: states whose legal successors all satisfy the target
    fn box_modality(&self, relation: &Bdd, target: &Bdd) -> Bdd {
        let primed = primed_vars(relation);
        relation
            .and(self.model.law_primed())
            .implies(&add_primes(target))
            .forall(&primed)
    }

    /// Relational composition through the temporary variable family
    ///
    /// `first`'s successor column and `second`'s base column are both renamed to the
    /// temporary names, so conjoining links them; eliminating the temporaries leaves a
    /// relation from `first`'s base side to `second`'s primed side.
    pub fn compose(&self, first: &Bdd, second: &Bdd) -> Bdd {
        let first_temp = add_temporary(first, true);
        let second_temp = add_temporary(second, false);

        let linked = first_temp.and(&second_temp);

        let temporaries: Vec<Arc<str>> = linked
            .support()
            .into_iter()
            .filter(|name| is_temporary(name))
            .collect();
        linked.exists(&temporaries)
    }

    /// Least fixpoint of `X ↦ I ∨ compose(X, P)` starting at the identity
    fn star(&self, relation: &Bdd) -> Bdd {
        let identity = self.model.identity();
        let mut result = identity.clone();
        let mut iterations = 0usize;
        loop {
            let next = identity.or(&self.compose(&result, relation));
            iterations += 1;
            if next == result {
                break;
            }
            // Rebinding drops the superseded iterate immediately
            result = next;
        }
        trace!(iterations, "iteration fixpoint reached");
        result
    }
}

/// The primed variable names in a BDD's support
fn primed_vars(bdd: &Bdd) -> Vec<Arc<str>> {
    bdd.support()
        .into_iter()
        .filter(|name| is_primed(name))
        .collect()
}
