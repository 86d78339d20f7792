//! Symbolic Kripke models
//!
//! A [`Model`] is the boolean encoding of a finite Kripke structure:
//!
//! - a **law** `L` over the base variables, true exactly on the legal states
//! - per program name, a **transition relation** over base and primed variables
//! - the base proposition alphabet, plus any synthetic `x0, x1, …` propositions the
//!   uniqueness pass had to add
//! - for models built from an explicit state list, the per-state cubes retained for
//!   truth-vector queries
//!
//! Three variable families share the model's manager, told apart purely by name: base
//! variables, their primed copies (`v'`, the successor-state column of a relation), and
//! temporary copies (`vT`, used transiently during relational composition and
//! existentially eliminated afterwards).
//!
//! Models are built by [`Model::from_explicit`] (enumerated states and 0/1 transition
//! matrices), [`Model::from_symbolic`] (law and transitions as boolean expressions), the
//! corresponding `*_file` readers, or [`Model::random`].

use crate::bdd::{Bdd, Manager};
use crate::error::EvalError;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

mod explicit;
mod query;
mod random;
mod symbolic;

pub use symbolic::Rename;

/// Suffix marking the primed (successor-state) copy of a variable
const PRIME_SUFFIX: char = '\'';

/// Suffix marking the temporary copy of a variable
const TEMP_SUFFIX: char = 'T';

pub(crate) fn is_primed(name: &str) -> bool {
    name.ends_with(PRIME_SUFFIX)
}

pub(crate) fn is_temporary(name: &str) -> bool {
    name.ends_with(TEMP_SUFFIX)
}

pub(crate) fn primed_name(name: &str) -> String {
    format!("{}{}", name, PRIME_SUFFIX)
}

/// Rename every variable in the expression to its primed form
///
/// Primed names are declared on the fly, so this also works for variables whose primed
/// copy has not been used yet.
pub(crate) fn add_primes(expr: &Bdd) -> Bdd {
    let map: BTreeMap<Arc<str>, Arc<str>> = expr
        .support()
        .into_iter()
        .map(|var| {
            let primed: Arc<str> = Arc::from(primed_name(&var));
            (var, primed)
        })
        .collect();
    expr.rename(&map)
}

/// Rename one column of a relation to its temporary form
///
/// With `for_primed` set, primed variables lose their prime and gain the temporary
/// suffix (`v'` becomes `vT`); otherwise unprimed variables gain it (`v` becomes `vT`).
/// The other column is left untouched, which is exactly what relational composition
/// needs: the first relation's successor column and the second relation's base column
/// meet in the temporary family.
pub(crate) fn add_temporary(expr: &Bdd, for_primed: bool) -> Bdd {
    let mut map = BTreeMap::new();
    for var in expr.support() {
        if is_primed(&var) && for_primed {
            let base = &var[..var.len() - 1];
            map.insert(var.clone(), Arc::from(format!("{}{}", base, TEMP_SUFFIX)));
        } else if !is_primed(&var) && !for_primed {
            map.insert(var.clone(), Arc::from(format!("{}{}", var, TEMP_SUFFIX)));
        }
    }
    expr.rename(&map)
}

/// A symbolically represented Kripke model
///
/// Owns its BDD manager; every BDD the model or its queries hand out lives in that
/// manager. The model is a scoped resource: dropping it (or calling
/// [`Model::release`]) releases the law, the program relations, the retained state
/// list, the cached evaluation helpers, and finally the manager itself.
#[derive(Debug)]
pub struct Model {
    manager: Manager,
    /// Native proposition names, in declaration order
    prop_names: Vec<Arc<str>>,
    /// Synthetic propositions the uniqueness pass added, in allocation order
    synthetic_names: Vec<Arc<str>>,
    law: Bdd,
    programs: BTreeMap<String, Bdd>,
    /// State cubes retained by the explicit builder; `None` for symbolic models
    states: Option<Vec<Bdd>>,
    /// Formulas embedded in the model file's TESTS section
    tests: Vec<String>,
    /// Identity relation over the law's support, computed on first use
    identity: OnceCell<Bdd>,
    /// The law renamed to the primed column, computed on first use
    primed_law: OnceCell<Bdd>,
}

impl Model {
    pub(crate) fn new(
        manager: Manager,
        prop_names: Vec<Arc<str>>,
        synthetic_names: Vec<Arc<str>>,
        law: Bdd,
        programs: BTreeMap<String, Bdd>,
        states: Option<Vec<Bdd>>,
        tests: Vec<String>,
    ) -> Model {
        Model {
            manager,
            prop_names,
            synthetic_names,
            law,
            programs,
            states,
            tests,
            identity: OnceCell::new(),
            primed_law: OnceCell::new(),
        }
    }

    /// The model's BDD manager
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// The law: a BDD over base variables that holds exactly on legal states
    pub fn law(&self) -> &Bdd {
        &self.law
    }

    /// Look up a program's transition relation by name
    pub fn program(&self, name: &str) -> Option<&Bdd> {
        self.programs.get(name)
    }

    /// Names of the model's programs, sorted
    pub fn program_names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }

    /// Native proposition names, in declaration order
    pub fn prop_names(&self) -> &[Arc<str>] {
        &self.prop_names
    }

    /// How many synthetic uniqueness propositions the builder added
    pub fn synthetic_count(&self) -> usize {
        self.synthetic_names.len()
    }

    /// Number of states, when the model retains its explicit state list
    pub fn num_states(&self) -> Option<usize> {
        self.states.as_ref().map(Vec::len)
    }

    /// The retained state cubes, for models built from an explicit state list
    pub fn states(&self) -> Option<&[Bdd]> {
        self.states.as_deref()
    }

    /// Formulas embedded in the source file's TESTS section
    pub fn file_tests(&self) -> &[String] {
        &self.tests
    }

    /// Comma-joined program names, truncated to 40 characters for banners
    pub fn program_names_listed(&self) -> String {
        truncate_listing(self.programs.keys().map(String::as_str))
    }

    /// Comma-joined proposition names, truncated to 40 characters for banners
    pub fn prop_names_listed(&self) -> String {
        truncate_listing(self.prop_names.iter().map(|n| n.as_ref()))
    }

    /// The law renamed to the primed column, cached after the first call
    pub(crate) fn law_primed(&self) -> &Bdd {
        self.primed_law.get_or_init(|| add_primes(&self.law))
    }

    /// Identity relation: each variable in the law's support agrees with its primed
    /// copy
    ///
    /// The base of the Kleene-star fixpoint and the meaning of the test operator.
    /// Variables the law does not constrain contribute no column. Computed once per
    /// model.
    pub(crate) fn identity(&self) -> &Bdd {
        self.identity.get_or_init(|| {
            let mut identity = self.manager.constant(true);
            for name in self.law.support() {
                let var = self
                    .manager
                    .var(&name)
                    .expect("law support contains undeclared variable");
                let var_primed = add_primes(&var);
                identity = identity.and(&var.xor(&var_primed).not());
            }
            identity
        })
    }

    /// Resolve a proposition atom for evaluation
    pub(crate) fn formula_symbol(&self, name: &str) -> Result<Bdd, EvalError> {
        self.manager.var(name).ok_or_else(|| EvalError::UnknownSymbol {
            name: name.to_string(),
        })
    }

    /// Resolve a program atom for evaluation
    pub(crate) fn program_symbol(&self, name: &str) -> Result<Bdd, EvalError> {
        self.programs
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownProgram {
                name: name.to_string(),
            })
    }

    /// Explicitly end the model's scope
    ///
    /// Drops the cached evaluation helpers, the retained state list, the program map,
    /// and the law before the manager itself goes away. Letting the model fall out of
    /// scope does the same; this form just makes the teardown point visible.
    pub fn release(self) {
        let Model {
            manager,
            prop_names,
            synthetic_names: _,
            law,
            programs,
            states,
            tests,
            identity,
            primed_law,
        } = self;
        drop(identity);
        drop(primed_law);
        drop(states);
        drop(programs);
        drop(law);
        drop(tests);
        drop(prop_names);
        drop(manager);
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.num_states() {
            Some(n) => writeln!(f, "Number of states\n{}\n", n)?,
            None => writeln!(f, "Symbolic model over {}\n", self.prop_names_listed())?,
        }
        writeln!(f, "Law:\n{}", self.law.to_expr_string())?;
        writeln!(f, "\nPrograms:")?;
        for (name, relation) in &self.programs {
            writeln!(f, "{}:\n {}", name, relation.to_expr_string())?;
        }
        Ok(())
    }
}

fn truncate_listing<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let full: String = names.collect::<Vec<_>>().join(", ");
    if full.len() > 40 {
        format!("{}...", &full[..40])
    } else {
        full
    }
}

#[cfg(test)]
mod tests;
