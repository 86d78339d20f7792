//! Building a model from a symbolic description
//!
//! The symbolic form skips state enumeration entirely: the caller declares the base
//! variables, gives the law as a boolean expression, and gives each program as a list
//! of transition expressions over base and primed variables that get disjoined. No
//! state list is retained, so truth-vector queries are unavailable on these models.

use super::{Model, add_primes, primed_name};
use crate::bdd::Manager;
use crate::error::{ModelBuildError, ModelReadError};
use crate::expr::ExprAst;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A variable rename applied during construction
///
/// Purely numeric variable names are not valid identifiers in the expression language,
/// so a declared variable `7` is renamed to `x7` everywhere and the rename is reported
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// The name as declared in the input
    pub from: String,
    /// The name actually used by the model
    pub to: String,
}

impl Model {
    /// Build a model from declared variables, a law expression, and per-program
    /// transition expressions
    ///
    /// Returns the model together with the renames applied to purely numeric variable
    /// names. Every expression may only reference declared variables (primed forms
    /// included); anything else fails with an undeclared-variable error.
    pub fn from_symbolic(
        variables: &[String],
        law: &str,
        programs: &[(String, Vec<String>)],
    ) -> Result<(Model, Vec<Rename>), ModelBuildError> {
        let manager = Manager::new();

        let mut renames: Vec<Rename> = Vec::new();
        let mut rename_map: BTreeMap<String, String> = BTreeMap::new();
        let mut prop_names: Vec<Arc<str>> = Vec::with_capacity(variables.len());

        for name in variables {
            let declared = if name.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() {
                let renamed = format!("x{}", name);
                warn!(from = %name, to = %renamed, "numeric variable name replaced");
                renames.push(Rename {
                    from: name.clone(),
                    to: renamed.clone(),
                });
                rename_map.insert(name.clone(), renamed.clone());
                renamed
            } else {
                name.clone()
            };
            manager.declare(&declared);
            manager.declare(&primed_name(&declared));
            prop_names.push(Arc::from(declared.as_str()));
        }

        let law_text = apply_renames(law, &rename_map);
        let law_bdd = ExprAst::parse(&law_text)?.to_bdd(&manager)?;

        // Both columns of every relation must stay within the law
        let legal = law_bdd.and(&add_primes(&law_bdd));

        let mut program_map = BTreeMap::new();
        for (name, transitions) in programs {
            if program_map.contains_key(name) {
                return Err(ModelBuildError::DuplicateProgram { name: name.clone() });
            }

            let mut relation = manager.constant(false);
            for transition in transitions {
                let transition_text = apply_renames(transition, &rename_map);
                let transition_bdd = ExprAst::parse(&transition_text)?.to_bdd(&manager)?;
                relation = relation.or(&transition_bdd);
            }
            // Restrict prunes the graph using the law as a care set; conjoining the
            // legality constraint pins the relation to false outside it
            let relation = relation.restrict(&law_bdd).and(&legal);
            program_map.insert(name.clone(), relation);
        }

        debug!(
            variables = prop_names.len(),
            programs = program_map.len(),
            renames = renames.len(),
            "symbolic model built"
        );

        let model = Model::new(
            manager,
            prop_names,
            Vec::new(),
            law_bdd,
            program_map,
            None,
            Vec::new(),
        );
        Ok((model, renames))
    }

    /// Read a model from a file in the symbolic format
    ///
    /// ```text
    /// PROPS
    /// v1, v2
    /// LAW
    /// v1 | v2
    /// PROGRAMS
    /// a
    /// v1 & !v1'
    /// v2 & v1'
    ///
    /// b
    /// v2 & v2'
    /// ```
    ///
    /// PROPS takes comma-separated names; a blank line terminates a program's
    /// transition list.
    pub fn from_symbolic_file<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Model, Vec<Rename>), ModelReadError> {
        let text = fs::read_to_string(path)?;
        parse_symbolic_text(&text).map_err(ModelReadError::from)
    }
}

fn parse_symbolic_text(text: &str) -> Result<(Model, Vec<Rename>), ModelBuildError> {
    #[derive(PartialEq)]
    enum Section {
        None,
        Props,
        Law,
        Programs,
    }

    let mut section = Section::None;
    let mut variables: Vec<String> = Vec::new();
    let mut law: Option<String> = None;
    let mut programs: Vec<(String, Vec<String>)> = Vec::new();
    let mut current_program: Option<(String, Vec<String>)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() {
            // A blank line closes the transition list of the program being read
            if let Some(finished) = current_program.take() {
                programs.push(finished);
            }
            continue;
        }

        match line {
            "PROPS" | "LAW" | "PROGRAMS" => {
                if let Some(finished) = current_program.take() {
                    programs.push(finished);
                }
                section = match line {
                    "PROPS" => Section::Props,
                    "LAW" => Section::Law,
                    _ => Section::Programs,
                };
            }
            _ => match section {
                Section::Props => {
                    variables.extend(
                        line.split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(str::to_string),
                    );
                }
                Section::Law => {
                    if law.is_some() {
                        return Err(ModelBuildError::Format {
                            line: index + 1,
                            message: "more than one LAW expression".to_string(),
                        });
                    }
                    law = Some(line.to_string());
                }
                Section::Programs => match current_program.as_mut() {
                    None => current_program = Some((line.to_string(), Vec::new())),
                    Some((_, transitions)) => transitions.push(line.to_string()),
                },
                Section::None => {
                    return Err(ModelBuildError::Format {
                        line: index + 1,
                        message: format!("unexpected line outside any section: {:?}", line),
                    });
                }
            },
        }
    }
    if let Some(finished) = current_program.take() {
        programs.push(finished);
    }

    let law = law.ok_or_else(|| ModelBuildError::Format {
        line: 0,
        message: "missing LAW section".to_string(),
    })?;

    Model::from_symbolic(&variables, &law, &programs)
}

/// Apply numeric-name renames to an expression line, respecting token boundaries
///
/// Only maximal digit runs that stand alone as a token are replaced, so a rename of
/// `1` leaves `13` and `p1` untouched.
fn apply_renames(line: &str, renames: &BTreeMap<String, String>) -> String {
    if renames.is_empty() {
        return line.to_string();
    }

    let bytes = line.as_bytes();
    let run_starts_at = |i: usize| -> bool {
        bytes[i].is_ascii_digit() && (i == 0 || !is_ident_char(bytes[i - 1]))
    };

    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < bytes.len() {
        if run_starts_at(i) {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let token = &line[start..i];
            let standalone = i >= bytes.len() || !is_ident_char(bytes[i]);
            match renames.get(token) {
                Some(renamed) if standalone => out.push_str(renamed),
                _ => out.push_str(token),
            }
        } else {
            let start = i;
            i += 1;
            while i < bytes.len() && !run_starts_at(i) {
                i += 1;
            }
            out.push_str(&line[start..i]);
        }
    }
    out
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
