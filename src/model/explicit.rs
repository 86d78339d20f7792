//! Building a model from an enumerated state list and 0/1 transition matrices
//!
//! The explicit form gives every proposition a valuation vector over the states and
//! every program an adjacency matrix. States are encoded as cubes over the proposition
//! variables; since different states may share identical valuations, a uniqueness pass
//! refines the cubes with synthetic propositions until each state has a distinct
//! boolean identity. The law is the disjunction of the state cubes, and each matrix
//! becomes the disjunction of `cube(i) & primed(cube(j))` over its 1-entries.

use super::{Model, add_primes, primed_name};
use crate::bdd::{Bdd, Manager};
use crate::error::{ModelBuildError, ModelReadError};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

impl Model {
    /// Build a model from explicit components
    ///
    /// `props` pairs each proposition name with its valuation vector (one 0/1 entry per
    /// state); `programs` pairs each program name with its n x n 0/1 transition matrix.
    pub fn from_explicit(
        num_states: usize,
        props: &[(String, Vec<u8>)],
        programs: &[(String, Vec<Vec<u8>>)],
    ) -> Result<Model, ModelBuildError> {
        Self::from_explicit_with_tests(num_states, props, programs, Vec::new())
    }

    pub(crate) fn from_explicit_with_tests(
        num_states: usize,
        props: &[(String, Vec<u8>)],
        programs: &[(String, Vec<Vec<u8>>)],
        tests: Vec<String>,
    ) -> Result<Model, ModelBuildError> {
        let manager = Manager::new();

        for (name, valuation) in props {
            if valuation.len() != num_states {
                return Err(ModelBuildError::ValuationLength {
                    name: name.clone(),
                    expected: num_states,
                    actual: valuation.len(),
                });
            }
        }

        // Declare each proposition and its primed copy back-to-back, then conjoin the
        // matching literal onto every state cube
        let mut prop_names: Vec<Arc<str>> = Vec::with_capacity(props.len());
        let mut states = vec![manager.constant(true); num_states];
        for (name, valuation) in props {
            let var = manager.declare(name);
            manager.declare(&primed_name(name));
            prop_names.push(Arc::from(name.as_str()));

            for (state, &bit) in states.iter_mut().zip(valuation) {
                *state = if bit == 1 {
                    state.and(&var)
                } else {
                    state.and(&var.not())
                };
            }
        }

        let synthetic_names = make_states_unique(&manager, &mut states);

        let law = states
            .iter()
            .fold(manager.constant(false), |law, state| law.or(state));

        // Both columns of every relation must stay within the law
        let legal = law.and(&add_primes(&law));

        let mut program_map = BTreeMap::new();
        for (name, matrix) in programs {
            if program_map.contains_key(name) {
                return Err(ModelBuildError::DuplicateProgram { name: name.clone() });
            }
            check_matrix_shape(name, matrix, num_states)?;

            let mut relation = manager.constant(false);
            for (i, row) in matrix.iter().enumerate() {
                for (j, &bit) in row.iter().enumerate() {
                    if bit == 1 {
                        let transition = states[i].and(&add_primes(&states[j]));
                        relation = relation.or(&transition);
                    }
                }
            }
            // Restrict prunes the graph using the law as a care set; conjoining the
            // legality constraint pins the relation to false outside it
            let relation = relation.restrict(&law).and(&legal);
            trace!(program = %name, nodes = relation.node_count(), "program relation built");
            program_map.insert(name.clone(), relation);
        }

        debug!(
            num_states,
            props = props.len(),
            programs = program_map.len(),
            synthetic = synthetic_names.len(),
            "explicit model built"
        );

        Ok(Model::new(
            manager,
            prop_names,
            synthetic_names,
            law,
            program_map,
            Some(states),
            tests,
        ))
    }

    /// Read a model from a file in the explicit (matrix) format
    ///
    /// ```text
    /// STATES
    /// 2
    /// PROPS
    /// p
    /// 1 0
    /// PROGS
    /// a
    /// 0 1
    /// 0 0
    /// TESTS
    /// <a>(!p)
    /// ```
    ///
    /// Blank lines are ignored; section headers are literal tokens on their own line.
    /// TESTS lines are retained and exposed through [`Model::file_tests`].
    pub fn from_explicit_file<P: AsRef<Path>>(path: P) -> Result<Model, ModelReadError> {
        let text = fs::read_to_string(path)?;
        parse_explicit_text(&text).map_err(ModelReadError::from)
    }
}

fn check_matrix_shape(
    name: &str,
    matrix: &[Vec<u8>],
    num_states: usize,
) -> Result<(), ModelBuildError> {
    if matrix.len() != num_states {
        return Err(ModelBuildError::MatrixShape {
            name: name.to_string(),
            expected: num_states,
            rows: matrix.len(),
            columns: matrix.first().map(Vec::len).unwrap_or(0),
        });
    }
    for row in matrix {
        if row.len() != num_states {
            return Err(ModelBuildError::MatrixShape {
                name: name.to_string(),
                expected: num_states,
                rows: matrix.len(),
                columns: row.len(),
            });
        }
    }
    Ok(())
}

/// Indices of every even-numbered occurrence of a state cube
///
/// Scanning left to right, the second, fourth, … occurrence of each cube lands in the
/// result; removing a cube from the seen-set on its second occurrence makes the third
/// count as a first again.
fn even_occurrence_indices(states: &[Bdd]) -> HashSet<usize> {
    let mut seen_once = HashSet::new();
    let mut indices = HashSet::new();

    for (index, state) in states.iter().enumerate() {
        let root = state.root();
        if seen_once.contains(&root) {
            indices.insert(index);
            seen_once.remove(&root);
        } else {
            seen_once.insert(root);
        }
    }

    indices
}

/// Refine state cubes with synthetic propositions until all are pairwise distinct
///
/// Each pass conjoins a fresh `x{k}` positively onto the even-numbered occurrences and
/// negatively onto everything else, separating at least one duplicate pair without
/// merging any distinct pair. Odd-sized duplicate classes leave their last member for
/// a later pass, so a single pass is not assumed sufficient. Returns the names of the
/// synthetic propositions added.
fn make_states_unique(manager: &Manager, states: &mut [Bdd]) -> Vec<Arc<str>> {
    let mut name_counter = 0;
    let mut added: Vec<Arc<str>> = Vec::new();

    let mut duplicates = even_occurrence_indices(states);
    while !duplicates.is_empty() {
        // Fresh synthetic proposition, skipping names the native alphabet already took
        let name = loop {
            let candidate = format!("x{}", name_counter);
            name_counter += 1;
            if !manager.is_declared(&candidate) {
                break candidate;
            }
        };
        let var = manager.declare(&name);
        manager.declare(&primed_name(&name));
        added.push(Arc::from(name.as_str()));

        for (index, state) in states.iter_mut().enumerate() {
            *state = if duplicates.contains(&index) {
                state.and(&var)
            } else {
                state.and(&var.not())
            };
        }

        trace!(prop = %name, separated = duplicates.len(), "uniqueness pass");
        duplicates = even_occurrence_indices(states);
    }

    added
}

fn parse_explicit_text(text: &str) -> Result<Model, ModelBuildError> {
    #[derive(PartialEq)]
    enum Section {
        None,
        States,
        Props,
        Progs,
        Tests,
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut section = Section::None;
    let mut num_states: Option<usize> = None;
    let mut props: Vec<(String, Vec<u8>)> = Vec::new();
    let mut programs: Vec<(String, Vec<Vec<u8>>)> = Vec::new();
    let mut tests: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }
        match line {
            "STATES" => section = Section::States,
            "PROPS" => section = Section::Props,
            "PROGS" => section = Section::Progs,
            "TESTS" => section = Section::Tests,
            _ => match section {
                Section::States => {
                    num_states = Some(line.parse().map_err(|_| ModelBuildError::Format {
                        line: i + 1,
                        message: format!("expected the number of states, got {:?}", line),
                    })?);
                    section = Section::None;
                }
                Section::Props => {
                    if line.split_whitespace().count() != 1 {
                        return Err(ModelBuildError::Format {
                            line: i + 1,
                            message: format!("expected a proposition name, got {:?}", line),
                        });
                    }
                    let name = line.to_string();
                    i += 1;
                    let row_line = lines.get(i).ok_or_else(|| ModelBuildError::Format {
                        line: i,
                        message: format!("missing valuation row for proposition '{}'", name),
                    })?;
                    let row = parse_bit_row(row_line, i + 1)?;
                    props.push((name, row));
                }
                Section::Progs => {
                    let n = num_states.ok_or_else(|| ModelBuildError::Format {
                        line: i + 1,
                        message: "PROGS section before STATES".to_string(),
                    })?;
                    if line.split_whitespace().count() != 1 {
                        return Err(ModelBuildError::Format {
                            line: i + 1,
                            message: format!("expected a program name, got {:?}", line),
                        });
                    }
                    let name = line.to_string();
                    let mut matrix = Vec::with_capacity(n);
                    for _ in 0..n {
                        i += 1;
                        let row_line = lines.get(i).ok_or_else(|| ModelBuildError::Format {
                            line: i,
                            message: format!("missing matrix row for program '{}'", name),
                        })?;
                        matrix.push(parse_bit_row(row_line, i + 1)?);
                    }
                    programs.push((name, matrix));
                }
                Section::Tests => tests.push(line.to_string()),
                Section::None => {
                    trace!(line = i + 1, text = %line, "skipping line outside any section");
                }
            },
        }
        i += 1;
    }

    let num_states = num_states.ok_or_else(|| ModelBuildError::Format {
        line: lines.len(),
        message: "missing STATES section".to_string(),
    })?;

    Model::from_explicit_with_tests(num_states, &props, &programs, tests)
}

fn parse_bit_row(line: &str, line_number: usize) -> Result<Vec<u8>, ModelBuildError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<u8>().map_err(|_| ModelBuildError::Format {
                line: line_number,
                message: format!("expected a row of 0/1 values, got {:?}", token),
            })
        })
        .collect()
}
