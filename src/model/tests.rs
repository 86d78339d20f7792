//! Tests for model construction, uniqueness, and the query surface

use super::*;
use crate::error::{CheckError, ModelBuildError, ModelReadError};
use crate::pdl::Formula;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

fn formula(text: &str) -> Formula {
    Formula::parse(text).unwrap()
}

fn smallest_model() -> Model {
    Model::from_explicit(
        2,
        &[("p".to_string(), vec![1, 0])],
        &[("a".to_string(), vec![vec![0, 1], vec![0, 0]])],
    )
    .unwrap()
}

#[test]
fn test_state_cubes_imply_the_law() {
    let model = smallest_model();
    for state in model.states().unwrap() {
        assert!(state.implies_everywhere(model.law()));
    }
}

#[test]
fn test_primed_copies_are_declared() {
    let model = smallest_model();
    assert!(model.manager().is_declared("p"));
    assert!(model.manager().is_declared("p'"));
}

#[test]
fn test_duplicate_valuations_are_made_unique() {
    // Native propositions give only two distinct cubes: state 0 is p, states 1-3 are
    // all !p. One pass separates the even-numbered occurrence (state 2), the next pass
    // finishes the remaining pair, so two synthetic propositions are needed.
    let model = Model::from_explicit(4, &[("p".to_string(), vec![1, 0, 0, 0])], &[]).unwrap();

    let states = model.states().unwrap();
    assert_eq!(states.len(), 4);
    for i in 0..states.len() {
        for j in i + 1..states.len() {
            assert_ne!(states[i], states[j], "states {} and {} still collide", i, j);
        }
    }

    assert_eq!(model.synthetic_count(), 2);
    assert!(model.manager().is_declared("x0"));
    assert!(model.manager().is_declared("x0'"));
    assert!(model.manager().is_declared("x1"));

    // The law's support covers the native alphabet plus enough synthetic bits to tell
    // four states apart
    assert!(model.law().support().len() >= 2 + 1);

    // Uniqueness refines cubes only: every cube still decides p the way the native
    // valuation did
    let p = model.manager().var("p").unwrap();
    assert!(states[0].implies_everywhere(&p));
    for state in &states[1..] {
        assert!(state.implies_everywhere(&p.not()));
    }
}

#[test]
fn test_unique_states_get_no_synthetic_props() {
    let model = smallest_model();
    assert_eq!(model.synthetic_count(), 0);
    assert!(!model.manager().is_declared("x0"));
}

#[test]
fn test_synthetic_names_skip_taken_ones() {
    // The native alphabet already uses x0; the uniqueness pass must not collide with it
    let model = Model::from_explicit(
        2,
        &[("x0".to_string(), vec![1, 1])],
        &[],
    )
    .unwrap();
    assert_eq!(model.synthetic_count(), 1);
    assert!(model.manager().is_declared("x1"));

    let states = model.states().unwrap();
    assert_ne!(states[0], states[1]);
}

#[test]
fn test_valuation_length_mismatch() {
    let err = Model::from_explicit(3, &[("p".to_string(), vec![1, 0])], &[]).unwrap_err();
    assert!(matches!(
        err,
        ModelBuildError::ValuationLength {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_matrix_shape_mismatch() {
    let err = Model::from_explicit(
        2,
        &[("p".to_string(), vec![1, 0])],
        &[("a".to_string(), vec![vec![0, 1]])],
    )
    .unwrap_err();
    assert!(matches!(err, ModelBuildError::MatrixShape { rows: 1, .. }));

    let err = Model::from_explicit(
        2,
        &[("p".to_string(), vec![1, 0])],
        &[("a".to_string(), vec![vec![0, 1], vec![0, 0, 1]])],
    )
    .unwrap_err();
    assert!(matches!(err, ModelBuildError::MatrixShape { columns: 3, .. }));
}

#[test]
fn test_duplicate_program_name() {
    let matrix = vec![vec![0, 0], vec![0, 0]];
    let err = Model::from_explicit(
        2,
        &[("p".to_string(), vec![1, 0])],
        &[
            ("a".to_string(), matrix.clone()),
            ("a".to_string(), matrix),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ModelBuildError::DuplicateProgram { .. }));
}

#[test]
fn test_from_symbolic() {
    let (model, renames) = Model::from_symbolic(
        &["v1".to_string(), "v2".to_string()],
        "v1 | v2",
        &[(
            "a".to_string(),
            vec!["v1 & v2'".to_string(), "v2 & v1' & !v2'".to_string()],
        )],
    )
    .unwrap();

    assert!(renames.is_empty());
    assert!(model.states().is_none());
    assert!(model.program("a").is_some());

    // The relation stays within the law on both columns
    let legal = model.law().and(model.law_primed());
    assert!(model.program("a").unwrap().implies_everywhere(&legal));
}

#[test]
fn test_symbolic_numeric_names_are_rewritten() {
    let (model, renames) = Model::from_symbolic(
        &["1".to_string(), "p".to_string()],
        "x1 | p",
        &[("a".to_string(), vec!["1 & 1'".to_string()])],
    )
    .unwrap();

    assert_eq!(
        renames,
        vec![Rename {
            from: "1".to_string(),
            to: "x1".to_string()
        }]
    );
    assert!(model.manager().is_declared("x1"));
    assert!(model.manager().is_declared("x1'"));
    assert!(!model.manager().is_declared("1"));

    // The transition text `1 & 1'` must have been rewritten, not read as constants
    let x1 = model.manager().var("x1").unwrap();
    let x1_primed = model.manager().var("x1'").unwrap();
    assert_eq!(
        model.program("a").unwrap(),
        &x1.and(&x1_primed)
            .and(model.law())
            .and(model.law_primed())
    );
}

#[test]
fn test_symbolic_undeclared_variable() {
    let err = Model::from_symbolic(&["v1".to_string()], "v1 | v9", &[]).unwrap_err();
    assert!(matches!(
        err,
        ModelBuildError::UndeclaredVariable { name } if name == "v9"
    ));
}

#[test]
fn test_symbolic_malformed_law() {
    let err = Model::from_symbolic(&["v1".to_string()], "v1 |", &[]).unwrap_err();
    assert!(matches!(err, ModelBuildError::Expr(_)));
}

#[test]
fn test_symbolic_duplicate_program() {
    let err = Model::from_symbolic(
        &["v1".to_string()],
        "v1",
        &[
            ("a".to_string(), vec!["v1 & v1'".to_string()]),
            ("a".to_string(), vec!["v1".to_string()]),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ModelBuildError::DuplicateProgram { .. }));
}

#[test]
fn test_explicit_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "STATES\n2\n\nPROPS\np\n1 0\n\nPROGS\na\n0 1\n0 0\n\nTESTS\n<a>(!p)\n[a]p\n"
    )
    .unwrap();
    file.flush().unwrap();

    let model = Model::from_explicit_file(file.path()).unwrap();
    assert_eq!(model.num_states(), Some(2));
    assert_eq!(model.file_tests(), &["<a>(!p)".to_string(), "[a]p".to_string()]);
    assert_eq!(model.check_vector(&formula("<a>(!p)")).unwrap(), vec![1, 0]);
}

#[test]
fn test_explicit_file_missing_states() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "PROPS\np\n1 0\n").unwrap();
    file.flush().unwrap();

    let err = Model::from_explicit_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ModelReadError::Build(ModelBuildError::Format { .. })
    ));
}

#[test]
fn test_explicit_file_not_found() {
    let err = Model::from_explicit_file("no/such/file.txt").unwrap_err();
    assert!(matches!(err, ModelReadError::Io(_)));
}

#[test]
fn test_symbolic_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "PROPS\nv1, v2\n\nLAW\nv1 | v2\n\nPROGRAMS\na\nv1 & v2'\nv2 & v1'\n\nb\nv1 & v1'\n"
    )
    .unwrap();
    file.flush().unwrap();

    let (model, renames) = Model::from_symbolic_file(file.path()).unwrap();
    assert!(renames.is_empty());
    assert_eq!(model.prop_names().len(), 2);
    assert!(model.program("a").is_some());
    assert!(model.program("b").is_some());
    assert_eq!(model.program_names_listed(), "a, b");
}

#[test]
fn test_symbolic_file_missing_law() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "PROPS\nv1\nPROGRAMS\na\nv1\n").unwrap();
    file.flush().unwrap();

    let err = Model::from_symbolic_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ModelReadError::Build(ModelBuildError::Format { .. })
    ));
}

#[test]
fn test_check_vector_needs_state_list() {
    let (model, _) = Model::from_symbolic(&["v1".to_string()], "v1 | !v1", &[]).unwrap();
    let err = model.check_vector(&formula("v1")).unwrap_err();
    assert!(matches!(err, CheckError::NoStateList));
}

#[test]
fn test_check_in_state() {
    let model = smallest_model();

    assert!(model.check_in_state(&formula("<a>(!p)"), "p").unwrap());
    assert!(!model.check_in_state(&formula("<a>(!p)"), "!p").unwrap());
    assert!(model.check_in_state(&formula("[a]p"), "!p").unwrap());
}

#[test]
fn test_check_in_state_rejects_illegal_state() {
    // Two states over p and q where q mirrors p, so p & !q describes no legal state
    let model = Model::from_explicit(
        2,
        &[
            ("p".to_string(), vec![1, 0]),
            ("q".to_string(), vec![1, 0]),
        ],
        &[],
    )
    .unwrap();

    let err = model.check_in_state(&formula("p"), "p & !q").unwrap_err();
    assert!(matches!(err, CheckError::StateNotInModel));
}

#[test]
fn test_check_in_state_rejects_undeclared_variable() {
    let model = smallest_model();
    let err = model.check_in_state(&formula("p"), "zz").unwrap_err();
    assert!(matches!(err, CheckError::UndeclaredVariable { name } if name == "zz"));
}

#[test]
fn test_check_in_state_rejects_garbage_valuation() {
    let model = smallest_model();
    let err = model.check_in_state(&formula("p"), "p &").unwrap_err();
    assert!(matches!(err, CheckError::Expr(_)));
}

#[test]
fn test_check_dump_writes_a_dot_file() {
    let model = smallest_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.dot");

    model.check_dump(&formula("<a>(!p)"), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("digraph bdd {"));
}

#[test]
fn test_random_model_is_well_formed() {
    let mut rng = StdRng::seed_from_u64(7);
    let model = Model::random(&mut rng, 6, 2, 2).unwrap();

    assert_eq!(model.num_states(), Some(6));
    assert_eq!(model.prop_names().len(), 2);
    assert!(model.program("a0").is_some());
    assert!(model.program("a1").is_some());

    // Construction invariants hold for arbitrary inputs
    let states = model.states().unwrap();
    for i in 0..states.len() {
        assert!(states[i].implies_everywhere(model.law()));
        for j in i + 1..states.len() {
            assert_ne!(states[i], states[j]);
        }
    }
    let legal = model.law().and(model.law_primed());
    for name in ["a0", "a1"] {
        assert!(model.program(name).unwrap().implies_everywhere(&legal));
    }
}

#[test]
fn test_listings_truncate() {
    let props: Vec<(String, Vec<u8>)> = (0..12)
        .map(|k| (format!("proposition{}", k), vec![1]))
        .collect();
    let model = Model::from_explicit(1, &props, &[]).unwrap();

    let listed = model.prop_names_listed();
    assert!(listed.ends_with("..."));
    assert_eq!(listed.len(), 43);
}

#[test]
fn test_release_consumes_the_model() {
    let model = smallest_model();
    model.release();
}

#[test]
fn test_display_mentions_law_and_programs() {
    let model = smallest_model();
    let text = model.to_string();
    assert!(text.contains("Number of states"));
    assert!(text.contains("Law:"));
    assert!(text.contains("a:"));
}
