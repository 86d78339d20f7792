//! End-to-end checks through the public API: build a model, parse formulas, query.

use pdl_checker::{CheckError, Formula, Model};
use std::io::Write;

fn formula(text: &str) -> Formula {
    Formula::parse(text).unwrap()
}

/// Two states, one proposition `p` true only in state 0, one transition 0 -> 1
fn smallest_model() -> Model {
    Model::from_explicit(
        2,
        &[("p".to_string(), vec![1, 0])],
        &[("a".to_string(), vec![vec![0, 1], vec![0, 0]])],
    )
    .unwrap()
}

#[test]
fn diamond_on_the_smallest_model() {
    let model = smallest_model();
    assert_eq!(model.check_vector(&formula("<a>(!p)")).unwrap(), vec![1, 0]);
}

#[test]
fn box_holds_vacuously_without_successors() {
    let model = smallest_model();
    // State 1 is a sink, so [a]p holds there vacuously; state 0's only successor
    // falsifies p
    assert_eq!(model.check_vector(&formula("[a]p")).unwrap(), vec![0, 1]);
}

#[test]
fn kleene_star_computes_reachability() {
    // Chain 0 -> 2 -> 4 -> ... -> n-1 with a fork 0 -> 1 into the odd chain; p holds
    // only in the final state
    let n = 9;
    let mut valuation = vec![0u8; n];
    valuation[n - 1] = 1;

    let mut matrix = vec![vec![0u8; n]; n];
    matrix[0][1] = 1;
    for i in 0..n - 2 {
        matrix[i][i + 2] = 1;
    }

    let model = Model::from_explicit(
        n,
        &[("p".to_string(), valuation)],
        &[("a".to_string(), matrix)],
    )
    .unwrap();

    let result = model.check_vector(&formula("<a*>p")).unwrap();
    let expected: Vec<u8> = (0..n).map(|i| u8::from(i % 2 == 0)).collect();
    assert_eq!(result, expected);
}

#[test]
fn sequence_threads_through_a_test() {
    // Valuations: state 0 is p&!q, state 1 is !p&q, state 2 is !p&!q; program a steps
    // 0 -> 1 -> 2. Only state 0 can run a, pass the q? test, and run a again.
    let model = Model::from_explicit(
        3,
        &[
            ("p".to_string(), vec![1, 0, 0]),
            ("q".to_string(), vec![0, 1, 0]),
        ],
        &[(
            "a".to_string(),
            vec![vec![0, 1, 0], vec![0, 0, 1], vec![0, 0, 0]],
        )],
    )
    .unwrap();

    assert_eq!(
        model.check_vector(&formula("<a;q?;a>(!p & !q)")).unwrap(),
        vec![1, 0, 0]
    );
}

#[test]
fn duplicate_native_valuations_are_separated() {
    // Four states but only two distinct native cubes (state 0 is p, the rest !p)
    let model = Model::from_explicit(4, &[("p".to_string(), vec![1, 0, 0, 0])], &[]).unwrap();

    let states = model.states().unwrap();
    assert_eq!(states.len(), 4);
    for i in 0..states.len() {
        for j in i + 1..states.len() {
            assert_ne!(states[i], states[j]);
        }
    }

    // The law now ranges over the native proposition plus enough synthetic bits to
    // tell four states apart
    assert!(model.law().support().len() >= 2 + 1);
    assert!(model.synthetic_count() >= 2);
}

#[test]
fn biconditional_with_itself_is_the_constant_true() {
    let model = smallest_model();
    assert!(model.check(&formula("p <-> p")).unwrap().is_true());
}

#[test]
fn explicit_file_with_embedded_tests() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "STATES\n\
         2\n\
         \n\
         PROPS\n\
         p\n\
         1 0\n\
         \n\
         PROGS\n\
         a\n\
         0 1\n\
         0 0\n\
         \n\
         TESTS\n\
         <a>(!p)\n"
    )
    .unwrap();
    file.flush().unwrap();

    let model = Model::from_explicit_file(file.path()).unwrap();
    assert_eq!(model.file_tests().len(), 1);

    let test = formula(&model.file_tests()[0].clone());
    assert_eq!(model.check_vector(&test).unwrap(), vec![1, 0]);
}

#[test]
fn symbolic_file_and_per_state_queries() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "PROPS\n\
         v1, v2\n\
         \n\
         LAW\n\
         v1 | v2\n\
         \n\
         PROGRAMS\n\
         a\n\
         v1 & !v1' & v2'\n"
    )
    .unwrap();
    file.flush().unwrap();

    let (model, renames) = Model::from_symbolic_file(file.path()).unwrap();
    assert!(renames.is_empty());

    // From v1-states an a-step reaches a v2-state
    assert!(model.check_in_state(&formula("<a>v2"), "v1 & !v2").unwrap());
    // v2-only states have no a-successor, so the box holds vacuously
    assert!(model.check_in_state(&formula("[a]v1"), "!v1 & v2").unwrap());

    // A valuation outside the law is rejected, and the model stays usable
    let err = model.check_in_state(&formula("v1"), "!v1 & !v2").unwrap_err();
    assert!(matches!(err, CheckError::StateNotInModel));
    assert!(model.check_in_state(&formula("v1"), "v1 & v2").unwrap());
}

#[test]
fn query_errors_do_not_poison_the_model() {
    let model = smallest_model();

    // Unknown program aborts only this query
    assert!(model.check(&formula("<zz>p")).is_err());
    // Unknown proposition likewise
    assert!(model.check(&formula("nosuch")).is_err());

    // The model still answers
    assert_eq!(model.check_vector(&formula("p")).unwrap(), vec![1, 0]);
}

#[test]
fn dump_writes_graphviz() {
    let model = smallest_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smallest_result.dot");

    model.check_dump(&formula("<a>(!p)"), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("digraph bdd {"));
    assert!(text.contains("n0 [shape=box, label=\"0\"]") || text.contains("shape=box"));
}

#[test]
fn release_is_an_explicit_scope_end() {
    let model = smallest_model();
    let result = model.check(&formula("<a>(!p)")).unwrap();
    // Result handles stay valid on their own even after the model is released
    model.release();
    assert!(!result.is_false());
}
