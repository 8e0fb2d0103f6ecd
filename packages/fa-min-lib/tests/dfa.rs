use fa_min_lib::{
    automaton::{
        END_OF_INPUT, StateSet,
        builder::{DfaBuilder, NfaBuilder},
        error::StructuralError,
        fa::FiniteAutomaton,
        spec::{self, ToSpecFormat},
        table::TransitionTable,
    },
    validation::same_language::{assert_same_language, find_counterexample, same_language},
};

// (ab)+
fn ab_plus() -> FiniteAutomaton {
    let mut dfa = DfaBuilder::new(vec!['a', 'b']);
    let q0 = dfa.add_state(false);
    let q1 = dfa.add_state(false);
    let q2 = dfa.add_state(true);
    dfa.set_initial(q0);

    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q2, 'b');
    dfa.add_transition(q2, q1, 'a');

    assert_eq!(dfa.make_complete(), Some(3));

    dfa.build().unwrap()
}

#[test]
fn test_dfa() {
    let dfa = ab_plus();

    assert_eq!(dfa.state_count(), 4);
    assert!(dfa.accepts("ababab"));
    assert!(!dfa.accepts("ababa"));
    assert!(!dfa.accepts(""));
    assert!(!dfa.accepts("abba"));
}

#[test]
fn test_unknown_symbols_reject() {
    let dfa = ab_plus();

    assert!(!dfa.accepts("abc"));
    assert!(!dfa.accepts("ab "));
    assert_eq!(dfa.run("xab"), None);
}

#[test]
fn test_end_of_input_marker_is_skipped() {
    let dfa = ab_plus();
    let input = format!("ab{}", END_OF_INPUT);

    assert!(dfa.accepts(&input));
    assert_eq!(dfa.run(&input), dfa.run("ab"));
}

#[test]
fn test_nfa_never_accepts() {
    let mut nfa = NfaBuilder::new(vec!['a']);
    let q0 = nfa.add_state(true);
    let q1 = nfa.add_state(true);
    nfa.add_transition(q0, q1, Some('a'));
    nfa.add_transition(q0, q0, Some('a'));
    nfa.add_transition(q1, q0, None);

    let nfa = nfa.build().unwrap();

    assert!(nfa.is_nondeterministic());
    assert!(!nfa.accepts(""));
    assert!(!nfa.accepts("a"));
    assert_eq!(nfa.evaluate_batch(["", "a", "aa"], 3), vec![false; 3]);
}

#[test]
fn test_missing_transition_is_reported() {
    let mut dfa = DfaBuilder::new(vec!['a', 'b']);
    let q0 = dfa.add_state(true);
    dfa.add_transition(q0, q0, 'a');

    assert_eq!(
        dfa.build(),
        Err(StructuralError::MissingTransition {
            state: 0,
            symbol: 'b'
        })
    );
}

#[test]
fn test_invalid_construction() {
    let table = || TransitionTable::from_targets(vec![vec![0], vec![1]]).unwrap();

    assert_eq!(
        FiniteAutomaton::new(2, vec!['a'], table(), 2, StateSet::new()),
        Err(StructuralError::InitialOutOfRange {
            initial: 2,
            state_count: 2
        })
    );
    assert_eq!(
        FiniteAutomaton::new(2, vec!['a'], table(), 0, StateSet::from([5])),
        Err(StructuralError::AcceptingOutOfRange {
            state: 5,
            state_count: 2
        })
    );
    assert_eq!(
        FiniteAutomaton::new(3, vec!['a'], table(), 0, StateSet::new()),
        Err(StructuralError::RowCountMismatch {
            rows: 2,
            state_count: 3
        })
    );
    assert_eq!(
        FiniteAutomaton::new(
            0,
            vec!['a'],
            TransitionTable::from_targets(vec![]).unwrap(),
            0,
            StateSet::new()
        ),
        Err(StructuralError::EmptyAutomaton)
    );
}

#[test]
fn test_spec_and_builder_agree() {
    let parsed = spec::parse(
        r#"
        4
        Sigma: a b
        ----------
        0: 1 3
        1: 3 2
        2: 1 3
        3: 3 3
        ----------
        0: Initial State
        2: Accepting State
        "#,
    )
    .unwrap();

    let built = ab_plus();

    assert_same_language(&parsed, &built, 8);
    assert_eq!(parsed, built);
    assert_eq!(spec::parse(&built.to_spec_format()).unwrap(), built);
}

#[test]
fn test_counterexample() {
    let dfa = ab_plus();

    let mut all = DfaBuilder::new(vec!['a', 'b']);
    let q0 = all.add_state(true);
    all.add_transition(q0, q0, 'a');
    all.add_transition(q0, q0, 'b');
    let all = all.build().unwrap();

    assert!(!same_language(&dfa, &all, 4));
    assert_eq!(find_counterexample(&dfa, &all, 4), Some(vec![]));
    assert_eq!(find_counterexample(&dfa, &dfa, 6), None);
}

#[test]
fn test_json_export() {
    let dfa = ab_plus();
    let (minimized, partitions) = dfa.minimize_with_partitions().unwrap();

    let json = serde_json::to_value(&minimized).unwrap();
    assert_eq!(json["state_count"], 4);
    assert_eq!(json["alphabet"], serde_json::json!(["a", "b"]));
    assert_eq!(json["initial"], 0);
    assert_eq!(json["accepting"], serde_json::json!([2]));
    assert_eq!(json["nondeterministic"], false);
    assert_eq!(json["transitions"]["rows"][1], serde_json::json!([[3], [2]]));

    let json = serde_json::to_value(&partitions).unwrap();
    assert_eq!(
        json["partitions"],
        serde_json::json!([[0], [1], [2], [3]])
    );

    let results = minimized.evaluate_batch_detailed(["ab", "a"], 2);
    assert_eq!(
        serde_json::to_string(&results).unwrap(),
        r#"[{"input":"ab","accepted":true},{"input":"a","accepted":false}]"#
    );
}
