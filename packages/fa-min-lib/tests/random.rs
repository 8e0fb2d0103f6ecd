use fa_min_lib::{
    automaton::{
        minimization::{DistinguishabilityTable, Minimizable},
        random::{RandomDfaOptions, random_dfa},
    },
    validation::same_language::assert_same_language,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_minimization_test(seed: u64, count: usize, alphabet: Vec<char>) {
    let mut r = StdRng::seed_from_u64(seed);

    for _ in 0..count {
        let options = RandomDfaOptions::default()
            .with_seed(r.r#gen())
            .with_state_count(r.gen_range(1..=10))
            .with_alphabet(alphabet.clone())
            .with_accepting_probability(r.gen_range(0.0..=1.0));

        let dfa = random_dfa(&options).unwrap();
        let minimized = dfa.minimize().unwrap();

        assert!(minimized.state_count() <= dfa.state_count());
        assert!(!minimized.is_nondeterministic());
        assert_same_language(&dfa, &minimized, 7);

        // every pair of remaining states is distinguishable
        let n = minimized.state_count();
        assert_eq!(
            DistinguishabilityTable::build(&minimized).len(),
            n * (n - 1) / 2
        );

        assert_eq!(minimized.minimize().unwrap(), minimized);
    }
}

#[test]
fn random_minimization_binary() {
    random_minimization_test(1, 50, vec!['a', 'b']);
}

#[test]
fn random_minimization_unary() {
    random_minimization_test(2, 50, vec!['a']);
}

#[test]
fn random_minimization_ternary() {
    random_minimization_test(3, 20, vec!['x', 'y', 'z']);
}

#[test]
fn random_batch_matches_single_queries() {
    let dfa = random_dfa(&RandomDfaOptions::default().with_seed(7)).unwrap();
    let minimized = dfa.minimize().unwrap();

    let strings = ["", "a", "ab", "ba", "abba", "bbbbab", "aaaaaa", "abc"];
    let expected = strings.iter().map(|s| dfa.accepts(s)).collect::<Vec<_>>();

    assert_eq!(minimized.evaluate_batch(strings, strings.len()), expected);
}
