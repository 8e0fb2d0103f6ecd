use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::automaton::{builder::DfaBuilder, fa::FiniteAutomaton};

pub struct RandomDfaOptions {
    pub seed: u64,
    pub state_count: usize,
    pub alphabet: Vec<char>,
    pub accepting_probability: f64,
}

impl Default for RandomDfaOptions {
    fn default() -> Self {
        RandomDfaOptions {
            seed: 1,
            state_count: 8,
            alphabet: vec!['a', 'b'],
            accepting_probability: 0.3,
        }
    }
}

impl RandomDfaOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_state_count(mut self, state_count: usize) -> Self {
        self.state_count = state_count;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Vec<char>) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_accepting_probability(mut self, accepting_probability: f64) -> Self {
        self.accepting_probability = accepting_probability;
        self
    }
}

/// Generates a complete DFA with uniformly random transitions. State 0 is the
/// initial state. The same options always produce the same DFA.
pub fn random_dfa(options: &RandomDfaOptions) -> anyhow::Result<FiniteAutomaton> {
    let mut r = StdRng::seed_from_u64(options.seed);
    let probability = options.accepting_probability.clamp(0.0, 1.0);
    let mut builder = DfaBuilder::new(options.alphabet.clone());

    for _ in 0..options.state_count {
        builder.add_state(r.gen_bool(probability));
    }

    for state in 0..options.state_count {
        for &symbol in &options.alphabet {
            builder.add_transition(state, r.gen_range(0..options.state_count), symbol);
        }
    }

    Ok(builder.build()?)
}

#[test]
fn test_random_dfa_is_reproducible() {
    let options = RandomDfaOptions::default().with_seed(42).with_state_count(6);

    let a = random_dfa(&options).unwrap();
    let b = random_dfa(&options).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.state_count(), 6);
    assert!(!a.is_nondeterministic());
}

#[test]
fn test_random_dfa_without_states() {
    let options = RandomDfaOptions::default().with_state_count(0);

    assert!(random_dfa(&options).is_err());
}
