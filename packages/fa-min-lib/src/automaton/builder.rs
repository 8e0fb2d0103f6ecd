use hashbrown::HashSet;

use crate::automaton::{
    StateIndex, StateSet, error::StructuralError, fa::FiniteAutomaton, table::TransitionTable,
};

/// Incrementally builds a DFA. Validation is deferred to [`DfaBuilder::build`],
/// which hands everything to [`FiniteAutomaton::new`].
///
/// ```
/// use fa_min_lib::automaton::builder::DfaBuilder;
///
/// let mut builder = DfaBuilder::new(vec!['a']);
/// let q0 = builder.add_state(false);
/// let q1 = builder.add_state(true);
/// builder.set_initial(q0);
/// builder.add_transition(q0, q1, 'a');
/// builder.add_transition(q1, q0, 'a');
///
/// let dfa = builder.build().unwrap();
/// assert!(dfa.accepts("aaa"));
/// ```
#[derive(Debug, Clone)]
pub struct DfaBuilder {
    alphabet: Vec<char>,
    state_count: usize,
    initial: StateIndex,
    accepting: StateSet,
    edges: Vec<(StateIndex, StateIndex, char)>,
}

impl DfaBuilder {
    pub fn new(alphabet: Vec<char>) -> Self {
        DfaBuilder {
            alphabet,
            state_count: 0,
            initial: 0,
            accepting: StateSet::new(),
            edges: vec![],
        }
    }

    pub fn add_state(&mut self, accepting: bool) -> StateIndex {
        let state = self.state_count;
        self.state_count += 1;

        if accepting {
            self.accepting.insert(state);
        }

        state
    }

    pub fn set_initial(&mut self, state: StateIndex) {
        self.initial = state;
    }

    pub fn add_transition(&mut self, from: StateIndex, to: StateIndex, symbol: char) {
        self.edges.push((from, to, symbol));
    }

    /// Adds a non-accepting trap state and routes every missing transition
    /// into it. Returns the trap state, or None if nothing was missing.
    pub fn make_complete(&mut self) -> Option<StateIndex> {
        let defined = self
            .edges
            .iter()
            .map(|&(from, _, symbol)| (from, symbol))
            .collect::<HashSet<_>>();

        let missing = (0..self.state_count)
            .flat_map(|state| self.alphabet.iter().map(move |&symbol| (state, symbol)))
            .filter(|cell| !defined.contains(cell))
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return None;
        }

        let trap = self.add_state(false);
        for (state, symbol) in missing {
            self.add_transition(state, trap, symbol);
        }
        for symbol in self.alphabet.clone() {
            self.add_transition(trap, trap, symbol);
        }

        Some(trap)
    }

    pub fn build(self) -> Result<FiniteAutomaton, StructuralError> {
        let mut rows = vec![vec![StateSet::new(); self.alphabet.len()]; self.state_count];
        fill_rows(&mut rows, &self.alphabet, self.edges.iter().map(|&(f, t, s)| (f, t, Some(s))))?;

        for (state, row) in rows.iter().enumerate() {
            if let Some(column) = row.iter().position(|cell| cell.is_empty()) {
                return Err(StructuralError::MissingTransition {
                    state,
                    symbol: self.alphabet[column],
                });
            }
        }

        FiniteAutomaton::new(
            self.state_count,
            self.alphabet,
            TransitionTable::new(rows)?,
            self.initial,
            self.accepting,
        )
    }
}

/// Incrementally builds an NFA. The resulting table always carries the
/// epsilon column, so the automaton is nondeterministic even if no epsilon
/// transition was added.
#[derive(Debug, Clone)]
pub struct NfaBuilder {
    alphabet: Vec<char>,
    state_count: usize,
    initial: StateIndex,
    accepting: StateSet,
    edges: Vec<(StateIndex, StateIndex, Option<char>)>,
}

impl NfaBuilder {
    pub fn new(alphabet: Vec<char>) -> Self {
        NfaBuilder {
            alphabet,
            state_count: 0,
            initial: 0,
            accepting: StateSet::new(),
            edges: vec![],
        }
    }

    pub fn add_state(&mut self, accepting: bool) -> StateIndex {
        let state = self.state_count;
        self.state_count += 1;

        if accepting {
            self.accepting.insert(state);
        }

        state
    }

    pub fn set_initial(&mut self, state: StateIndex) {
        self.initial = state;
    }

    /// Adds a transition. `None` denotes an epsilon transition.
    pub fn add_transition(&mut self, from: StateIndex, to: StateIndex, symbol: Option<char>) {
        self.edges.push((from, to, symbol));
    }

    pub fn build(self) -> Result<FiniteAutomaton, StructuralError> {
        let mut rows = vec![vec![StateSet::new(); self.alphabet.len() + 1]; self.state_count];
        fill_rows(&mut rows, &self.alphabet, self.edges.into_iter())?;

        FiniteAutomaton::new(
            self.state_count,
            self.alphabet,
            TransitionTable::new(rows)?,
            self.initial,
            self.accepting,
        )
    }
}

/// Inserts edges into pre-sized rows. A `None` symbol goes into the column
/// after the alphabet.
fn fill_rows(
    rows: &mut [Vec<StateSet>],
    alphabet: &[char],
    edges: impl Iterator<Item = (StateIndex, StateIndex, Option<char>)>,
) -> Result<(), StructuralError> {
    for (from, to, symbol) in edges {
        let column = match symbol {
            Some(symbol) => alphabet
                .iter()
                .position(|&s| s == symbol)
                .ok_or(StructuralError::UnknownSymbol(symbol))?,
            None => alphabet.len(),
        };

        rows.get_mut(from)
            .and_then(|row| row.get_mut(column))
            .ok_or(StructuralError::CellOutOfRange {
                state: from,
                column,
            })?
            .insert(to);
    }

    Ok(())
}

#[test]
fn test_missing_transition() {
    let mut builder = DfaBuilder::new(vec!['a', 'b']);
    let q0 = builder.add_state(false);
    builder.add_transition(q0, q0, 'a');

    assert_eq!(
        builder.build(),
        Err(StructuralError::MissingTransition {
            state: 0,
            symbol: 'b'
        })
    );
}

#[test]
fn test_make_complete() {
    let mut builder = DfaBuilder::new(vec!['a', 'b']);
    let q0 = builder.add_state(false);
    let q1 = builder.add_state(true);
    builder.add_transition(q0, q1, 'a');

    let trap = builder.make_complete();
    assert_eq!(trap, Some(2));
    assert_eq!(builder.clone().make_complete(), None);

    let dfa = builder.build().unwrap();
    assert_eq!(dfa.state_count(), 3);
    assert!(dfa.accepts("a"));
    assert!(!dfa.accepts("ab"));
    assert!(!dfa.accepts("b"));
}

#[test]
fn test_conflicting_transitions() {
    let mut builder = DfaBuilder::new(vec!['a']);
    let q0 = builder.add_state(false);
    let q1 = builder.add_state(true);
    builder.add_transition(q0, q0, 'a');
    builder.add_transition(q0, q1, 'a');
    builder.add_transition(q1, q1, 'a');

    assert_eq!(
        builder.build(),
        Err(StructuralError::NotDeterministic {
            state: 0,
            column: 0,
            targets: 2
        })
    );
}

#[test]
fn test_unknown_symbol() {
    let mut builder = NfaBuilder::new(vec!['a']);
    let q0 = builder.add_state(false);
    builder.add_transition(q0, q0, Some('z'));

    assert_eq!(builder.build(), Err(StructuralError::UnknownSymbol('z')));
}

#[test]
fn test_nfa_builder() {
    let mut builder = NfaBuilder::new(vec!['a']);
    let q0 = builder.add_state(false);
    let q1 = builder.add_state(true);
    builder.add_transition(q0, q1, None);
    builder.add_transition(q0, q0, Some('a'));
    builder.add_transition(q0, q1, Some('a'));

    let nfa = builder.build().unwrap();
    assert!(nfa.is_nondeterministic());
    assert_eq!(nfa.transitions().get(0, 0).unwrap(), &StateSet::from([0, 1]));
    assert_eq!(nfa.transitions().get(0, 1).unwrap(), &StateSet::from([1]));
}
