use serde::Serialize;

use crate::automaton::{
    Alphabet, END_OF_INPUT, Language, StateIndex, StateSet, error::StructuralError,
    table::TransitionTable,
};

/// A finite automaton over `char` symbols, either deterministic or not.
///
/// Whether the automaton is nondeterministic follows from the shape of its
/// transition table: an NFA carries one extra epsilon column after the
/// columns of its alphabet. A DFA has exactly one target in every cell.
///
/// The automaton is immutable once constructed. All invariants are checked in
/// [`FiniteAutomaton::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiniteAutomaton {
    state_count: usize,
    alphabet: Vec<char>,
    transitions: TransitionTable,
    initial: StateIndex,
    accepting: StateSet,
    nondeterministic: bool,
}

impl FiniteAutomaton {
    pub fn new(
        state_count: usize,
        alphabet: Vec<char>,
        transitions: TransitionTable,
        initial: StateIndex,
        accepting: StateSet,
    ) -> Result<Self, StructuralError> {
        if state_count == 0 {
            return Err(StructuralError::EmptyAutomaton);
        }

        for (i, symbol) in alphabet.iter().enumerate() {
            if alphabet[..i].contains(symbol) {
                return Err(StructuralError::DuplicateSymbol(*symbol));
            }
        }

        if transitions.state_count() != state_count {
            return Err(StructuralError::RowCountMismatch {
                rows: transitions.state_count(),
                state_count,
            });
        }

        let columns = transitions.column_count();
        if columns != alphabet.len() && columns != alphabet.len() + 1 {
            return Err(StructuralError::ColumnCountMismatch {
                state: 0,
                columns,
                expected: alphabet.len(),
            });
        }

        transitions.check_targets(state_count)?;

        let nondeterministic = columns > alphabet.len();
        if !nondeterministic {
            transitions.check_deterministic(alphabet.len())?;
        }

        if initial >= state_count {
            return Err(StructuralError::InitialOutOfRange {
                initial,
                state_count,
            });
        }

        if let Some(&state) = accepting.iter().find(|&&s| s >= state_count) {
            return Err(StructuralError::AcceptingOutOfRange { state, state_count });
        }

        Ok(FiniteAutomaton {
            state_count,
            alphabet,
            transitions,
            initial,
            accepting,
            nondeterministic,
        })
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(&state)
    }

    pub fn is_nondeterministic(&self) -> bool {
        self.nondeterministic
    }

    /// Returns the column of `symbol` in the transition table.
    pub fn symbol_index(&self, symbol: char) -> Option<usize> {
        self.alphabet.iter().position(|&s| s == symbol)
    }

    /// Returns the epsilon column if this is an NFA.
    pub fn epsilon_column(&self) -> Option<usize> {
        self.nondeterministic.then_some(self.alphabet.len())
    }

    pub fn iter_states(&self) -> std::ops::Range<StateIndex> {
        0..self.state_count
    }

    /// The unique successor of `state` on the symbol in `column`. Only
    /// defined for a DFA.
    pub fn successor(&self, state: StateIndex, column: usize) -> Option<StateIndex> {
        if self.nondeterministic {
            return None;
        }

        self.transitions.target(state, column)
    }

    /// Runs the automaton on a sequence of symbols and returns the state it
    /// ends in.
    ///
    /// Returns None for an NFA, or when a symbol outside of the alphabet is
    /// read. [`END_OF_INPUT`] is skipped.
    pub fn run_symbols<'a>(&self, input: impl IntoIterator<Item = &'a char>) -> Option<StateIndex> {
        if self.nondeterministic {
            return None;
        }

        let mut state = self.initial;
        for &symbol in input {
            match self.symbol_index(symbol) {
                Some(column) => state = self.transitions.target(state, column)?,
                None if symbol == END_OF_INPUT => {}
                None => return None,
            }
        }

        Some(state)
    }

    pub fn run(&self, input: &str) -> Option<StateIndex> {
        let symbols = input.chars().collect::<Vec<_>>();
        self.run_symbols(&symbols)
    }

    /// Whether `input` is a sentence of this automaton.
    ///
    /// Always false for an NFA. A symbol that is not part of the alphabet
    /// rejects the string, with the exception of [`END_OF_INPUT`].
    pub fn accepts(&self, input: &str) -> bool {
        self.run(input).is_some_and(|state| self.is_accepting(state))
    }

    pub fn accepts_symbols<'a>(&self, input: impl IntoIterator<Item = &'a char>) -> bool {
        self.run_symbols(input)
            .is_some_and(|state| self.is_accepting(state))
    }
}

impl Alphabet for FiniteAutomaton {
    type Letter = char;

    fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

impl Language for FiniteAutomaton {
    fn accepts_word<'a>(&self, input: impl IntoIterator<Item = &'a char>) -> bool {
        self.accepts_symbols(input)
    }
}
