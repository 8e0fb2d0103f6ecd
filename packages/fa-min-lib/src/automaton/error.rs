use thiserror::Error;

use crate::automaton::StateIndex;

/// Malformed automaton data. Raised when an automaton is constructed, so that
/// minimization and membership queries never see an inconsistent automaton.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("an automaton needs at least one state")]
    EmptyAutomaton,

    #[error("symbol {0:?} appears more than once in the alphabet")]
    DuplicateSymbol(char),

    #[error("transition table has {rows} rows but the automaton has {state_count} states")]
    RowCountMismatch { rows: usize, state_count: usize },

    #[error(
        "state {state} has {columns} columns, expected {expected} (alphabet size, plus one epsilon column for an NFA)"
    )]
    ColumnCountMismatch {
        state: StateIndex,
        columns: usize,
        expected: usize,
    },

    #[error("transition from state {state} in column {column} targets {target}, which is not a state")]
    TargetOutOfRange {
        state: StateIndex,
        column: usize,
        target: StateIndex,
    },

    #[error("state {state} has {targets} targets in column {column}, a DFA needs exactly one")]
    NotDeterministic {
        state: StateIndex,
        column: usize,
        targets: usize,
    },

    #[error("initial state {initial} is out of range for {state_count} states")]
    InitialOutOfRange {
        initial: StateIndex,
        state_count: usize,
    },

    #[error("accepting state {state} is out of range for {state_count} states")]
    AcceptingOutOfRange {
        state: StateIndex,
        state_count: usize,
    },

    #[error("cell ({state}, {column}) is outside of the transition table")]
    CellOutOfRange { state: StateIndex, column: usize },

    #[error("state {state} has no transition for symbol {symbol:?}")]
    MissingTransition { state: StateIndex, symbol: char },

    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(char),
}
