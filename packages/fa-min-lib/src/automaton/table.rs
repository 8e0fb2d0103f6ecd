use serde::Serialize;

use crate::automaton::{StateIndex, StateSet, error::StructuralError};

/// A state-indexed transition table. Row `q` holds one cell per column, and
/// every cell is the set of states reachable from `q` on that column's
/// symbol. All rows have the same number of columns.
///
/// Out-of-range access through [`TransitionTable::get`] surfaces as a
/// [`StructuralError`] instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionTable {
    rows: Vec<Vec<StateSet>>,
    columns: usize,
}

impl TransitionTable {
    /// Creates a table from its rows. Fails if the rows differ in length.
    pub fn new(rows: Vec<Vec<StateSet>>) -> Result<Self, StructuralError> {
        let columns = rows.first().map(|row| row.len()).unwrap_or(0);

        if let Some((state, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(StructuralError::ColumnCountMismatch {
                state,
                columns: row.len(),
                expected: columns,
            });
        }

        Ok(TransitionTable { rows, columns })
    }

    /// Creates a table where every cell has exactly one target.
    pub fn from_targets(rows: Vec<Vec<StateIndex>>) -> Result<Self, StructuralError> {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|t| StateSet::from([t])).collect())
                .collect(),
        )
    }

    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn get(&self, state: StateIndex, column: usize) -> Result<&StateSet, StructuralError> {
        self.rows
            .get(state)
            .and_then(|row| row.get(column))
            .ok_or(StructuralError::CellOutOfRange { state, column })
    }

    /// Returns the single target of a cell. Returns None if the cell is out of
    /// range or does not have exactly one target.
    pub fn target(&self, state: StateIndex, column: usize) -> Option<StateIndex> {
        let cell = self.get(state, column).ok()?;

        if cell.len() == 1 {
            cell.first().copied()
        } else {
            None
        }
    }

    pub fn row(&self, state: StateIndex) -> Option<&[StateSet]> {
        self.rows.get(state).map(|row| row.as_slice())
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = (StateIndex, &[StateSet])> {
        self.rows.iter().map(|row| row.as_slice()).enumerate()
    }

    /// Iterates over all `(from, column, to)` triples in the table.
    pub fn iter_transitions(&self) -> impl Iterator<Item = (StateIndex, usize, StateIndex)> + '_ {
        self.iter_rows().flat_map(|(from, row)| {
            row.iter()
                .enumerate()
                .flat_map(move |(column, cell)| cell.iter().map(move |&to| (from, column, to)))
        })
    }

    /// Checks that every target is a state of an automaton with
    /// `state_count` states.
    pub fn check_targets(&self, state_count: usize) -> Result<(), StructuralError> {
        match self
            .iter_transitions()
            .find(|(_, _, target)| *target >= state_count)
        {
            Some((state, column, target)) => Err(StructuralError::TargetOutOfRange {
                state,
                column,
                target,
            }),
            None => Ok(()),
        }
    }

    /// Checks that every cell in the first `columns` columns has exactly one
    /// target.
    pub fn check_deterministic(&self, columns: usize) -> Result<(), StructuralError> {
        for (state, row) in self.iter_rows() {
            for (column, cell) in row.iter().take(columns).enumerate() {
                if cell.len() != 1 {
                    return Err(StructuralError::NotDeterministic {
                        state,
                        column,
                        targets: cell.len(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[test]
fn test_ragged_rows_are_rejected() {
    let res = TransitionTable::from_targets(vec![vec![0, 1], vec![1]]);

    assert_eq!(
        res,
        Err(StructuralError::ColumnCountMismatch {
            state: 1,
            columns: 1,
            expected: 2
        })
    );
}

#[test]
fn test_bounds_checked_access() {
    let table = TransitionTable::from_targets(vec![vec![0, 1], vec![1, 0]]).unwrap();

    assert_eq!(table.target(1, 1), Some(0));
    assert_eq!(
        table.get(2, 0),
        Err(StructuralError::CellOutOfRange {
            state: 2,
            column: 0
        })
    );
    assert_eq!(table.target(0, 5), None);
}

#[test]
fn test_check_targets() {
    let table = TransitionTable::from_targets(vec![vec![0, 3], vec![1, 0]]).unwrap();

    assert_eq!(
        table.check_targets(2),
        Err(StructuralError::TargetOutOfRange {
            state: 0,
            column: 1,
            target: 3
        })
    );
    assert!(table.check_targets(4).is_ok());
}
