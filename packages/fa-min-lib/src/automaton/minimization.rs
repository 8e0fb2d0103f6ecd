use hashbrown::HashSet;
use serde::Serialize;

use crate::automaton::{
    StateIndex, StateSet, error::StructuralError, fa::FiniteAutomaton, table::TransitionTable,
};

/// The distinguishability relation used in the minimization of a DFA.
///
/// A pair of states is marked once it is proven that some input drives one of
/// them to acceptance and the other one to rejection. Pairs that are never
/// marked are equivalent. Pairs are unordered and stored as `(min, max)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishabilityTable {
    marked: HashSet<(StateIndex, StateIndex)>,
}

impl DistinguishabilityTable {
    /// Fills the table for a DFA.
    ///
    /// First, all pairs where exactly one state is accepting are marked. Then
    /// we repeatedly mark every unmarked pair that has a marked pair of
    /// successors on some symbol, until a full pass marks nothing.
    pub fn build(dfa: &FiniteAutomaton) -> Self {
        let mut table = DistinguishabilityTable::default();
        let n = dfa.state_count();
        let columns = dfa.alphabet().len();

        for p in 0..n {
            for q in (p + 1)..n {
                if dfa.is_accepting(p) != dfa.is_accepting(q) {
                    table.mark(p, q);
                }
            }
        }

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;

            for p in 0..n {
                for q in (p + 1)..n {
                    if table.is_marked(p, q) {
                        continue;
                    }

                    let distinguishable = (0..columns).any(|column| {
                        match (dfa.successor(p, column), dfa.successor(q, column)) {
                            (Some(p_target), Some(q_target)) => {
                                table.is_marked(p_target, q_target)
                            }
                            _ => false,
                        }
                    });

                    if distinguishable {
                        table.mark(p, q);
                        changed = true;
                    }
                }
            }
        }

        tracing::debug!(
            passes,
            marked = table.len(),
            "distinguishability table reached its fixed point"
        );

        table
    }

    fn key(p: StateIndex, q: StateIndex) -> (StateIndex, StateIndex) {
        if p <= q { (p, q) } else { (q, p) }
    }

    /// Marks the pair as distinguishable. Returns true if it was not marked
    /// before. A state is never distinguishable from itself.
    pub fn mark(&mut self, p: StateIndex, q: StateIndex) -> bool {
        if p == q {
            return false;
        }

        self.marked.insert(Self::key(p, q))
    }

    pub fn is_marked(&self, p: StateIndex, q: StateIndex) -> bool {
        p != q && self.marked.contains(&Self::key(p, q))
    }

    /// Number of marked pairs.
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

/// Disjoint, non-empty sets of original states covering all states of a DFA.
/// Each set becomes one state of the minimized DFA; its index is the position
/// in [`PartitionSet::partitions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionSet {
    partitions: Vec<StateSet>,
    #[serde(skip)]
    state_to_partition: Vec<usize>,
}

impl PartitionSet {
    /// Groups every state with all larger states it is not distinguishable
    /// from, sweeping the states in index order. Partitions are therefore
    /// ordered by their smallest member.
    pub fn from_table(state_count: usize, table: &DistinguishabilityTable) -> Self {
        let mut partitions: Vec<StateSet> = vec![];
        let mut state_to_partition = vec![usize::MAX; state_count];

        for state in 0..state_count {
            if state_to_partition[state] != usize::MAX {
                continue;
            }

            let index = partitions.len();
            let mut partition = StateSet::from([state]);
            state_to_partition[state] = index;

            for other in (state + 1)..state_count {
                if state_to_partition[other] == usize::MAX && !table.is_marked(state, other) {
                    partition.insert(other);
                    state_to_partition[other] = index;
                }
            }

            partitions.push(partition);
        }

        PartitionSet {
            partitions,
            state_to_partition,
        }
    }

    pub fn partitions(&self) -> &[StateSet] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// The index of the partition containing `state`.
    pub fn partition_of(&self, state: StateIndex) -> Option<usize> {
        self.state_to_partition.get(state).copied()
    }

    /// The smallest state of a partition.
    pub fn representative(&self, partition: usize) -> Option<StateIndex> {
        self.partitions.get(partition)?.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &StateSet)> {
        self.partitions.iter().enumerate()
    }

    // every state below the state count of the partitioned DFA has a partition
    fn index(&self, state: StateIndex) -> usize {
        self.state_to_partition[state]
    }

    fn is_representative(&self, state: StateIndex) -> bool {
        self.partitions[self.index(state)].first() == Some(&state)
    }
}

pub trait Minimizable: Sized {
    /// Returns the minimal automaton accepting the same language, or None if
    /// minimization is not applicable.
    fn minimize(&self) -> Option<Self>;
}

impl Minimizable for FiniteAutomaton {
    fn minimize(&self) -> Option<Self> {
        self.minimize_with_partitions().map(|(minimized, _)| minimized)
    }
}

impl FiniteAutomaton {
    /// Minimizes a DFA and also returns which original states were merged
    /// into which state of the result.
    ///
    /// Returns None for an NFA. Unreachable states are not removed, they are
    /// partitioned like every other state.
    pub fn minimize_with_partitions(&self) -> Option<(FiniteAutomaton, PartitionSet)> {
        if self.is_nondeterministic() {
            return None;
        }

        let table = DistinguishabilityTable::build(self);
        let partitions = PartitionSet::from_table(self.state_count(), &table);

        // the quotient of a valid DFA has in-range targets and one target per cell
        let minimized = self
            .rebuild(&partitions)
            .expect("quotient of a valid DFA is a valid DFA");

        tracing::debug!(
            states = self.state_count(),
            minimized_states = minimized.state_count(),
            "minimized DFA"
        );

        Some((minimized, partitions))
    }

    /// Builds the quotient automaton: one state per partition, transitions
    /// taken from the representative of each partition.
    fn rebuild(&self, partitions: &PartitionSet) -> Result<FiniteAutomaton, StructuralError> {
        // representatives ascend in the same order as their partitions
        let rows = self
            .transitions()
            .iter_rows()
            .filter(|&(state, _)| partitions.is_representative(state))
            .map(|(_, row)| {
                row.iter()
                    .map(|cell| cell.iter().map(|&t| partitions.index(t)).collect())
                    .collect()
            })
            .collect::<Vec<Vec<StateSet>>>();

        let accepting = self
            .accepting()
            .iter()
            .map(|&state| partitions.index(state))
            .collect();

        FiniteAutomaton::new(
            partitions.len(),
            self.alphabet().to_vec(),
            TransitionTable::new(rows)?,
            partitions.index(self.initial()),
            accepting,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> FiniteAutomaton {
        let table =
            TransitionTable::from_targets(vec![vec![1, 2], vec![1, 3], vec![1, 2], vec![1, 3]])
                .unwrap();
        FiniteAutomaton::new(4, vec!['a', 'b'], table, 0, StateSet::from([3])).unwrap()
    }

    #[test]
    fn table_marks_distinguishable_pairs() {
        let table = DistinguishabilityTable::build(&scenario());

        assert!(table.is_marked(0, 3));
        assert!(table.is_marked(3, 1));
        assert!(table.is_marked(0, 1));
        assert!(table.is_marked(1, 2));
        assert!(!table.is_marked(0, 2));
        assert!(!table.is_marked(2, 2));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn partitions_are_ordered_by_smallest_member() {
        let dfa = scenario();
        let table = DistinguishabilityTable::build(&dfa);
        let partitions = PartitionSet::from_table(dfa.state_count(), &table);

        assert_eq!(
            partitions.partitions(),
            &[
                StateSet::from([0, 2]),
                StateSet::from([1]),
                StateSet::from([3])
            ]
        );
        assert_eq!(partitions.partition_of(2), Some(0));
        assert_eq!(partitions.partition_of(3), Some(2));
        assert_eq!(partitions.partition_of(4), None);
        assert_eq!(partitions.representative(1), Some(1));
    }

    #[test]
    fn quotient_uses_representative_rows() {
        let dfa = scenario();
        let table = DistinguishabilityTable::build(&dfa);
        let partitions = PartitionSet::from_table(dfa.state_count(), &table);

        assert!(partitions.is_representative(0));
        assert!(!partitions.is_representative(2));
        assert_eq!(partitions.index(2), 0);

        let quotient = dfa.rebuild(&partitions).unwrap();
        assert_eq!(
            quotient.transitions(),
            &TransitionTable::from_targets(vec![vec![1, 0], vec![1, 2], vec![1, 2]]).unwrap()
        );
        assert_eq!(quotient.initial(), 0);
        assert_eq!(quotient.accepting(), &StateSet::from([2]));
    }

    #[test]
    fn mark_ignores_identical_states() {
        let mut table = DistinguishabilityTable::default();

        assert!(!table.mark(1, 1));
        assert!(table.mark(2, 1));
        assert!(!table.mark(1, 2));
        assert!(table.is_marked(1, 2));
        assert_eq!(table.len(), 1);
    }
}
