use std::{collections::BTreeSet, fmt::Debug, hash::Hash};

pub mod batch;
pub mod builder;
pub mod error;
pub mod fa;
pub mod graph;
pub mod minimization;
pub mod random;
pub mod spec;
pub mod table;

/// States are identified by their position in the transition table.
pub type StateIndex = usize;

/// An ordered set of states. Used for transition targets and accepting
/// states, so that iteration order (and therefore any rendering) is stable.
pub type StateSet = BTreeSet<StateIndex>;

/// Symbol that terminates the input early. It is never part of an alphabet
/// and reading it leaves the current state untouched.
pub const END_OF_INPUT: char = '\0';

pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

pub trait Alphabet {
    type Letter: Letter;

    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts_word<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}
