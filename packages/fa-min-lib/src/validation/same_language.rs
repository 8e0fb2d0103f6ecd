use itertools::{Itertools, repeat_n};

use crate::automaton::Language;

/// Enumerates every word over `alphabet` with a length below `max_word_length`,
/// shortest words first.
fn words<L: Clone>(alphabet: &[L], max_word_length: usize) -> impl Iterator<Item = Vec<L>> + '_ {
    (0..max_word_length).flat_map(move |i| {
        repeat_n(alphabet, i)
            .multi_cartesian_product()
            .map(|word| word.into_iter().cloned().collect_vec())
    })
}

/// Checks if two automata accept the same language.
/// This is done by checking if the alphabets are the same and then checking if
/// the automata accept the same words up to a certain length.
pub fn same_language<A, B>(a: &A, b: &B, max_word_length: usize) -> bool
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if a.alphabet() != b.alphabet() {
        return false;
    }

    words(a.alphabet(), max_word_length).all(|word| a.accepts_word(&word) == b.accepts_word(&word))
}

/// Finds the shortest word on which the two automata disagree, if there is one
/// below `max_word_length`.
pub fn find_counterexample<A, B>(a: &A, b: &B, max_word_length: usize) -> Option<Vec<A::Letter>>
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    words(a.alphabet(), max_word_length).find(|word| a.accepts_word(word) != b.accepts_word(word))
}

pub fn assert_same_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    if let Some(word) = find_counterexample(a, b, max_word_length) {
        if a.accepts_word(&word) {
            panic!(
                "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                word
            );
        } else {
            panic!(
                "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                word
            );
        }
    }
}
