use std::io::BufRead;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::automaton::fa::FiniteAutomaton;

/// The verdict for a single string of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub input: String,
    pub accepted: bool,
}

impl FiniteAutomaton {
    /// Classifies up to `limit` strings. Every string is trimmed before it is
    /// tested. Stops early, without error, if `strings` runs out.
    ///
    /// Equivalent to calling [`FiniteAutomaton::accepts`] on each string in
    /// order, so for an NFA every entry is false.
    pub fn evaluate_batch<S: AsRef<str>>(
        &self,
        strings: impl IntoIterator<Item = S>,
        limit: usize,
    ) -> Vec<bool> {
        strings
            .into_iter()
            .take(limit)
            .map(|s| self.accepts(s.as_ref().trim()))
            .collect()
    }

    /// Like [`FiniteAutomaton::evaluate_batch`], but keeps the trimmed input
    /// next to every verdict.
    pub fn evaluate_batch_detailed<S: AsRef<str>>(
        &self,
        strings: impl IntoIterator<Item = S>,
        limit: usize,
    ) -> Vec<BatchResult> {
        strings
            .into_iter()
            .take(limit)
            .map(|s| {
                let input = s.as_ref().trim();
                BatchResult {
                    accepted: self.accepts(input),
                    input: input.to_string(),
                }
            })
            .collect()
    }

    /// Reads up to `limit` lines from `reader` and classifies them.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD, which no alphabet contains, so
    /// such a line is rejected instead of failing the batch. Only I/O errors
    /// are returned.
    pub fn evaluate_lines(
        &self,
        reader: impl BufRead,
        limit: usize,
    ) -> anyhow::Result<Vec<BatchResult>> {
        let lines = reader
            .split(b'\n')
            .take(limit)
            .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to read input strings")?;

        Ok(self.evaluate_batch_detailed(lines, limit))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::automaton::{StateSet, table::TransitionTable};

    use super::*;

    fn ends_with_b() -> FiniteAutomaton {
        let table = TransitionTable::from_targets(vec![vec![0, 1], vec![0, 1]]).unwrap();
        FiniteAutomaton::new(2, vec!['a', 'b'], table, 0, StateSet::from([1])).unwrap()
    }

    #[test]
    fn batch_trims_and_limits() {
        let dfa = ends_with_b();
        let strings = ["  ab ", "ba", "\tb\n", "bbb"];

        assert_eq!(dfa.evaluate_batch(strings, 3), vec![true, false, true]);
        assert_eq!(
            dfa.evaluate_batch(strings, 10),
            vec![true, false, true, true]
        );
        assert!(dfa.evaluate_batch(Vec::<String>::new(), 5).is_empty());
    }

    #[test]
    fn batch_matches_single_queries() {
        let dfa = ends_with_b();
        let strings = vec!["", "a", "b", "abc", "ab\0"];

        let expected = strings.iter().map(|s| dfa.accepts(s)).collect::<Vec<_>>();
        assert_eq!(dfa.evaluate_batch(&strings, strings.len()), expected);
    }

    #[test]
    fn lines_are_read_lazily_up_to_limit() {
        let dfa = ends_with_b();
        let reader = Cursor::new("b\na\n ab \nbb\n");

        let results = dfa.evaluate_lines(reader, 3).unwrap();
        assert_eq!(
            results,
            vec![
                BatchResult {
                    input: "b".into(),
                    accepted: true
                },
                BatchResult {
                    input: "a".into(),
                    accepted: false
                },
                BatchResult {
                    input: "ab".into(),
                    accepted: true
                },
            ]
        );
    }

    #[test]
    fn invalid_utf8_lines_are_rejected() {
        let dfa = ends_with_b();
        let reader = Cursor::new(&b"b\n\xffb\nab\r\n"[..]);

        let results = dfa.evaluate_lines(reader, 3).unwrap();
        assert_eq!(
            results.iter().map(|r| r.accepted).collect::<Vec<_>>(),
            vec![true, false, true]
        );
        assert_eq!(results[1].input, "\u{FFFD}b");
    }
}
