//! In this file, we parse the textual `spec` representation of finite automata.
//!
//! An example DFA spec is as follows:
//! ```text
//! 4
//! Sigma: a b
//! ------
//! 0: 1 2
//! 1: 1 3
//! 2: 1 2
//! 3: 1 3
//! ------
//! 0: Initial State
//! 3: Accepting State
//! ```
//!
//! The first line holds the number of states. Every row of the transition
//! table lists one cell per symbol, in the order of `Sigma`. A cell is either a
//! single state or a set of states like `{1,2}` or `{}`. A row with one cell
//! more than there are symbols carries epsilon transitions in its last cell,
//! which makes the automaton an NFA. The list of accepting states may be
//! empty.
//!
//! Parsing only checks the syntax. Everything else is validated by
//! [`FiniteAutomaton::new`].
use std::path::Path;

use anyhow::Context;
use itertools::Itertools;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, multispace0, not_line_ending, space0},
};
use thiserror::Error;

use crate::automaton::{
    StateIndex, StateSet, error::StructuralError, fa::FiniteAutomaton, table::TransitionTable,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Failed to parse automaton spec: {0}")]
    Syntax(String),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

fn number(input: &str) -> IResult<&str, StateIndex> {
    nom::combinator::map_res(digit1, |s: &str| s.parse::<StateIndex>()).parse(input)
}

fn opt_whitespace(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn separator(input: &str) -> IResult<&str, ()> {
    let (input, _) = opt_whitespace(input)?;
    let (input, _) = take_while1(|c: char| c == '-').parse(input)?;
    let (input, _) = opt_whitespace(input)?;
    Ok((input, ()))
}

fn comma(input: &str) -> IResult<&str, ()> {
    let (input, _) = space0(input)?;
    let (input, _) = tag(",").parse(input)?;
    let (input, _) = space0(input)?;
    Ok((input, ()))
}

// E.g., {1,2} or {}
fn state_set(input: &str) -> IResult<&str, StateSet> {
    let (input, _) = tag("{").parse(input)?;
    let (input, _) = space0(input)?;
    let (input, states) = nom::multi::separated_list0(comma, number).parse(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag("}").parse(input)?;

    Ok((input, states.into_iter().collect()))
}

fn cell(input: &str) -> IResult<&str, StateSet> {
    nom::branch::alt((state_set, nom::combinator::map(number, |n| StateSet::from([n]))))
        .parse(input)
}

#[test]
fn test_cell_1() {
    let (_, c) = cell("3").unwrap();
    assert_eq!(c, StateSet::from([3]));

    let (_, c) = cell("{ 2, 0 ,1}").unwrap();
    assert_eq!(c, StateSet::from([0, 1, 2]));

    let (_, c) = cell("{}").unwrap();
    assert!(c.is_empty());
}

fn state_count(input: &str) -> IResult<&str, usize> {
    let (input, _) = opt_whitespace(input)?;
    number(input)
}

// E.g., Sigma: a b c
fn sigma(input: &str) -> IResult<&str, Vec<char>> {
    let (input, _) = opt_whitespace(input)?;
    let (input, _) = tag("Sigma").parse(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag(":").parse(input)?;
    let (input, line) = not_line_ending(input)?;

    Ok((input, line.chars().filter(|c| !c.is_whitespace()).collect()))
}

#[test]
fn test_sigma_1() {
    let (_, symbols) = sigma("\nSigma: a b\tc\n").unwrap();
    assert_eq!(symbols, vec!['a', 'b', 'c']);

    let (_, symbols) = sigma("Sigma:\n").unwrap();
    assert!(symbols.is_empty());
}

// E.g., 0: 1 {2,3} {}
fn row(input: &str) -> IResult<&str, (StateIndex, Vec<StateSet>)> {
    let (input, _) = opt_whitespace(input)?;
    let (input, state) = number(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag(":").parse(input)?;
    let (input, cells) = nom::multi::many0(nom::sequence::preceded(space0, cell)).parse(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (state, cells)))
}

#[test]
fn test_row_1() {
    let (_, (state, cells)) = row("  2:\t1 {0,3} {}\n").unwrap();
    assert_eq!(state, 2);
    assert_eq!(
        cells,
        vec![StateSet::from([1]), StateSet::from([0, 3]), StateSet::new()]
    );
}

fn rows(input: &str) -> IResult<&str, Vec<(StateIndex, Vec<StateSet>)>> {
    nom::multi::many0(row).parse(input)
}

// E.g., 0: Initial State
fn initial(input: &str) -> IResult<&str, StateIndex> {
    let (input, _) = opt_whitespace(input)?;
    let (input, state) = number(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag(":").parse(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((input, state))
}

// E.g., 1,3: Accepting States
fn accepting(input: &str) -> IResult<&str, StateSet> {
    let (input, _) = opt_whitespace(input)?;
    let (input, states) = nom::multi::separated_list0(comma, number).parse(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag(":").parse(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((input, states.into_iter().collect()))
}

#[test]
fn test_accepting_1() {
    let (_, states) = accepting("\n1, 3,0: Accepting States").unwrap();
    assert_eq!(states, StateSet::from([0, 1, 3]));

    let (_, states) = accepting("\n: Accepting States").unwrap();
    assert!(states.is_empty());
}

/// The syntactic content of a spec, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonSpec {
    pub state_count: usize,
    pub alphabet: Vec<char>,
    pub rows: Vec<(StateIndex, Vec<StateSet>)>,
    pub initial: StateIndex,
    pub accepting: StateSet,
}

impl AutomatonSpec {
    fn p(input: &str) -> IResult<&str, AutomatonSpec> {
        let (input, state_count) = state_count(input)?;
        let (input, alphabet) = sigma(input)?;
        let (input, _) = separator(input)?;
        let (input, rows) = rows(input)?;
        let (input, _) = separator(input)?;
        let (input, initial) = initial(input)?;
        let (input, accepting) = accepting(input)?;
        let (input, _) = opt_whitespace(input)?;

        Ok((
            input,
            AutomatonSpec {
                state_count,
                alphabet,
                rows,
                initial,
                accepting,
            },
        ))
    }

    pub fn parse(input: &str) -> Result<AutomatonSpec, LoadError> {
        match Self::p(input) {
            Ok(("", spec)) => Ok(spec),
            Ok((rest, _)) => Err(LoadError::Syntax(format!(
                "unexpected input {:?}",
                rest.lines().next().unwrap_or_default()
            ))),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(LoadError::Syntax(format!(
                "{:?} at {:?}",
                e.code,
                e.input.lines().next().unwrap_or_default()
            ))),
            Err(nom::Err::Incomplete(_)) => {
                Err(LoadError::Syntax("unexpected end of input".to_string()))
            }
        }
    }
}

#[test]
fn test_spec_1() {
    let spec_str = r#"
    3
    Sigma: a b
    ----------
    0: 1 0
    1: 2 0
    2: 2 2
    ----------
    0: Initial State
    2: Accepting State"#;

    let spec = AutomatonSpec::parse(spec_str).unwrap();
    assert_eq!(spec.state_count, 3);
    assert_eq!(spec.alphabet, vec!['a', 'b']);
    assert_eq!(spec.rows.len(), 3);
    assert_eq!(spec.initial, 0);
    assert_eq!(spec.accepting, StateSet::from([2]));
}

#[test]
fn test_spec_trailing_input() {
    let spec_str = "1\nSigma: a\n--\n0: 0\n--\n0: Initial State\n0: Accepting State\nextra";

    assert!(matches!(
        AutomatonSpec::parse(spec_str),
        Err(LoadError::Syntax(_))
    ));
}

impl TryFrom<AutomatonSpec> for FiniteAutomaton {
    type Error = LoadError;

    fn try_from(spec: AutomatonSpec) -> Result<Self, Self::Error> {
        let mut cells = Vec::with_capacity(spec.rows.len());
        for (position, (state, row)) in spec.rows.into_iter().enumerate() {
            if state != position {
                return Err(LoadError::Syntax(format!(
                    "expected the row of state {position}, found state {state}"
                )));
            }
            cells.push(row);
        }

        Ok(FiniteAutomaton::new(
            spec.state_count,
            spec.alphabet,
            TransitionTable::new(cells)?,
            spec.initial,
            spec.accepting,
        )?)
    }
}

/// Parses and validates an automaton.
pub fn parse(input: &str) -> Result<FiniteAutomaton, LoadError> {
    FiniteAutomaton::try_from(AutomatonSpec::parse(input)?)
}

pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<FiniteAutomaton> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read automaton file {}", path.display()))?;

    parse(&content).with_context(|| format!("invalid automaton in {}", path.display()))
}

pub trait ToSpecFormat {
    fn to_spec_format(&self) -> String;
}

impl ToSpecFormat for FiniteAutomaton {
    fn to_spec_format(&self) -> String {
        let mut spec = String::new();
        let separator = format!("------{}\n", "--".repeat(self.alphabet().len()));

        spec.push_str(&format!("{}\n", self.state_count()));
        spec.push_str(&format!("Sigma: {}\n", self.alphabet().iter().join(" ")));
        spec.push_str(&separator);

        let width = self.state_count().saturating_sub(1).to_string().len();
        for (state, row) in self.transitions().iter_rows() {
            let cells = row
                .iter()
                .map(|cell| {
                    if self.is_nondeterministic() {
                        format!("{{{}}}", cell.iter().join(","))
                    } else {
                        cell.iter().join(",")
                    }
                })
                .join(" ");
            spec.push_str(&format!("{state:>width$}: {cells}\n"));
        }

        spec.push_str(&separator);
        spec.push_str(&format!("{}: Initial State\n", self.initial()));

        let plural = if self.accepting().len() > 1 { "s" } else { "" };
        spec.push_str(&format!(
            "{}: Accepting State{}\n",
            self.accepting().iter().join(","),
            plural
        ));

        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"4
Sigma: a b
----------
0: 1 2
1: 1 3
2: 1 2
3: 1 3
----------
0: Initial State
3: Accepting State
"#;

    #[test]
    fn parses_dfa() {
        let dfa = parse(SCENARIO).unwrap();

        assert_eq!(dfa.state_count(), 4);
        assert_eq!(dfa.alphabet(), &['a', 'b']);
        assert!(!dfa.is_nondeterministic());
        assert_eq!(dfa.transitions().target(1, 1), Some(3));
        assert!(dfa.accepts("ab"));
    }

    #[test]
    fn writes_what_it_reads() {
        let dfa = parse(SCENARIO).unwrap();

        assert_eq!(dfa.to_spec_format(), SCENARIO);
        assert_eq!(parse(&dfa.to_spec_format()).unwrap(), dfa);
    }

    #[test]
    fn parses_nfa_with_epsilon_column() {
        let nfa = parse(
            "2\nSigma: a\n----\n0: {0,1} {1}\n1: {} {}\n----\n0: Initial State\n1,0: Accepting States\n",
        )
        .unwrap();

        assert!(nfa.is_nondeterministic());
        assert_eq!(nfa.accepting(), &StateSet::from([0, 1]));
        assert_eq!(parse(&nfa.to_spec_format()).unwrap(), nfa);
    }

    #[test]
    fn structural_errors_are_reported() {
        let res = parse("2\nSigma: a\n--\n0: 1\n1: 7\n--\n0: Initial State\n: Accepting State\n");

        assert_eq!(
            res,
            Err(LoadError::Structural(StructuralError::TargetOutOfRange {
                state: 1,
                column: 0,
                target: 7
            }))
        );
    }

    #[test]
    fn rows_must_be_in_order() {
        let res = parse("2\nSigma: a\n--\n1: 1\n0: 0\n--\n0: Initial State\n: Accepting State\n");

        assert!(matches!(res, Err(LoadError::Syntax(_))));
    }
}
