use colored::Colorize;
use fa_min_lib::automaton::{
    batch::BatchResult, fa::FiniteAutomaton, minimization::PartitionSet, spec::ToSpecFormat,
};
use serde::Serialize;

/// Everything one run of the driver produced.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: &'a str,
    /// False if the input was an NFA, then `automaton` is the unchanged input.
    pub minimized: bool,
    pub original_states: usize,
    pub automaton: &'a FiniteAutomaton,
    pub partitions: Option<&'a PartitionSet>,
    pub results: &'a [BatchResult],
}

impl Report<'_> {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self, results_per_row: usize) -> String {
        let mut out = String::new();

        if self.minimized {
            out.push_str(&format!("=Minimized DFA from {}=\n", self.source));
        } else {
            out.push_str(&format!(
                "=Minimization not applicable, {} is an NFA=\n",
                self.source
            ));
        }
        out.push_str(&self.automaton.to_spec_format());

        if let Some(partitions) = self.partitions {
            let merged = partitions
                .iter()
                .filter(|(_, states)| states.len() > 1)
                .collect::<Vec<_>>();

            for (index, states) in merged {
                let states = states
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("merged {{{}}} into {}\n", states, index));
            }
        }

        if !self.results.is_empty() {
            out.push_str(&format!(
                "=Results for {} strings=\n",
                self.results.len()
            ));
            out.push_str(&format_verdicts(self.results, results_per_row));
        }

        out
    }
}

/// `Yes`/`No` per string, `per_row` verdicts on each line.
pub fn format_verdicts(results: &[BatchResult], per_row: usize) -> String {
    let mut out = String::new();

    for row in results.chunks(per_row.max(1)) {
        let line = row
            .iter()
            .map(|r| {
                if r.accepted {
                    "Yes".green().to_string()
                } else {
                    "No".red().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(verdicts: &[bool]) -> Vec<BatchResult> {
        verdicts
            .iter()
            .map(|&accepted| BatchResult {
                input: String::new(),
                accepted,
            })
            .collect()
    }

    #[test]
    fn verdicts_wrap_after_row_length() {
        colored::control::set_override(false);

        let out = format_verdicts(&results(&[true, false, true, true, false]), 2);
        assert_eq!(out, "Yes No\nYes Yes\nNo\n");
    }

    #[test]
    fn zero_row_length_is_one_per_line() {
        colored::control::set_override(false);

        assert_eq!(format_verdicts(&results(&[true, false]), 0), "Yes\nNo\n");
    }
}
