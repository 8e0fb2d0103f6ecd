use itertools::Itertools;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};

use crate::automaton::{StateSet, fa::FiniteAutomaton};

impl FiniteAutomaton {
    /// Returns the automaton as a graph. Node `i` corresponds to state `i`,
    /// epsilon transitions are labeled with `None`.
    pub fn to_petgraph(&self) -> DiGraph<usize, Option<char>> {
        let mut graph = DiGraph::with_capacity(self.state_count(), 0);

        for state in self.iter_states() {
            graph.add_node(state);
        }

        for (from, column, to) in self.transitions().iter_transitions() {
            graph.add_edge(
                NodeIndex::new(from),
                NodeIndex::new(to),
                self.alphabet().get(column).copied(),
            );
        }

        graph
    }

    /// States reachable from the initial state, following epsilon moves too.
    pub fn reachable_states(&self) -> StateSet {
        let graph = self.to_petgraph();
        let mut dfs = Dfs::new(&graph, NodeIndex::new(self.initial()));
        let mut reachable = StateSet::new();

        while let Some(node) = dfs.next(&graph) {
            reachable.insert(graph[node]);
        }

        reachable
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        if !self.accepting().is_empty() {
            dot.push_str(&format!(
                "node [shape = doublecircle]; {};\n",
                self.accepting().iter().join(" ")
            ));
        }
        dot.push_str("node [shape = circle];\n");
        dot.push_str(&format!("START -> {};\n", self.initial()));

        // parallel edges are merged into one edge with a combined label
        let edges = self
            .transitions()
            .iter_transitions()
            .map(|(from, column, to)| {
                let label = match self.alphabet().get(column) {
                    Some('"') => "\\\"".to_string(),
                    Some('\\') => "\\\\".to_string(),
                    Some(symbol) => symbol.to_string(),
                    None => "ε".to_string(),
                };
                ((from, to), label)
            })
            .into_group_map();

        for ((from, to), labels) in edges.into_iter().sorted() {
            dot.push_str(&format!(
                "{} -> {} [ label = \"{}\" ];\n",
                from,
                to,
                labels.join(",")
            ));
        }

        dot.push_str("}\n");

        dot
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::{builder::DfaBuilder, builder::NfaBuilder};

    use super::*;

    #[test]
    fn reachable_states_skip_unreachable() {
        let mut builder = DfaBuilder::new(vec!['a']);
        let q0 = builder.add_state(false);
        let q1 = builder.add_state(true);
        let q2 = builder.add_state(false);
        builder.add_transition(q0, q1, 'a');
        builder.add_transition(q1, q1, 'a');
        builder.add_transition(q2, q0, 'a');

        let dfa = builder.build().unwrap();
        assert_eq!(dfa.reachable_states(), StateSet::from([0, 1]));
    }

    #[test]
    fn reachable_states_follow_epsilon() {
        let mut builder = NfaBuilder::new(vec!['a']);
        let q0 = builder.add_state(false);
        let q1 = builder.add_state(true);
        builder.add_transition(q0, q1, None);

        let nfa = builder.build().unwrap();
        assert_eq!(nfa.reachable_states(), StateSet::from([0, 1]));
        assert_eq!(nfa.to_petgraph().edge_count(), 1);
    }

    #[test]
    fn graphviz_merges_parallel_edges() {
        let mut builder = DfaBuilder::new(vec!['a', 'b']);
        let q0 = builder.add_state(false);
        let q1 = builder.add_state(true);
        builder.add_transition(q0, q1, 'a');
        builder.add_transition(q0, q1, 'b');
        builder.add_transition(q1, q1, 'a');
        builder.add_transition(q1, q0, 'b');

        let dot = builder.build().unwrap().to_graphviz();
        assert!(dot.contains("START -> 0;"));
        assert!(dot.contains("node [shape = doublecircle]; 1;"));
        assert!(dot.contains("0 -> 1 [ label = \"a,b\" ];"));
        assert!(dot.contains("1 -> 0 [ label = \"b\" ];"));
    }

    #[test]
    fn graphviz_escapes_labels() {
        let mut builder = DfaBuilder::new(vec!['"', '\\']);
        let q0 = builder.add_state(true);
        builder.add_transition(q0, q0, '"');
        builder.add_transition(q0, q0, '\\');

        let dot = builder.build().unwrap().to_graphviz();
        assert!(dot.contains(r#"0 -> 0 [ label = "\",\\" ];"#));
    }
}
