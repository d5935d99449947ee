//! Graphviz export
//! One labeled edge per transition, wrapped in a named digraph

use crate::fsm::FsmDefinition;

/// Render the transition table as DOT text.
///
/// Edges follow the table order: states in model order, events in
/// per-state registration order.
pub fn to_graph(fsm: &FsmDefinition) -> String {
    let mut out = format!("digraph {} {{\n", fsm.name);
    for transition in fsm.iter_transitions() {
        out += &format!(
            "    {} -> {} [label=\"{}\"];\n",
            transition.source, transition.target, transition.event
        );
    }
    out += "}\n";
    out
}
