//! FSM Data Structures
//! Core model built from the DSL and read by the generators

use serde::{Serialize, Serializer};

mod ordered_set;

pub use ordered_set::OrderedSet;


/// Reserved event name for the unconditional per-state fallback.
pub const DEFAULT_EVENT: &str = "default";

/// A complete FSM model.
///
/// States, events and actions are kept in order of first appearance; that
/// order decides the numbering of every generated enumeration. The
/// transition table is dense over states: `transitions[i]` holds the
/// outgoing transitions of `states[i]` in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct FsmDefinition {
    /// Name of the FSM, used as prefix for generated identifiers
    pub name: String,
    states: OrderedSet<String>,
    events: OrderedSet<String>,
    actions: OrderedSet<String>,
    #[serde(serialize_with = "serialize_table")]
    transitions: Vec<Vec<Transition>>,
}

impl FsmDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: OrderedSet::new(),
            events: OrderedSet::new(),
            actions: OrderedSet::new(),
            transitions: Vec::new(),
        }
    }

    /// Register a transition `state --event--> target / actions`.
    ///
    /// Unknown states, events and actions are appended to their sequences.
    /// An existing transition for the same `(state, event)` is replaced in
    /// place and returned; its position among the state's transitions is kept.
    pub fn add_transition(
        &mut self,
        state: &str,
        event: &str,
        target: &str,
        actions: &[String],
    ) -> Option<Transition> {
        let source_index = self.register_state(state);
        self.register_state(target);
        self.events.insert(event.to_string());
        for action in actions {
            self.actions.insert(action.clone());
        }

        let transition = Transition {
            source: state.to_string(),
            event: event.to_string(),
            target: target.to_string(),
            actions: actions.to_vec(),
        };

        let row = &mut self.transitions[source_index];
        match row.iter_mut().find(|t| t.event == event) {
            Some(existing) => Some(std::mem::replace(existing, transition)),
            None => {
                row.push(transition);
                None
            }
        }
    }

    /// Append a transition without registering its target or event.
    /// Only for exercising the generators' consistency checks.
    #[cfg(test)]
    pub(crate) fn push_unchecked(&mut self, transition: Transition) {
        let index = self.register_state(&transition.source);
        self.transitions[index].push(transition);
    }

    fn register_state(&mut self, state: &str) -> usize {
        let (index, inserted) = self.states.insert(state.to_string());
        if inserted {
            self.transitions.push(Vec::new());
        }
        index
    }

    pub fn states(&self) -> &OrderedSet<String> {
        &self.states
    }

    pub fn events(&self) -> &OrderedSet<String> {
        &self.events
    }

    pub fn actions(&self) -> &OrderedSet<String> {
        &self.actions
    }

    /// Events that get a predicate function (everything except `default`)
    pub fn predicate_events(&self) -> impl Iterator<Item = &String> {
        self.events.iter().filter(|e| e.as_str() != DEFAULT_EVENT)
    }

    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states.index_of(state)
    }

    /// Outgoing transitions of `state`, in registration order
    pub fn transitions_of(&self, state: &str) -> &[Transition] {
        self.state_index(state)
            .and_then(|i| self.transitions.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn transition(&self, state: &str, event: &str) -> Option<&Transition> {
        self.transitions_of(state).iter().find(|t| t.event == event)
    }

    /// Conditional transitions of `state` followed by its `default` one, if any
    pub fn dispatch_order(&self, state: &str) -> (Vec<&Transition>, Option<&Transition>) {
        let mut conditional = Vec::new();
        let mut fallback = None;
        for transition in self.transitions_of(state) {
            if transition.is_default() {
                fallback = Some(transition);
            } else {
                conditional.push(transition);
            }
        }
        (conditional, fallback)
    }

    pub fn has_default(&self, state: &str) -> bool {
        self.transition(state, DEFAULT_EVENT).is_some()
    }

    /// All transitions, states in model order, events in per-state order
    pub fn iter_transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().flatten()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.iter().map(Vec::len).sum()
    }
}

fn serialize_table<S: Serializer>(
    table: &[Vec<Transition>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(table.iter().flatten())
}

/// A transition between states
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Source state name
    pub source: String,
    /// Triggering event; `default` means unconditional fallback
    pub event: String,
    /// Destination state name
    pub target: String,
    /// Actions run in order when the transition fires
    pub actions: Vec<String>,
}

impl Transition {
    pub fn is_default(&self) -> bool {
        self.event == DEFAULT_EVENT
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Format transition label for display
    pub fn label(&self) -> String {
        if self.actions.is_empty() {
            self.event.clone()
        } else {
            format!("{} / {}", self.event, self.actions.join(", "))
        }
    }
}
