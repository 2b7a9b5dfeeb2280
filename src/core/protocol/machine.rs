use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::core::tree::{Protocol, State, Transition, TransitionStmt};

/// A protocol's states and their outgoing transitions, keyed by source
/// state name in declaration order.
///
/// Every statement in the machine has at least one transition: statements
/// declared empty are padded with [`Transition::NULL`], and a null statement
/// for [`State::DEAD`] is added when some transition leads there.
#[derive(Clone, Debug, Default)]
pub struct StateMachine {
    stmts: IndexMap<String, TransitionStmt>,
}

/// A transition statement left out of the machine.
#[derive(Clone, Debug)]
pub enum RejectedStmt {
    /// The source state already had a statement; the first one is kept.
    DuplicateSource(TransitionStmt),
    /// `[dead]` used as a source with real transitions.
    DeadSource(TransitionStmt),
}

impl RejectedStmt {
    pub fn stmt(&self) -> &TransitionStmt {
        match self {
            RejectedStmt::DuplicateSource(stmt) | RejectedStmt::DeadSource(stmt) => stmt,
        }
    }

    /// Real transitions of the rejected statement, paired with its source.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Transition)> {
        let stmt = self.stmt();
        stmt.transitions
            .iter()
            .filter(|transition| !transition.is_null())
            .map(move |transition| (&stmt.state, transition))
    }
}

pub struct CollectOutput {
    pub machine: StateMachine,
    pub rejected: Vec<RejectedStmt>,
}

impl StateMachine {
    pub fn collect(protocol: &Protocol) -> CollectOutput {
        let mut stmts: IndexMap<String, TransitionStmt> = IndexMap::new();
        let mut rejected = Vec::new();

        for stmt in &protocol.transition_stmts {
            let name = stmt.state.name();
            // `[any]` is a wildcard source and keeps its transitions; only
            // `[dead]` may not be left.
            if name == State::DEAD_NAME && stmt.transitions.iter().any(|t| !t.is_null()) {
                rejected.push(RejectedStmt::DeadSource(stmt.clone()));
                continue;
            }
            if stmts.contains_key(name) {
                rejected.push(RejectedStmt::DuplicateSource(stmt.clone()));
                continue;
            }
            let mut stmt = stmt.clone();
            if stmt.transitions.is_empty() {
                stmt.transitions.push(Transition::NULL);
            }
            stmts.insert(name.to_string(), stmt);
        }

        let leads_to_dead = stmts
            .values()
            .flat_map(|stmt| &stmt.transitions)
            .flat_map(|transition| &transition.to_states)
            .any(|state| state.name() == State::DEAD_NAME);
        if leads_to_dead && !stmts.contains_key(State::DEAD_NAME) {
            stmts.insert(
                State::DEAD_NAME.to_string(),
                TransitionStmt::null_stmt(State::DEAD),
            );
        }

        trace!(
            protocol = %protocol.name,
            states = stmts.len(),
            rejected = rejected.len(),
            "collected state machine"
        );
        CollectOutput {
            machine: StateMachine { stmts },
            rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn stmt(&self, state: &str) -> Option<&TransitionStmt> {
        self.stmts.get(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.stmts.values().map(|stmt| &stmt.state)
    }

    /// Whether `state` may be named as a destination.
    pub fn contains_state(&self, state: &str) -> bool {
        self.stmts.contains_key(state) || State::is_sentinel_name(state)
    }

    pub fn start_states(&self) -> impl Iterator<Item = &State> {
        self.states().filter(|state| state.start)
    }

    /// Every real transition, paired with its source state.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Transition)> {
        self.stmts.values().flat_map(|stmt| {
            stmt.transitions
                .iter()
                .filter(|transition| !transition.is_null())
                .map(move |transition| (&stmt.state, transition))
        })
    }

    /// States one transition away from `state`. Transitions declared on
    /// `[any]` apply from every state.
    pub fn successors(&self, state: &str) -> Vec<&State> {
        let own = self.stmts.get(state).into_iter();
        let any = self
            .stmts
            .get(State::ANY_NAME)
            .filter(|_| state != State::ANY_NAME);
        own.chain(any)
            .flat_map(|stmt| &stmt.transitions)
            .flat_map(|transition| &transition.to_states)
            .collect()
    }

    /// Names of the states reachable from any start state, start states
    /// included. Reaching `[any]` reaches every state.
    pub fn reachable_from_start(&self) -> IndexSet<&str> {
        let mut reached: IndexSet<&str> = IndexSet::new();
        let mut queue: VecDeque<&str> = self.start_states().map(State::name).collect();
        if !queue.is_empty() && self.stmts.contains_key(State::ANY_NAME) {
            queue.push_back(State::ANY_NAME);
        }

        while let Some(name) = queue.pop_front() {
            if !reached.insert(name) {
                continue;
            }
            if name == State::ANY_NAME {
                queue.extend(self.stmts.keys().map(String::as_str));
            }
            queue.extend(self.successors(name).into_iter().map(State::name));
        }
        reached
    }
}
