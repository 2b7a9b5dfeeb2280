//! Structural checks on the collected state machine.

use crate::core::protocol::{RejectedStmt, StateMachine};
use crate::core::semck::errors::{SemCheckError, SemCheckErrorKind};
use crate::core::tree::Protocol;

pub(super) fn check(
    protocol: &Protocol,
    machine: &StateMachine,
    rejected: &[RejectedStmt],
) -> Vec<SemCheckError> {
    let mut errors = Vec::new();

    for stmt in rejected {
        match stmt {
            RejectedStmt::DuplicateSource(stmt) => errors.push(
                SemCheckErrorKind::DuplicateSourceState(stmt.state.name().to_string())
                    .at(stmt.loc.clone()),
            ),
            RejectedStmt::DeadSource(stmt) => {
                errors.push(SemCheckErrorKind::DeadStateHasTransitions.at(stmt.loc.clone()))
            }
        }
    }

    for (source, transition) in super::all_transitions(machine, rejected) {
        for dest in &transition.to_states {
            if !machine.contains_state(dest.name()) {
                errors.push(
                    SemCheckErrorKind::DanglingDestination(
                        source.name().to_string(),
                        dest.name().to_string(),
                    )
                    .at(transition.loc.clone()),
                );
            }
        }
    }

    if !machine.is_empty() && machine.start_states().next().is_none() {
        errors.push(SemCheckErrorKind::NoStartState(protocol.name.clone()).at(protocol.loc.clone()));
    }

    errors
}
