//! Trigger direction agreement.
//!
//! `send`/`call` may only name messages travelling out of this side and
//! `recv`/`answer` only messages travelling in; `inout` messages admit both.

use tracing::trace;

use crate::core::context::ResolvedContext;
use crate::core::diag::InternalError;
use crate::core::protocol::{RejectedStmt, StateMachine};
use crate::core::resolve::DeclKind;
use crate::core::semck::errors::{SemCheckError, SemCheckErrorKind};

pub(super) fn check(
    ctx: &ResolvedContext,
    machine: &StateMachine,
    rejected: &[RejectedStmt],
) -> Result<Vec<SemCheckError>, InternalError> {
    let mut errors = Vec::new();

    for (_, transition) in super::all_transitions(machine, rejected) {
        let Some((trigger, msg)) = transition.action() else {
            continue;
        };
        // Unknown messages were reported during resolution.
        if ctx.is_poisoned(transition.id) {
            trace!(node = %transition.id, "skipping poisoned transition");
            continue;
        }
        let decl = ctx.decl(transition.id)?;
        let DeclKind::Message { direction, .. } = decl.kind else {
            return Err(InternalError::UnexpectedDeclKind(transition.id, "message"));
        };
        if !direction.admits(trigger.direction()) {
            errors.push(
                SemCheckErrorKind::TriggerDirectionMismatch(trigger, msg.to_string(), direction)
                    .at(transition.loc.clone()),
            );
        }
    }

    Ok(errors)
}
