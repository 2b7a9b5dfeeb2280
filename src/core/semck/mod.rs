mod errors;
mod machine_check;
mod reply_check;
mod trigger_check;

use tracing::debug;

pub use errors::{SemCheckError, SemCheckErrorKind};

use crate::core::context::{CheckedContext, ResolvedContext};
use crate::core::diag::InternalError;
use crate::core::protocol::{CollectOutput, RejectedStmt, StateMachine};
use crate::core::tree::{State, Transition};

pub struct SemCheckOutput {
    pub context: CheckedContext,
    pub errors: Vec<SemCheckError>,
}

/// Builds the protocol's state machine and validates it.
///
/// The returned context always carries the machine; callers decide from
/// `errors` whether it may be handed downstream.
pub fn sem_check(ctx: ResolvedContext) -> Result<SemCheckOutput, InternalError> {
    let protocol = ctx.protocol()?;
    let CollectOutput { machine, rejected } = StateMachine::collect(protocol);

    let mut errors = machine_check::check(protocol, &machine, &rejected);
    errors.extend(trigger_check::check(&ctx, &machine, &rejected)?);
    errors.extend(reply_check::check(protocol, &machine));

    debug!(
        protocol = %protocol.name,
        states = machine.len(),
        errors = errors.len(),
        "checked state machine"
    );

    Ok(SemCheckOutput {
        context: ctx.with_state_machine(machine),
        errors,
    })
}

/// Real transitions of the machine, then those of rejected statements.
fn all_transitions<'a>(
    machine: &'a StateMachine,
    rejected: &'a [RejectedStmt],
) -> impl Iterator<Item = (&'a State, &'a Transition)> {
    machine
        .transitions()
        .chain(rejected.iter().flat_map(|stmt| stmt.transitions()))
}

#[cfg(test)]
#[path = "../../tests/semck/t_semck.rs"]
mod tests;
