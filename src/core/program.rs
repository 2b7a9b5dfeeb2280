//! Checks that span translation units.
//!
//! Runs after every unit of a program passed its own checks: includes must
//! name a unit of the program, manager relations must be declared on both
//! ends, and actor states of included protocols must exist there.

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::core::context::CheckedContext;
use crate::core::diag::{InternalError, Loc, SpannedError};
use crate::core::resolve::DeclKind;
use crate::core::tree::visit::Visitor;
use crate::core::tree::{Protocol, TypeSpec};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramErrorKind {
    #[error("Included protocol `{0}` has no translation unit `{1}`")]
    MissingInclude(String, String),

    #[error("Translation unit `{0}` declares protocol `{2}`, expected `{1}`")]
    IncludeProtocolMismatch(String, String, String),

    #[error("Protocol `{0}` names `{1}` as manager, but `{1}` does not manage it")]
    ManagerMismatch(String, String),

    #[error("Protocol `{0}` manages `{1}`, but `{1}` does not name it as manager")]
    ManagesMismatch(String, String),

    #[error("Protocol `{0}` has no state `{1}`")]
    UnknownActorState(String, String),
}

pub type ProgramError = SpannedError<ProgramErrorKind>;

impl ProgramErrorKind {
    pub fn at(self, loc: Loc) -> ProgramError {
        ProgramError::new(self, loc)
    }
}

/// Validates a whole program, keyed by translation unit file name.
pub fn check_program(
    units: &IndexMap<String, CheckedContext>,
) -> Result<Vec<ProgramError>, InternalError> {
    let mut by_protocol: HashMap<&str, &CheckedContext> = HashMap::new();
    for ctx in units.values() {
        by_protocol.insert(ctx.protocol()?.name.as_str(), ctx);
    }

    let mut errors = Vec::new();
    for ctx in units.values() {
        check_includes(ctx, units, &mut errors)?;
        check_managers(ctx.protocol()?, &by_protocol, &mut errors)?;
        check_actor_states(ctx, &by_protocol, &mut errors)?;
    }

    debug!(
        units = units.len(),
        errors = errors.len(),
        "checked program"
    );
    Ok(errors)
}

fn check_includes(
    ctx: &CheckedContext,
    units: &IndexMap<String, CheckedContext>,
    errors: &mut Vec<ProgramError>,
) -> Result<(), InternalError> {
    for include in &ctx.unit.protocol_includes {
        let Some(target) = units.get(&include.file) else {
            errors.push(
                ProgramErrorKind::MissingInclude(
                    include.protocol_name.clone(),
                    include.file.clone(),
                )
                .at(include.loc.clone()),
            );
            continue;
        };
        let found = &target.protocol()?.name;
        if *found != include.protocol_name {
            errors.push(
                ProgramErrorKind::IncludeProtocolMismatch(
                    include.file.clone(),
                    include.protocol_name.clone(),
                    found.clone(),
                )
                .at(include.loc.clone()),
            );
        }
    }
    Ok(())
}

fn check_managers(
    protocol: &Protocol,
    by_protocol: &HashMap<&str, &CheckedContext>,
    errors: &mut Vec<ProgramError>,
) -> Result<(), InternalError> {
    // Relations to protocols outside the program are reported as missing
    // includes instead.
    for manager in &protocol.managers {
        let Some(other) = by_protocol.get(manager.name.as_str()) else {
            continue;
        };
        if !other.protocol()?.is_manager_of(&protocol.name) {
            errors.push(
                ProgramErrorKind::ManagerMismatch(protocol.name.clone(), manager.name.clone())
                    .at(manager.loc.clone()),
            );
        }
    }
    for manages in &protocol.manages_stmts {
        let Some(other) = by_protocol.get(manages.name.as_str()) else {
            continue;
        };
        if !other.protocol()?.is_managed_by(&protocol.name) {
            errors.push(
                ProgramErrorKind::ManagesMismatch(protocol.name.clone(), manages.name.clone())
                    .at(manages.loc.clone()),
            );
        }
    }
    Ok(())
}

fn check_actor_states(
    ctx: &CheckedContext,
    by_protocol: &HashMap<&str, &CheckedContext>,
    errors: &mut Vec<ProgramError>,
) -> Result<(), InternalError> {
    let mut collector = ActorTypeCollector::default();
    collector.visit_translation_unit(&ctx.unit);

    for ts in &collector.actor_types {
        let Some(state) = ctx.actor_state(ts.id) else {
            continue;
        };
        if state.is_sentinel() {
            continue;
        }
        // The unit's own protocol states were checked during resolution.
        let decl = ctx.decl(ts.id)?;
        let DeclKind::IncludedProtocol { .. } = decl.kind else {
            continue;
        };
        let Some(target) = by_protocol.get(decl.fullname.as_str()) else {
            continue;
        };
        if !target.machine.contains_state(state.name()) {
            errors.push(
                ProgramErrorKind::UnknownActorState(
                    decl.fullname.clone(),
                    state.name().to_string(),
                )
                .at(ts.loc.clone()),
            );
        }
    }
    Ok(())
}

#[derive(Default)]
struct ActorTypeCollector {
    actor_types: Vec<TypeSpec>,
}

impl Visitor for ActorTypeCollector {
    fn visit_type_spec(&mut self, ts: &TypeSpec) {
        if ts.is_actor() {
            self.actor_types.push(ts.clone());
        }
    }
}

#[cfg(test)]
#[path = "../tests/t_program.rs"]
mod tests;
