//! Front-end entry points.
//!
//! Drivers hand in producer-built translation units and get back either
//! checked contexts or the full list of diagnostics.

use indexmap::IndexMap;
use tracing::debug;

use crate::core::context::{CheckedContext, ParsedContext};
use crate::core::diag::{CompileError, InternalError};
use crate::core::program::check_program;
use crate::core::resolve::resolve;
use crate::core::semck::sem_check;
use crate::core::tree::TranslationUnit;

/// Front-end execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontendPolicy {
    /// Stop after resolution if it reported errors.
    #[default]
    Strict,
    /// Validate the state machine even after resolution errors, skipping
    /// nodes that failed to resolve.
    Partial,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub policy: FrontendPolicy,
    /// Type names accepted in addition to the built-in types.
    pub extra_builtin_types: Vec<String>,
}

impl CheckOptions {
    pub fn partial() -> Self {
        Self {
            policy: FrontendPolicy::Partial,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct CheckOutput {
    /// Present only when no error was reported.
    pub context: Option<CheckedContext>,
    pub errors: Vec<CompileError>,
}

impl CheckOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn check_translation_unit(
    unit: TranslationUnit,
    options: &CheckOptions,
) -> Result<CheckOutput, InternalError> {
    let filename = unit.filename.clone();
    let resolved = resolve(ParsedContext::new(unit), options)?;
    let mut errors: Vec<CompileError> = resolved
        .errors
        .into_iter()
        .map(CompileError::from)
        .collect();
    if options.policy == FrontendPolicy::Strict && !errors.is_empty() {
        debug!(unit = %filename, errors = errors.len(), "stopping after resolution");
        return Ok(CheckOutput {
            context: None,
            errors,
        });
    }

    let checked = sem_check(resolved.context)?;
    errors.extend(checked.errors.into_iter().map(CompileError::from));
    let context = errors.is_empty().then_some(checked.context);
    Ok(CheckOutput { context, errors })
}

/// Strict checking of a single unit, with internal faults folded into the
/// error list.
pub fn check(unit: TranslationUnit) -> Result<CheckedContext, Vec<CompileError>> {
    let out = check_translation_unit(unit, &CheckOptions::default())
        .map_err(|err| vec![CompileError::from(err)])?;
    match out.context {
        Some(context) if out.errors.is_empty() => Ok(context),
        _ => Err(out.errors),
    }
}

#[derive(Debug, Default)]
pub struct ProgramOutput {
    /// Checked units keyed by file name, in input order.
    pub units: IndexMap<String, CheckedContext>,
    pub errors: Vec<CompileError>,
}

impl ProgramOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Checks every unit, then the relations between them. The program pass
/// runs only when every unit checked clean.
pub fn check_units(
    units: impl IntoIterator<Item = TranslationUnit>,
    options: &CheckOptions,
) -> Result<ProgramOutput, InternalError> {
    let mut output = ProgramOutput::default();
    for unit in units {
        let filename = unit.filename.clone();
        let out = check_translation_unit(unit, options)?;
        output.errors.extend(out.errors);
        if let Some(context) = out.context {
            output.units.insert(filename, context);
        }
    }

    if output.errors.is_empty() {
        let program_errors = check_program(&output.units)?;
        output
            .errors
            .extend(program_errors.into_iter().map(CompileError::from));
    }
    Ok(output)
}

#[cfg(test)]
#[path = "../../tests/core/t_api.rs"]
mod tests;
