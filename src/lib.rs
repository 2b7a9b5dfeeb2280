//! Front end for IPDL, the protocol description language for typed
//! message passing between a parent and a child actor.
//!
//! Producers build a [`TranslationUnit`](core::tree::TranslationUnit) (usually
//! through [`AstBuilder`](core::tree::builder::AstBuilder)), then
//! [`check`](core::api::check) resolves its names and validates its state
//! machine.

pub mod core;

pub use crate::core::api::{
    CheckOptions, CheckOutput, FrontendPolicy, ProgramOutput, check, check_translation_unit,
    check_units,
};
pub use crate::core::context::CheckedContext;
pub use crate::core::diag::{CompileError, InternalError, Loc};
