//! Protocol state machine model.
//!
//! The machine is derived from a protocol's transition statements once and
//! threaded through the checked context, so later consumers never re-scan
//! the statements themselves.

pub mod machine;

pub use machine::{CollectOutput, RejectedStmt, StateMachine};

#[cfg(test)]
#[path = "../../tests/protocol/t_machine.rs"]
mod tests;
