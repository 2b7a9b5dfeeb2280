//! Protocol description front end: tree model, name resolution and state
//! machine validation.

pub mod api;
pub mod context;
pub mod diag;
pub mod program;
pub mod protocol;
pub mod resolve;
pub mod semck;
pub mod tree;

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
