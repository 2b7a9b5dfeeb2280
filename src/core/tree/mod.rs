pub mod builder;
pub mod format;
pub mod mode;
pub mod model;
pub mod node;
pub mod visit;

pub use mode::*;
pub use model::*;
pub use node::*;

#[cfg(test)]
#[path = "../../tests/tree/t_visit.rs"]
mod visit_tests;
