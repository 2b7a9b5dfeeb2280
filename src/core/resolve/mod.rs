pub mod builtins;
pub mod decl;
pub mod decl_table;
pub mod errors;
mod resolver;

pub use builtins::BUILTIN_TYPES;
pub use decl::{Decl, DeclId, DeclIdGen, DeclKind, DeclScope, join_qualified, short_name};
pub use decl_table::{DeclTable, DeclTableBuilder};
pub use errors::{ResolveError, ResolveErrorKind};
pub use resolver::{ResolveOutput, SymbolResolver, resolve};

#[cfg(test)]
#[path = "../../tests/resolve/t_resolve.rs"]
mod tests;
