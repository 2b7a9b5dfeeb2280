use thiserror::Error;

use crate::core::diag::{Loc, SpannedError};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveErrorKind {
    #[error("Unknown type `{0}`")]
    UnknownType(String),

    #[error("Unknown message `{0}` in transition")]
    UnknownMessage(String),

    #[error("Unknown protocol `{0}`")]
    UnknownProtocol(String),

    #[error("Actor type `{0}` has no state `{1}`")]
    UnknownState(String, String),

    #[error("Type `{0}` is not a protocol but carries actor state `{1}`")]
    NotAnActorType(String, String),

    #[error("Multiple declarations of `{0}`")]
    DuplicateDecl(String),

    #[error("Message `{0}` declares parameter `{1}` more than once")]
    DuplicateParam(String, String),
}

pub type ResolveError = SpannedError<ResolveErrorKind>;

impl ResolveErrorKind {
    pub fn at(self, loc: Loc) -> ResolveError {
        ResolveError::new(self, loc)
    }
}
