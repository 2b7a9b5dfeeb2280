use thiserror::Error;

use crate::core::diag::{Loc, SpannedError};
use crate::core::tree::{Direction, SendSemantics, Trigger};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemCheckErrorKind {
    #[error("State `{0}` has more than one transition statement")]
    DuplicateSourceState(String),

    #[error("Transition from `{0}` leads to undeclared state `{1}`")]
    DanglingDestination(String, String),

    #[error("Transitions cannot leave the `[dead]` state")]
    DeadStateHasTransitions,

    #[error("Message `{0}` is {1} but no `call` or `answer` transition references it")]
    MissingReplyTransition(String, SendSemantics),

    #[error("Message `{0}` is only answered from states unreachable from a start state")]
    UnreachableReplyTransition(String),

    #[error("Trigger `{0}` cannot reference message `{1}` declared with direction `{2}`")]
    TriggerDirectionMismatch(Trigger, String, Direction),

    #[error("Protocol `{0}` declares transitions but no start state")]
    NoStartState(String),
}

pub type SemCheckError = SpannedError<SemCheckErrorKind>;

impl SemCheckErrorKind {
    pub fn at(self, loc: Loc) -> SemCheckError {
        SemCheckError::new(self, loc)
    }
}
