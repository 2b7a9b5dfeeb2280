//! Message-passing vocabulary: send semantics, directions, triggers and the
//! role names derived from them.

use std::fmt;

use crate::core::diag::InternalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SendSemantics {
    #[default]
    Async,
    Sync,
    Rpc,
}

impl SendSemantics {
    pub fn pretty(self) -> &'static str {
        match self {
            SendSemantics::Async => "async",
            SendSemantics::Sync => "sync",
            SendSemantics::Rpc => "rpc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "async" => Some(SendSemantics::Async),
            "sync" => Some(SendSemantics::Sync),
            "rpc" => Some(SendSemantics::Rpc),
            _ => None,
        }
    }

    /// Sync and rpc messages block the sender until a reply arrives.
    pub fn has_reply(self) -> bool {
        !matches!(self, SendSemantics::Async)
    }
}

impl fmt::Display for SendSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn pretty(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }

    /// Whether a message declared with this direction may travel the way
    /// `trigger_dir` says.
    pub fn admits(self, trigger_dir: Direction) -> bool {
        self == Direction::InOut || self == trigger_dir
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Send,
    Recv,
    Call,
    Answer,
}

impl Trigger {
    pub fn pretty(self) -> &'static str {
        match self {
            Trigger::Send => "send",
            Trigger::Recv => "recv",
            Trigger::Call => "call",
            Trigger::Answer => "answer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "send" => Some(Trigger::Send),
            "recv" => Some(Trigger::Recv),
            "call" => Some(Trigger::Call),
            "answer" => Some(Trigger::Answer),
            _ => None,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Trigger::Send | Trigger::Call => Direction::Out,
            Trigger::Recv | Trigger::Answer => Direction::In,
        }
    }

    /// `call` and `answer` are the triggers that carry a blocking reply.
    pub fn is_reply_trigger(self) -> bool {
        matches!(self, Trigger::Call | Trigger::Answer)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty())
    }
}

/// Canonical role of a message as seen from one side, used for generated
/// method names and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    AsyncRecv,
    SyncRecv,
    RpcAnswer,
    AsyncSend,
    SyncSend,
    RpcCall,
}

impl MessageRole {
    /// `InOut` has no role: the caller must pick a side first.
    pub fn derive(direction: Direction, semantics: SendSemantics) -> Result<Self, InternalError> {
        let role = match (direction, semantics) {
            (Direction::In, SendSemantics::Async) => MessageRole::AsyncRecv,
            (Direction::In, SendSemantics::Sync) => MessageRole::SyncRecv,
            (Direction::In, SendSemantics::Rpc) => MessageRole::RpcAnswer,
            (Direction::Out, SendSemantics::Async) => MessageRole::AsyncSend,
            (Direction::Out, SendSemantics::Sync) => MessageRole::SyncSend,
            (Direction::Out, SendSemantics::Rpc) => MessageRole::RpcCall,
            (Direction::InOut, _) => return Err(InternalError::NoRoleForDirection(direction)),
        };
        Ok(role)
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageRole::AsyncRecv => "AsyncRecv",
            MessageRole::SyncRecv => "SyncRecv",
            MessageRole::RpcAnswer => "RpcAnswer",
            MessageRole::AsyncSend => "AsyncSend",
            MessageRole::SyncSend => "SyncSend",
            MessageRole::RpcCall => "RpcCall",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/tree/t_mode.rs"]
mod tests;
