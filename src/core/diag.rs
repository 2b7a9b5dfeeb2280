use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::core::program::ProgramError;
use crate::core::resolve::ResolveError;
use crate::core::semck::SemCheckError;
use crate::core::tree::{Direction, NodeId};

/// Source location of a node: file name and 1-based line number.
///
/// Synthesized nodes use [`Loc::NONE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Loc {
    pub filename: Cow<'static, str>,
    pub lineno: u32,
}

impl Loc {
    pub const NONE: Loc = Loc {
        filename: Cow::Borrowed("<??>"),
        lineno: 0,
    };

    pub fn new(filename: impl Into<String>, lineno: u32) -> Self {
        let filename = filename.into();
        if filename.is_empty() {
            return Loc {
                lineno,
                ..Loc::NONE
            };
        }
        Self {
            filename: Cow::Owned(filename),
            lineno,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Loc::NONE
    }
}

impl Default for Loc {
    fn default() -> Self {
        Loc::NONE
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.lineno)
    }
}

/// A user-facing error kind paired with the location it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedError<K> {
    kind: K,
    loc: Loc,
}

impl<K> SpannedError<K> {
    pub fn new(kind: K, loc: Loc) -> Self {
        Self { kind, loc }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn loc(&self) -> &Loc {
        &self.loc
    }

    pub fn into_kind(self) -> K {
        self.kind
    }
}

impl<K: Display> Display for SpannedError<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.loc, self.kind)
    }
}

impl<K: fmt::Debug + Display> std::error::Error for SpannedError<K> {}

/// Contract violations by a producer or a pass. These abort processing of
/// the current translation unit and are never shown to protocol authors as
/// ordinary diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("INTERNAL ERROR: translation unit `{0}` has no protocol")]
    MissingProtocol(String),

    #[error("INTERNAL ERROR: node {0} has no decl record")]
    MissingDecl(NodeId),

    #[error("INTERNAL ERROR: decl for node {0} is not a {1}")]
    UnexpectedDeclKind(NodeId, &'static str),

    #[error("INTERNAL ERROR: no message role for direction `{0}`")]
    NoRoleForDirection(Direction),
}

#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    SemCheck(#[from] SemCheckError),

    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CompileError {
    pub fn loc(&self) -> Option<&Loc> {
        match self {
            CompileError::Resolve(e) => Some(e.loc()),
            CompileError::SemCheck(e) => Some(e.loc()),
            CompileError::Program(e) => Some(e.loc()),
            CompileError::Internal(_) => None,
        }
    }
}

/// Formats an error with the offending source line, if the location points
/// into `source`.
///
/// ```text
/// (3) Message `Ping` is sync but no `call` or `answer` transition references it
/// │ 2 │ child:
/// │ 3 │     sync Ping();
/// │ 4 │
/// ```
pub fn format_error(source: &str, loc: &Loc, error: impl Display) -> String {
    let mut out = format!("({}) {}\n", loc.lineno, error);
    let lines: Vec<&str> = source.lines().collect();
    let line = loc.lineno as usize;
    if line == 0 || line > lines.len() {
        return out;
    }

    let first_line = line.saturating_sub(1).max(1);
    let last_line = (line + 1).min(lines.len());
    let number_width = last_line.to_string().len();
    for line_no in first_line..=last_line {
        out.push_str(&format!(
            "│ {:>number_width$} │ {}\n",
            line_no,
            lines[line_no - 1],
            number_width = number_width
        ));
    }
    out
}
