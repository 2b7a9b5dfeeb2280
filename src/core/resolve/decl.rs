use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::diag::Loc;
use crate::core::tree::{Direction, SendSemantics};

// Decls hold names and kinds only; the declaring node stays in the tree.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct DeclIdGen {
    next_id: u32,
}

impl Default for DeclIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclIdGen {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn new_id(&mut self) -> DeclId {
        let id = DeclId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    BuiltinType,
    /// C++ type brought in by a `using` statement.
    ImportedType,
    Struct,
    Union,
    Field {
        ty: DeclId,
    },
    Protocol {
        send_semantics: SendSemantics,
    },
    /// Protocol declared in another translation unit.
    IncludedProtocol {
        file: String,
    },
    Message {
        send_semantics: SendSemantics,
        direction: Direction,
    },
    Param {
        ty: DeclId,
    },
    State {
        start: bool,
    },
}

impl DeclKind {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclKind::BuiltinType
                | DeclKind::ImportedType
                | DeclKind::Struct
                | DeclKind::Union
                | DeclKind::Protocol { .. }
                | DeclKind::IncludedProtocol { .. }
        )
    }

    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            DeclKind::Protocol { .. } | DeclKind::IncludedProtocol { .. }
        )
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::BuiltinType => write!(f, "BuiltinType"),
            DeclKind::ImportedType => write!(f, "ImportedType"),
            DeclKind::Struct => write!(f, "Struct"),
            DeclKind::Union => write!(f, "Union"),
            DeclKind::Field { ty } => write!(f, "Field[ty={ty}]"),
            DeclKind::Protocol { send_semantics } => write!(f, "Protocol ({send_semantics})"),
            DeclKind::IncludedProtocol { file } => write!(f, "IncludedProtocol ({file})"),
            DeclKind::Message {
                send_semantics,
                direction,
            } => write!(f, "Message ({send_semantics}, {direction})"),
            DeclKind::Param { ty } => write!(f, "Param[ty={ty}]"),
            DeclKind::State { start } => {
                write!(f, "State")?;
                if *start {
                    write!(f, " (start)")?;
                }
                Ok(())
            }
        }
    }
}

/// Where a decl was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclScope {
    Builtin,
    TranslationUnit,
    Protocol,
    Struct(DeclId),
    Message(DeclId),
}

#[derive(Debug, Clone, Eq)]
pub struct Decl {
    pub id: DeclId,
    /// Name as the programmer typed it.
    pub progname: String,
    /// Shortest unambiguous name from inside the protocol.
    pub shortname: String,
    pub fullname: String,
    pub kind: DeclKind,
    pub scope: DeclScope,
    pub loc: Loc,
}

impl Hash for Decl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq for Decl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decl [{}] {}: {}", self.id, self.fullname, self.kind)
    }
}

/// Joins namespace segments and a local name with `::`.
pub fn join_qualified<'a>(quals: impl IntoIterator<Item = &'a str>, name: &str) -> String {
    let mut out = String::new();
    for qual in quals {
        out.push_str(qual);
        out.push_str("::");
    }
    out.push_str(name);
    out
}

/// Strips from `fullname` the longest namespace prefix it shares with
/// `context`. The local name itself is never stripped.
pub fn short_name(fullname: &str, context: &[String]) -> String {
    let segments: Vec<&str> = fullname.split("::").collect();
    let Some((local, quals)) = segments.split_last() else {
        return fullname.to_string();
    };
    let common = quals
        .iter()
        .zip(context.iter())
        .take_while(|(qual, ctx)| **qual == ctx.as_str())
        .count();
    join_qualified(quals[common..].iter().copied(), local)
}
