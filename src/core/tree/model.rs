//! Protocol description tree.
//!
//! Nodes never hold resolution results; passes record those in side tables
//! keyed by [`NodeId`].

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::diag::{InternalError, Loc};
use crate::core::tree::{Direction, MessageRole, NodeId, SendSemantics, Trigger};

// -- Identifiers --

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedId {
    pub loc: Loc,
    pub baseid: String,
    pub quals: Vec<String>,
}

impl QualifiedId {
    pub fn new(loc: Loc, baseid: impl Into<String>, quals: Vec<String>) -> Self {
        Self {
            loc,
            baseid: baseid.into(),
            quals,
        }
    }

    /// Parses a `::`-separated spelling such as `mozilla::ipc::Shmem`.
    pub fn parse(loc: Loc, spelling: &str) -> Self {
        let mut segments: Vec<String> = spelling.split("::").map(str::to_string).collect();
        let baseid = segments.pop().unwrap_or_default();
        Self::new(loc, baseid, segments)
    }

    /// Pushes the current base id into the qualifiers and makes `id` the new
    /// base: `a::b` qualified by `c` is `a::b::c`.
    pub fn qualify(&mut self, id: impl Into<String>) {
        let outer = std::mem::replace(&mut self.baseid, id.into());
        self.quals.push(outer);
    }

    pub fn is_qualified(&self) -> bool {
        !self.quals.is_empty()
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for qual in &self.quals {
            write!(f, "{qual}::")?;
        }
        f.write_str(&self.baseid)
    }
}

// -- Namespaces --

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace {
    pub id: NodeId,
    pub name: String,
    pub loc: Loc,
}

/// Entities that can be nested in named namespaces.
pub trait Namespaced {
    fn name(&self) -> &str;
    fn loc(&self) -> &Loc;
    fn namespaces(&self) -> &[Namespace];
    fn namespaces_mut(&mut self) -> &mut Vec<Namespace>;

    /// Namespaces are added while unwinding nested blocks, so each new one
    /// is the outermost so far.
    fn add_outer_namespace(&mut self, namespace: Namespace) {
        self.namespaces_mut().insert(0, namespace);
    }

    fn qname(&self) -> QualifiedId {
        QualifiedId::new(
            self.loc().clone(),
            self.name(),
            self.namespaces().iter().map(|ns| ns.name.clone()).collect(),
        )
    }
}

macro_rules! impl_namespaced {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Namespaced for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn loc(&self) -> &Loc {
                    &self.loc
                }

                fn namespaces(&self) -> &[Namespace] {
                    &self.namespaces
                }

                fn namespaces_mut(&mut self) -> &mut Vec<Namespace> {
                    &mut self.namespaces
                }
            }
        )*
    };
}

impl_namespaced!(Protocol, StructDecl, UnionDecl);

// -- Translation Unit --

#[derive(Clone, Debug)]
pub struct TranslationUnit {
    pub id: NodeId,
    pub filename: String,
    pub cxx_includes: Vec<CxxInclude>,
    pub protocol_includes: Vec<ProtocolInclude>,
    pub using: Vec<UsingStmt>,
    pub structs_and_unions: Vec<StructOrUnion>,
    pub protocol: Option<Protocol>,
    pub loc: Loc,
}

impl TranslationUnit {
    pub fn new(id: NodeId, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            id,
            loc: Loc::new(filename.clone(), 0),
            filename,
            cxx_includes: Vec::new(),
            protocol_includes: Vec::new(),
            using: Vec::new(),
            structs_and_unions: Vec::new(),
            protocol: None,
        }
    }

    pub fn add_cxx_include(&mut self, include: CxxInclude) {
        self.cxx_includes.push(include);
    }

    pub fn add_protocol_include(&mut self, include: ProtocolInclude) {
        self.protocol_includes.push(include);
    }

    pub fn add_struct_decl(&mut self, struct_decl: StructDecl) {
        self.structs_and_unions
            .push(StructOrUnion::Struct(struct_decl));
    }

    pub fn add_union_decl(&mut self, union_decl: UnionDecl) {
        self.structs_and_unions.push(StructOrUnion::Union(union_decl));
    }

    pub fn add_using_stmt(&mut self, using: UsingStmt) {
        self.using.push(using);
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.protocol = Some(protocol);
    }

    /// Every semantic pass starts here; a unit without a protocol is a
    /// producer bug.
    pub fn protocol(&self) -> Result<&Protocol, InternalError> {
        self.protocol
            .as_ref()
            .ok_or_else(|| InternalError::MissingProtocol(self.filename.clone()))
    }
}

#[derive(Clone, Debug)]
pub struct CxxInclude {
    pub id: NodeId,
    pub file: String,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ProtocolInclude {
    pub id: NodeId,
    pub protocol_name: String,
    pub file: String,
    pub loc: Loc,
}

impl ProtocolInclude {
    pub fn new(id: NodeId, loc: Loc, protocol_name: impl Into<String>) -> Self {
        let protocol_name = protocol_name.into();
        Self {
            id,
            file: format!("{protocol_name}.ipdl"),
            protocol_name,
            loc,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UsingStmt {
    pub id: NodeId,
    pub ty: TypeSpec,
    pub loc: Loc,
}

// -- Structs and Unions --

#[derive(Clone, Debug)]
pub enum StructOrUnion {
    Struct(StructDecl),
    Union(UnionDecl),
}

impl StructOrUnion {
    pub fn id(&self) -> NodeId {
        match self {
            StructOrUnion::Struct(struct_decl) => struct_decl.id,
            StructOrUnion::Union(union_decl) => union_decl.id,
        }
    }

    pub fn as_namespaced(&self) -> &dyn Namespaced {
        match self {
            StructOrUnion::Struct(struct_decl) => struct_decl,
            StructOrUnion::Union(union_decl) => union_decl,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StructDecl {
    pub id: NodeId,
    pub name: String,
    pub namespaces: Vec<Namespace>,
    pub fields: Vec<StructField>,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct StructField {
    pub id: NodeId,
    pub name: String,
    pub ty: TypeSpec,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct UnionDecl {
    pub id: NodeId,
    pub name: String,
    pub namespaces: Vec<Namespace>,
    pub components: Vec<TypeSpec>,
    pub loc: Loc,
}

// -- Protocol --

#[derive(Clone, Debug)]
pub struct Protocol {
    pub id: NodeId,
    pub name: String,
    pub namespaces: Vec<Namespace>,
    pub send_semantics: SendSemantics,
    pub spawns_stmts: Vec<SpawnsStmt>,
    pub bridges_stmts: Vec<BridgesStmt>,
    pub managers: Vec<Manager>,
    pub manages_stmts: Vec<ManagesStmt>,
    pub message_decls: Vec<MessageDecl>,
    pub transition_stmts: Vec<TransitionStmt>,
    pub loc: Loc,
}

impl Protocol {
    pub fn new(id: NodeId, loc: Loc, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            namespaces: Vec::new(),
            send_semantics: SendSemantics::Async,
            spawns_stmts: Vec::new(),
            bridges_stmts: Vec::new(),
            managers: Vec::new(),
            manages_stmts: Vec::new(),
            message_decls: Vec::new(),
            transition_stmts: Vec::new(),
            loc,
        }
    }

    pub fn start_states(&self) -> Vec<&State> {
        self.transition_stmts
            .iter()
            .map(|stmt| &stmt.state)
            .filter(|state| state.start)
            .collect()
    }

    pub fn message(&self, name: &str) -> Option<&MessageDecl> {
        self.message_decls.iter().find(|md| md.name == name)
    }

    pub fn is_manager_of(&self, name: &str) -> bool {
        self.manages_stmts.iter().any(|stmt| stmt.name == name)
    }

    pub fn is_managed_by(&self, name: &str) -> bool {
        self.managers.iter().any(|mgr| mgr.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorSide {
    Parent,
    Child,
}

impl ActorSide {
    pub fn pretty(self) -> &'static str {
        match self {
            ActorSide::Parent => "parent",
            ActorSide::Child => "child",
        }
    }
}

impl fmt::Display for ActorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty())
    }
}

#[derive(Clone, Debug)]
pub struct SpawnsStmt {
    pub id: NodeId,
    pub side: ActorSide,
    pub proto: String,
    pub spawned_as: ActorSide,
    pub loc: Loc,
}

/// A protocol named by one side of a `bridges` statement.
#[derive(Clone, Debug)]
pub struct ProtocolRef {
    pub id: NodeId,
    pub name: String,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct BridgesStmt {
    pub id: NodeId,
    pub parent_side: ProtocolRef,
    pub child_side: ProtocolRef,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct Manager {
    pub id: NodeId,
    pub name: String,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ManagesStmt {
    pub id: NodeId,
    pub name: String,
    pub loc: Loc,
}

// -- Messages --

#[derive(Clone, Debug)]
pub struct MessageDecl {
    pub id: NodeId,
    pub name: String,
    pub send_semantics: SendSemantics,
    pub direction: Direction,
    pub in_params: Vec<Param>,
    pub out_params: Vec<Param>,
    pub loc: Loc,
}

impl MessageDecl {
    pub fn add_in_params(&mut self, params: impl IntoIterator<Item = Param>) {
        self.in_params.extend(params);
    }

    pub fn add_out_params(&mut self, params: impl IntoIterator<Item = Param>) {
        self.out_params.extend(params);
    }

    pub fn has_reply(&self) -> bool {
        self.send_semantics.has_reply()
    }

    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.in_params.iter().chain(self.out_params.iter())
    }

    pub fn role(&self) -> Result<MessageRole, InternalError> {
        MessageRole::derive(self.direction, self.send_semantics)
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    pub id: NodeId,
    pub name: String,
    pub typespec: TypeSpec,
    pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct TypeSpec {
    pub id: NodeId,
    pub spec: QualifiedId,
    /// Actor state annotation; present only on actor types.
    pub state: Option<State>,
    pub array: bool,
    pub nullable: bool,
    pub my_chmod: Option<String>,
    pub other_chmod: Option<String>,
    pub loc: Loc,
}

impl TypeSpec {
    pub fn new(id: NodeId, loc: Loc, spec: QualifiedId) -> Self {
        Self {
            id,
            spec,
            state: None,
            array: false,
            nullable: false,
            my_chmod: None,
            other_chmod: None,
            loc,
        }
    }

    pub fn basename(&self) -> &str {
        &self.spec.baseid
    }

    pub fn is_actor(&self) -> bool {
        self.state.is_some()
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec)
    }
}

// -- State Machine --

/// A protocol state. Equality and hashing look only at the name and the start
/// flag, so a destination reference compares equal to its declaration.
#[derive(Clone, Debug)]
pub struct State {
    pub id: NodeId,
    pub name: Cow<'static, str>,
    pub start: bool,
    pub loc: Loc,
}

impl State {
    pub const ANY_NAME: &'static str = "[any]";
    pub const DEAD_NAME: &'static str = "[dead]";

    /// Wildcard source state.
    pub const ANY: State = State {
        id: NodeId::SYNTHETIC,
        name: Cow::Borrowed(State::ANY_NAME),
        start: true,
        loc: Loc::NONE,
    };

    /// Terminal state; nothing may leave it.
    pub const DEAD: State = State {
        id: NodeId::SYNTHETIC,
        name: Cow::Borrowed(State::DEAD_NAME),
        start: false,
        loc: Loc::NONE,
    };

    pub fn new(id: NodeId, loc: Loc, name: impl Into<String>, start: bool) -> Self {
        Self {
            id,
            name: Cow::Owned(name.into()),
            start,
            loc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_any(&self) -> bool {
        *self == State::ANY
    }

    pub fn is_dead(&self) -> bool {
        *self == State::DEAD
    }

    pub fn is_sentinel(&self) -> bool {
        self.is_any() || self.is_dead()
    }

    pub fn is_sentinel_name(name: &str) -> bool {
        name == State::ANY_NAME || name == State::DEAD_NAME
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.start == other.start
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.start.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<State {} start={}>", self.name, self.start)
    }
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub id: NodeId,
    pub trigger: Option<Trigger>,
    pub msg: Option<String>,
    pub to_states: Vec<State>,
    pub loc: Loc,
}

impl Transition {
    /// Padding entry: the state accepts nothing further along this path.
    pub const NULL: Transition = Transition {
        id: NodeId::SYNTHETIC,
        trigger: None,
        msg: None,
        to_states: Vec::new(),
        loc: Loc::NONE,
    };

    pub fn new(
        id: NodeId,
        loc: Loc,
        trigger: Trigger,
        msg: impl Into<String>,
        to_states: Vec<State>,
    ) -> Self {
        Self {
            id,
            trigger: Some(trigger),
            msg: Some(msg.into()),
            to_states,
            loc,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Transition::NULL
    }

    /// Trigger and message of a real transition; `None` for padding.
    pub fn action(&self) -> Option<(Trigger, &str)> {
        match (self.trigger, self.msg.as_deref()) {
            (Some(trigger), Some(msg)) => Some((trigger, msg)),
            _ => None,
        }
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.trigger == other.trigger && self.msg == other.msg && self.to_states == other.to_states
    }
}

impl Eq for Transition {}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action() {
            Some((trigger, msg)) => write!(f, "{trigger} {msg}"),
            None => f.write_str("<null transition>"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransitionStmt {
    pub id: NodeId,
    pub state: State,
    pub transitions: Vec<Transition>,
    pub loc: Loc,
}

impl TransitionStmt {
    pub fn null_stmt(state: State) -> Self {
        Self {
            id: NodeId::SYNTHETIC,
            state,
            transitions: vec![Transition::NULL],
            loc: Loc::NONE,
        }
    }

    pub fn is_null_stmt(&self) -> bool {
        !self.transitions.is_empty() && self.transitions.iter().all(Transition::is_null)
    }
}
