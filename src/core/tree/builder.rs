//! Node construction for tree producers.
//!
//! The parser (and tests) build trees through `AstBuilder` so every node gets
//! a fresh id and the current source location.

use crate::core::diag::Loc;
use crate::core::tree::*;

pub struct AstBuilder {
    id_gen: NodeIdGen,
    filename: String,
    lineno: u32,
}

impl AstBuilder {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            id_gen: NodeIdGen::new(),
            filename: filename.into(),
            lineno: 1,
        }
    }

    /// Sets the line stamped on subsequently built nodes.
    pub fn at(&mut self, lineno: u32) -> &mut Self {
        self.lineno = lineno;
        self
    }

    pub fn loc(&self) -> Loc {
        Loc::new(self.filename.clone(), self.lineno)
    }

    fn next(&mut self) -> (NodeId, Loc) {
        (self.id_gen.new_id(), self.loc())
    }

    // --- Translation Unit ---

    pub fn translation_unit(&mut self) -> TranslationUnit {
        let id = self.id_gen.new_id();
        TranslationUnit::new(id, self.filename.clone())
    }

    pub fn cxx_include(&mut self, file: &str) -> CxxInclude {
        let (id, loc) = self.next();
        CxxInclude {
            id,
            file: file.to_string(),
            loc,
        }
    }

    pub fn protocol_include(&mut self, protocol_name: &str) -> ProtocolInclude {
        let (id, loc) = self.next();
        ProtocolInclude::new(id, loc, protocol_name)
    }

    pub fn using(&mut self, spelling: &str) -> UsingStmt {
        let ty = self.type_spec(spelling);
        let (id, loc) = self.next();
        UsingStmt { id, ty, loc }
    }

    pub fn namespace(&mut self, name: &str) -> Namespace {
        let (id, loc) = self.next();
        Namespace {
            id,
            name: name.to_string(),
            loc,
        }
    }

    // --- Structs and Unions ---

    pub fn struct_decl(&mut self, name: &str, fields: Vec<StructField>) -> StructDecl {
        let (id, loc) = self.next();
        StructDecl {
            id,
            name: name.to_string(),
            namespaces: Vec::new(),
            fields,
            loc,
        }
    }

    pub fn struct_field(&mut self, ty: TypeSpec, name: &str) -> StructField {
        let (id, loc) = self.next();
        StructField {
            id,
            name: name.to_string(),
            ty,
            loc,
        }
    }

    pub fn union_decl(&mut self, name: &str, components: Vec<TypeSpec>) -> UnionDecl {
        let (id, loc) = self.next();
        UnionDecl {
            id,
            name: name.to_string(),
            namespaces: Vec::new(),
            components,
            loc,
        }
    }

    // --- Protocol ---

    pub fn protocol(&mut self, name: &str) -> Protocol {
        let (id, loc) = self.next();
        Protocol::new(id, loc, name)
    }

    pub fn spawns(&mut self, side: ActorSide, proto: &str, spawned_as: ActorSide) -> SpawnsStmt {
        let (id, loc) = self.next();
        SpawnsStmt {
            id,
            side,
            proto: proto.to_string(),
            spawned_as,
            loc,
        }
    }

    pub fn bridges(&mut self, parent_side: &str, child_side: &str) -> BridgesStmt {
        let parent_side = self.protocol_ref(parent_side);
        let child_side = self.protocol_ref(child_side);
        let (id, loc) = self.next();
        BridgesStmt {
            id,
            parent_side,
            child_side,
            loc,
        }
    }

    pub fn protocol_ref(&mut self, name: &str) -> ProtocolRef {
        let (id, loc) = self.next();
        ProtocolRef {
            id,
            name: name.to_string(),
            loc,
        }
    }

    pub fn manager(&mut self, name: &str) -> Manager {
        let (id, loc) = self.next();
        Manager {
            id,
            name: name.to_string(),
            loc,
        }
    }

    pub fn manages(&mut self, name: &str) -> ManagesStmt {
        let (id, loc) = self.next();
        ManagesStmt {
            id,
            name: name.to_string(),
            loc,
        }
    }

    // --- Messages ---

    pub fn message(
        &mut self,
        name: &str,
        send_semantics: SendSemantics,
        direction: Direction,
    ) -> MessageDecl {
        let (id, loc) = self.next();
        MessageDecl {
            id,
            name: name.to_string(),
            send_semantics,
            direction,
            in_params: Vec::new(),
            out_params: Vec::new(),
            loc,
        }
    }

    pub fn param(&mut self, typespec: TypeSpec, name: &str) -> Param {
        let (id, loc) = self.next();
        Param {
            id,
            name: name.to_string(),
            typespec,
            loc,
        }
    }

    pub fn type_spec(&mut self, spelling: &str) -> TypeSpec {
        let (id, loc) = self.next();
        let spec = QualifiedId::parse(loc.clone(), spelling);
        TypeSpec::new(id, loc, spec)
    }

    /// `Proto:STATE` actor type.
    pub fn actor_type(&mut self, protocol: &str, state: &str) -> TypeSpec {
        let state = self.state_ref(state);
        let mut ts = self.type_spec(protocol);
        ts.state = Some(state);
        ts
    }

    // --- State Machine ---

    pub fn state(&mut self, name: &str, start: bool) -> State {
        let (id, loc) = self.next();
        State::new(id, loc, name, start)
    }

    /// A state as referenced from a destination list or an actor type.
    /// Sentinel spellings yield the shared sentinels.
    pub fn state_ref(&mut self, name: &str) -> State {
        if name == State::ANY_NAME {
            State::ANY
        } else if name == State::DEAD_NAME {
            State::DEAD
        } else {
            self.state(name, false)
        }
    }

    pub fn transition(&mut self, trigger: Trigger, msg: &str, to_states: &[&str]) -> Transition {
        let to_states = to_states
            .iter()
            .map(|name| self.state_ref(name))
            .collect();
        let (id, loc) = self.next();
        Transition::new(id, loc, trigger, msg, to_states)
    }

    pub fn transition_stmt(&mut self, state: State, transitions: Vec<Transition>) -> TransitionStmt {
        let (id, loc) = self.next();
        TransitionStmt {
            id,
            state,
            transitions,
            loc,
        }
    }
}
