use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::core::api::CheckOptions;
use crate::core::context::{ParsedContext, ResolvedContext};
use crate::core::diag::{InternalError, Loc};
use crate::core::resolve::builtins::BUILTIN_TYPES;
use crate::core::resolve::errors::{ResolveError, ResolveErrorKind};
use crate::core::resolve::{
    Decl, DeclId, DeclIdGen, DeclKind, DeclScope, DeclTableBuilder, join_qualified, short_name,
};
use crate::core::tree::visit::{Visitor, walk_message_decl, walk_struct_decl};
use crate::core::tree::*;

pub struct ResolveOutput {
    pub context: ResolvedContext,
    pub errors: Vec<ResolveError>,
}

/// Resolves every name in a translation unit.
///
/// Declarations are collected first so that uses may refer to anything the
/// unit declares regardless of order. Errors are collected, never returned
/// early; only a unit without a protocol aborts.
pub fn resolve(ctx: ParsedContext, options: &CheckOptions) -> Result<ResolveOutput, InternalError> {
    let protocol = ctx.unit.protocol()?;
    let mut resolver = SymbolResolver::new(protocol);
    resolver.declare_builtins(&options.extra_builtin_types);
    resolver.declare_unit(&ctx.unit, protocol);
    resolver.visit_translation_unit(&ctx.unit);

    let SymbolResolver {
        builder,
        errors,
        actor_states,
        poisoned_nodes,
        ..
    } = resolver;
    let decls = builder.finish();
    debug!(
        unit = %ctx.unit.filename,
        decls = decls.len(),
        errors = errors.len(),
        "resolved translation unit"
    );

    Ok(ResolveOutput {
        context: ctx.with_resolution(decls, actor_states, poisoned_nodes),
        errors,
    })
}

pub struct SymbolResolver {
    id_gen: DeclIdGen,
    builder: DeclTableBuilder,
    errors: Vec<ResolveError>,
    actor_states: HashMap<NodeId, State>,
    poisoned_nodes: HashSet<NodeId>,
    /// Namespaces enclosing the protocol, outermost first.
    namespaces: Vec<String>,
    /// `namespaces` plus the protocol name; short names are relative to it.
    context: Vec<String>,
    protocol_decl: Option<DeclId>,
    types: HashMap<String, DeclId>,
    protocols: HashMap<String, DeclId>,
    messages: HashMap<String, DeclId>,
    states: HashMap<String, DeclId>,
    scope: DeclScope,
}

impl SymbolResolver {
    pub fn new(protocol: &Protocol) -> Self {
        let namespaces: Vec<String> = protocol
            .namespaces
            .iter()
            .map(|ns| ns.name.clone())
            .collect();
        let mut context = namespaces.clone();
        context.push(protocol.name.clone());
        Self {
            id_gen: DeclIdGen::new(),
            builder: DeclTableBuilder::new(),
            errors: Vec::new(),
            actor_states: HashMap::new(),
            poisoned_nodes: HashSet::new(),
            namespaces,
            context,
            protocol_decl: None,
            types: HashMap::new(),
            protocols: HashMap::new(),
            messages: HashMap::new(),
            states: HashMap::new(),
            scope: DeclScope::TranslationUnit,
        }
    }

    fn new_decl(
        &mut self,
        progname: &str,
        fullname: String,
        kind: DeclKind,
        scope: DeclScope,
        loc: &Loc,
    ) -> Decl {
        Decl {
            id: self.id_gen.new_id(),
            progname: progname.to_string(),
            shortname: short_name(&fullname, &self.context),
            fullname,
            kind,
            scope,
            loc: loc.clone(),
        }
    }

    fn error(&mut self, kind: ResolveErrorKind, loc: &Loc) {
        self.errors.push(kind.at(loc.clone()));
    }

    fn poison(&mut self, node_id: NodeId) {
        self.poisoned_nodes.insert(node_id);
    }

    // --- Declarations ---

    fn declare_builtins(&mut self, extra: &[String]) {
        for name in BUILTIN_TYPES {
            self.declare_builtin_type(name);
        }
        for name in extra {
            self.declare_builtin_type(name);
        }

        for sentinel in [State::ANY, State::DEAD] {
            let decl = self.new_decl(
                sentinel.name(),
                sentinel.name().to_string(),
                DeclKind::State {
                    start: sentinel.start,
                },
                DeclScope::Builtin,
                &Loc::NONE,
            );
            self.states.insert(sentinel.name().to_string(), decl.id);
            self.builder.record_detached(decl);
        }
    }

    fn declare_builtin_type(&mut self, name: &str) {
        if self.types.contains_key(name) {
            return;
        }
        let decl = self.new_decl(
            name,
            name.to_string(),
            DeclKind::BuiltinType,
            DeclScope::Builtin,
            &Loc::NONE,
        );
        self.types.insert(name.to_string(), decl.id);
        self.builder.record_detached(decl);
    }

    fn declare_unit(&mut self, tu: &TranslationUnit, protocol: &Protocol) {
        for using in &tu.using {
            self.declare_using(using);
        }

        for item in &tu.structs_and_unions {
            let kind = match item {
                StructOrUnion::Struct(_) => DeclKind::Struct,
                StructOrUnion::Union(_) => DeclKind::Union,
            };
            let named = item.as_namespaced();
            let fullname = named.qname().to_string();
            let decl = self.new_decl(
                named.name(),
                fullname.clone(),
                kind,
                DeclScope::TranslationUnit,
                named.loc(),
            );
            if self.types.contains_key(&fullname) {
                self.error(ResolveErrorKind::DuplicateDecl(fullname), named.loc());
            } else {
                self.types.insert(fullname, decl.id);
            }
            self.builder.record_decl(decl, item.id());
        }

        self.declare_protocol(protocol);

        for include in &tu.protocol_includes {
            let decl = self.new_decl(
                &include.protocol_name,
                include.protocol_name.clone(),
                DeclKind::IncludedProtocol {
                    file: include.file.clone(),
                },
                DeclScope::TranslationUnit,
                &include.loc,
            );
            if self.protocols.contains_key(&include.protocol_name) {
                self.error(
                    ResolveErrorKind::DuplicateDecl(include.protocol_name.clone()),
                    &include.loc,
                );
            } else {
                self.types.insert(include.protocol_name.clone(), decl.id);
                self.protocols.insert(include.protocol_name.clone(), decl.id);
            }
            self.builder.record_decl(decl, include.id);
        }

        for md in &protocol.message_decls {
            self.declare_message(protocol, md);
        }

        for stmt in &protocol.transition_stmts {
            self.declare_source_state(&stmt.state);
        }
    }

    fn declare_using(&mut self, using: &UsingStmt) {
        let fullname = using.ty.spec.to_string();
        if let Some(existing) = self.types.get(&fullname).copied() {
            // Repeated `using` of the same type is harmless.
            self.builder.record_use(using.ty.id, existing);
            return;
        }
        let decl = self.new_decl(
            using.ty.basename(),
            fullname.clone(),
            DeclKind::ImportedType,
            DeclScope::TranslationUnit,
            &using.loc,
        );
        self.types.insert(fullname, decl.id);
        // The C++ using-declaration also makes the base name visible.
        self.types
            .entry(using.ty.basename().to_string())
            .or_insert(decl.id);
        self.builder.record_decl(decl, using.ty.id);
    }

    fn declare_protocol(&mut self, protocol: &Protocol) {
        let fullname = protocol.qname().to_string();
        let decl = self.new_decl(
            &protocol.name,
            fullname.clone(),
            DeclKind::Protocol {
                send_semantics: protocol.send_semantics,
            },
            DeclScope::TranslationUnit,
            &protocol.loc,
        );
        self.types.insert(fullname, decl.id);
        self.types.insert(protocol.name.clone(), decl.id);
        self.protocols.insert(protocol.name.clone(), decl.id);
        self.protocol_decl = Some(decl.id);
        self.builder.record_decl(decl, protocol.id);
    }

    fn declare_message(&mut self, protocol: &Protocol, md: &MessageDecl) {
        let fullname = join_qualified(
            protocol.namespaces.iter().map(|ns| ns.name.as_str()),
            &format!("{}::{}", protocol.name, md.name),
        );
        let decl = self.new_decl(
            &md.name,
            fullname.clone(),
            DeclKind::Message {
                send_semantics: md.send_semantics,
                direction: md.direction,
            },
            DeclScope::Protocol,
            &md.loc,
        );
        if self.messages.contains_key(&md.name) {
            self.error(ResolveErrorKind::DuplicateDecl(fullname), &md.loc);
        } else {
            self.messages.insert(md.name.clone(), decl.id);
        }
        self.builder.record_decl(decl, md.id);
    }

    /// Repeated source states are a state machine error, reported by semck;
    /// here the first occurrence simply wins.
    fn declare_source_state(&mut self, state: &State) {
        if let Some(existing) = self.states.get(state.name()).copied() {
            self.builder.record_use(state.id, existing);
            return;
        }
        let fullname = join_qualified(self.context.iter().map(String::as_str), state.name());
        let decl = self.new_decl(
            state.name(),
            fullname,
            DeclKind::State { start: state.start },
            DeclScope::Protocol,
            &state.loc,
        );
        self.states.insert(state.name().to_string(), decl.id);
        self.builder.record_decl(decl, state.id);
    }

    // --- Uses ---

    /// Looks a spelled type up as written, then relative to each namespace
    /// enclosing the protocol, innermost first.
    fn lookup_type(&self, spec: &QualifiedId) -> Option<DeclId> {
        let spelled = spec.to_string();
        (0..=self.namespaces.len()).rev().find_map(|depth| {
            let candidate = join_qualified(
                self.namespaces[..depth].iter().map(String::as_str),
                &spelled,
            );
            self.types.get(&candidate).copied()
        })
    }

    fn resolve_type_spec(&mut self, ts: &TypeSpec) -> Option<DeclId> {
        let Some(decl_id) = self.lookup_type(&ts.spec) else {
            self.error(ResolveErrorKind::UnknownType(ts.spec.to_string()), &ts.loc);
            self.poison(ts.id);
            return None;
        };
        self.builder.record_use(ts.id, decl_id);
        trace!(node = %ts.id, decl = %decl_id, "resolved type `{}`", ts.spec);

        let is_protocol = self
            .builder
            .lookup_decl(decl_id)
            .is_some_and(|decl| decl.kind.is_protocol());
        match (&ts.state, is_protocol) {
            (Some(state), false) => {
                self.error(
                    ResolveErrorKind::NotAnActorType(ts.spec.to_string(), state.name().to_string()),
                    &ts.loc,
                );
                self.poison(ts.id);
            }
            (Some(state), true) => self.resolve_actor_state(ts, decl_id, state),
            (None, true) => {
                self.actor_states.insert(ts.id, State::ANY);
            }
            (None, false) => {}
        }
        Some(decl_id)
    }

    /// States of the unit's own protocol are checked here; states of
    /// included protocols are checked once every unit is known.
    fn resolve_actor_state(&mut self, ts: &TypeSpec, protocol_decl: DeclId, state: &State) {
        if self.protocol_decl == Some(protocol_decl) {
            match self.states.get(state.name()).copied() {
                Some(state_decl) => {
                    if !state.id.is_synthetic() {
                        self.builder.record_use(state.id, state_decl);
                    }
                }
                None => {
                    self.error(
                        ResolveErrorKind::UnknownState(
                            ts.spec.to_string(),
                            state.name().to_string(),
                        ),
                        &ts.loc,
                    );
                    self.poison(ts.id);
                    return;
                }
            }
        }
        self.actor_states.insert(ts.id, state.clone());
    }

    fn resolve_protocol_name(&mut self, name: &str, node_id: NodeId, loc: &Loc) {
        match self.protocols.get(name).copied() {
            Some(decl_id) => self.builder.record_use(node_id, decl_id),
            None => {
                self.error(ResolveErrorKind::UnknownProtocol(name.to_string()), loc);
                self.poison(node_id);
            }
        }
    }

    fn declare_typed(
        &mut self,
        node_id: NodeId,
        name: &str,
        fullname: String,
        ty: Option<DeclId>,
        kind: impl FnOnce(DeclId) -> DeclKind,
        loc: &Loc,
    ) {
        // A member whose type failed to resolve gets no decl.
        let Some(ty) = ty else {
            self.poison(node_id);
            return;
        };
        let decl = self.new_decl(name, fullname, kind(ty), self.scope, loc);
        self.builder.record_decl(decl, node_id);
    }

    fn scope_fullname(&self, name: &str) -> String {
        let owner = match self.scope {
            DeclScope::Struct(owner) | DeclScope::Message(owner) => {
                self.builder.lookup_decl(owner)
            }
            DeclScope::Builtin | DeclScope::TranslationUnit | DeclScope::Protocol => None,
        };
        match owner {
            Some(owner) => format!("{}::{}", owner.fullname, name),
            None => name.to_string(),
        }
    }
}

impl Visitor for SymbolResolver {
    fn visit_using_stmt(&mut self, _using: &UsingStmt) {
        // Declared up front.
    }

    fn visit_struct_decl(&mut self, struct_decl: &StructDecl) {
        let prev = self.scope;
        if let Some(owner) = self.builder.lookup_node_decl_id(struct_decl.id) {
            self.scope = DeclScope::Struct(owner);
        }
        walk_struct_decl(self, struct_decl);
        self.scope = prev;
    }

    fn visit_struct_field(&mut self, field: &StructField) {
        let ty = self.resolve_type_spec(&field.ty);
        let fullname = self.scope_fullname(&field.name);
        self.declare_typed(
            field.id,
            &field.name,
            fullname,
            ty,
            |ty| DeclKind::Field { ty },
            &field.loc,
        );
    }

    fn visit_type_spec(&mut self, ts: &TypeSpec) {
        self.resolve_type_spec(ts);
    }

    fn visit_spawns_stmt(&mut self, spawns: &SpawnsStmt) {
        self.resolve_protocol_name(&spawns.proto, spawns.id, &spawns.loc);
    }

    fn visit_bridges_stmt(&mut self, bridges: &BridgesStmt) {
        for side in [&bridges.parent_side, &bridges.child_side] {
            self.resolve_protocol_name(&side.name, side.id, &side.loc);
        }
    }

    fn visit_manager(&mut self, manager: &Manager) {
        self.resolve_protocol_name(&manager.name, manager.id, &manager.loc);
    }

    fn visit_manages_stmt(&mut self, manages: &ManagesStmt) {
        self.resolve_protocol_name(&manages.name, manages.id, &manages.loc);
    }

    fn visit_message_decl(&mut self, md: &MessageDecl) {
        let mut seen = HashSet::new();
        for param in md.params() {
            if !seen.insert(param.name.as_str()) {
                self.error(
                    ResolveErrorKind::DuplicateParam(md.name.clone(), param.name.clone()),
                    &param.loc,
                );
            }
        }

        let prev = self.scope;
        if let Some(owner) = self.builder.lookup_node_decl_id(md.id) {
            self.scope = DeclScope::Message(owner);
        }
        walk_message_decl(self, md);
        self.scope = prev;
    }

    fn visit_param(&mut self, param: &Param) {
        let ty = self.resolve_type_spec(&param.typespec);
        let fullname = self.scope_fullname(&param.name);
        self.declare_typed(
            param.id,
            &param.name,
            fullname,
            ty,
            |ty| DeclKind::Param { ty },
            &param.loc,
        );
    }

    fn visit_transition_stmt(&mut self, stmt: &TransitionStmt) {
        // Source states were declared up front.
        for transition in &stmt.transitions {
            self.visit_transition(transition);
        }
    }

    fn visit_transition(&mut self, transition: &Transition) {
        let Some((_, msg)) = transition.action() else {
            return;
        };
        match self.messages.get(msg).copied() {
            Some(decl_id) => self.builder.record_use(transition.id, decl_id),
            None => {
                self.error(
                    ResolveErrorKind::UnknownMessage(msg.to_string()),
                    &transition.loc,
                );
                self.poison(transition.id);
            }
        }
        // Destinations that name no state are left for the state machine
        // checks to report.
        for state in &transition.to_states {
            if state.id.is_synthetic() {
                continue;
            }
            if let Some(decl_id) = self.states.get(state.name()).copied() {
                self.builder.record_use(state.id, decl_id);
            }
        }
    }
}
