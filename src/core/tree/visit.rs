use crate::core::tree::*;

/// Tree visitor with default traversal helpers.
///
/// Implement the methods you care about (e.g. `visit_message_decl`) and call
/// the corresponding `walk_*` function to recurse into children.
/// Example:
/// ```rust
/// use ipdl::core::tree::MessageDecl;
/// use ipdl::core::tree::visit::{walk_message_decl, Visitor};
///
/// struct CountMessages(usize);
/// impl Visitor for CountMessages {
///     fn visit_message_decl(&mut self, md: &MessageDecl) {
///         self.0 += 1;
///         walk_message_decl(self, md);
///     }
/// }
/// ```
pub trait Visitor {
    // --- Translation Unit ---

    fn visit_translation_unit(&mut self, tu: &TranslationUnit) {
        walk_translation_unit(self, tu)
    }

    fn visit_cxx_include(&mut self, _include: &CxxInclude) {}

    // Included units are never entered here; cross-unit checks run as a
    // separate program pass.
    fn visit_protocol_include(&mut self, _include: &ProtocolInclude) {}

    fn visit_using_stmt(&mut self, _using: &UsingStmt) {}

    // --- Structs and Unions ---

    fn visit_struct_decl(&mut self, struct_decl: &StructDecl) {
        walk_struct_decl(self, struct_decl)
    }

    fn visit_struct_field(&mut self, field: &StructField) {
        walk_struct_field(self, field)
    }

    fn visit_union_decl(&mut self, union_decl: &UnionDecl) {
        walk_union_decl(self, union_decl)
    }

    // --- Protocol ---

    fn visit_protocol(&mut self, protocol: &Protocol) {
        walk_protocol(self, protocol)
    }

    fn visit_namespace(&mut self, _namespace: &Namespace) {}

    fn visit_spawns_stmt(&mut self, _spawns: &SpawnsStmt) {}

    fn visit_bridges_stmt(&mut self, _bridges: &BridgesStmt) {}

    fn visit_manager(&mut self, _manager: &Manager) {}

    fn visit_manages_stmt(&mut self, _manages: &ManagesStmt) {}

    // --- Messages ---

    fn visit_message_decl(&mut self, md: &MessageDecl) {
        walk_message_decl(self, md)
    }

    fn visit_param(&mut self, param: &Param) {
        walk_param(self, param)
    }

    fn visit_type_spec(&mut self, _ts: &TypeSpec) {}

    // --- State Machine ---

    fn visit_transition_stmt(&mut self, stmt: &TransitionStmt) {
        walk_transition_stmt(self, stmt)
    }

    fn visit_transition(&mut self, transition: &Transition) {
        walk_transition(self, transition)
    }

    fn visit_state(&mut self, _state: &State) {}
}

// --- Translation Unit ---

pub fn walk_translation_unit<V: Visitor + ?Sized>(v: &mut V, tu: &TranslationUnit) {
    for include in &tu.cxx_includes {
        v.visit_cxx_include(include);
    }
    for include in &tu.protocol_includes {
        v.visit_protocol_include(include);
    }
    for item in &tu.structs_and_unions {
        match item {
            StructOrUnion::Struct(struct_decl) => v.visit_struct_decl(struct_decl),
            StructOrUnion::Union(union_decl) => v.visit_union_decl(union_decl),
        }
    }
    for using in &tu.using {
        v.visit_using_stmt(using);
    }
    if let Some(protocol) = &tu.protocol {
        v.visit_protocol(protocol);
    }
}

// --- Structs and Unions ---

pub fn walk_struct_decl<V: Visitor + ?Sized>(v: &mut V, struct_decl: &StructDecl) {
    for field in &struct_decl.fields {
        v.visit_struct_field(field);
    }
}

pub fn walk_struct_field<V: Visitor + ?Sized>(v: &mut V, field: &StructField) {
    v.visit_type_spec(&field.ty);
}

pub fn walk_union_decl<V: Visitor + ?Sized>(v: &mut V, union_decl: &UnionDecl) {
    for component in &union_decl.components {
        v.visit_type_spec(component);
    }
}

// --- Protocol ---

pub fn walk_protocol<V: Visitor + ?Sized>(v: &mut V, protocol: &Protocol) {
    for namespace in &protocol.namespaces {
        v.visit_namespace(namespace);
    }
    for spawns in &protocol.spawns_stmts {
        v.visit_spawns_stmt(spawns);
    }
    for bridges in &protocol.bridges_stmts {
        v.visit_bridges_stmt(bridges);
    }
    for manager in &protocol.managers {
        v.visit_manager(manager);
    }
    for manages in &protocol.manages_stmts {
        v.visit_manages_stmt(manages);
    }
    for md in &protocol.message_decls {
        v.visit_message_decl(md);
    }
    for stmt in &protocol.transition_stmts {
        v.visit_transition_stmt(stmt);
    }
}

// --- Messages ---

pub fn walk_message_decl<V: Visitor + ?Sized>(v: &mut V, md: &MessageDecl) {
    for param in &md.in_params {
        v.visit_param(param);
    }
    for param in &md.out_params {
        v.visit_param(param);
    }
}

pub fn walk_param<V: Visitor + ?Sized>(v: &mut V, param: &Param) {
    v.visit_type_spec(&param.typespec);
}

// --- State Machine ---

pub fn walk_transition_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &TransitionStmt) {
    v.visit_state(&stmt.state);
    for transition in &stmt.transitions {
        v.visit_transition(transition);
    }
}

pub fn walk_transition<V: Visitor + ?Sized>(v: &mut V, transition: &Transition) {
    for state in &transition.to_states {
        v.visit_state(state);
    }
}
