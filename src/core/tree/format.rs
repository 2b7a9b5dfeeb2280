//! Renders a translation unit back to protocol description source.
//!
//! Output is canonical rather than faithful: comments and original spacing
//! are gone, messages are grouped under direction labels as they appear, and
//! namespaces are reopened around each namespaced declaration.

use crate::core::tree::visit::{Visitor, walk_protocol, walk_struct_decl};
use crate::core::tree::*;

pub fn format_translation_unit(tu: &TranslationUnit) -> String {
    let mut printer = Printer::default();
    printer.visit_translation_unit(tu);
    printer.out
}

pub fn format_type_spec(ts: &TypeSpec) -> String {
    let mut out = String::new();
    if ts.nullable {
        out.push_str("nullable ");
    }
    out.push_str(&ts.spec.to_string());
    if let Some(state) = &ts.state {
        out.push(':');
        out.push_str(state.name());
    }
    if ts.array {
        out.push_str("[]");
    }
    out
}

pub fn format_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|param| format!("{} {}", format_type_spec(&param.typespec), param.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_message_decl(md: &MessageDecl) -> String {
    let mut out = format!(
        "{} {}({})",
        md.send_semantics,
        md.name,
        format_params(&md.in_params)
    );
    if md.has_reply() || !md.out_params.is_empty() {
        out.push_str(&format!(" returns ({})", format_params(&md.out_params)));
    }
    out.push(';');
    out
}

pub fn format_transition(transition: &Transition) -> Option<String> {
    let (trigger, msg) = transition.action()?;
    let to_states = transition
        .to_states
        .iter()
        .map(|state| state.name())
        .collect::<Vec<_>>()
        .join(" or ");
    Some(format!("{trigger} {msg} goto {to_states};"))
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::In => "parent:",
        Direction::Out => "child:",
        Direction::InOut => "both:",
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Includes,
    Types,
    Using,
    Protocol,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ProtocolSection {
    Header,
    Messages,
    States,
}

#[derive(Default)]
struct Printer {
    out: String,
    section: Option<Section>,
    protocol_section: Option<ProtocolSection>,
    direction: Option<Direction>,
}

impl Printer {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn indented(&mut self, text: &str) {
        self.out.push_str("    ");
        self.line(text);
    }

    fn enter(&mut self, section: Section) {
        if self.section.is_some_and(|current| current != section) {
            self.out.push('\n');
        }
        self.section = Some(section);
    }

    fn enter_protocol_section(&mut self, section: ProtocolSection) {
        if self.protocol_section.is_some_and(|current| current != section) {
            self.out.push('\n');
        }
        self.protocol_section = Some(section);
    }

    fn open_namespaces(&mut self, namespaces: &[Namespace]) {
        for ns in namespaces {
            self.line(&format!("namespace {} {{", ns.name));
        }
    }

    fn close_namespaces(&mut self, namespaces: &[Namespace]) {
        for ns in namespaces.iter().rev() {
            self.line(&format!("}} // namespace {}", ns.name));
        }
    }
}

impl Visitor for Printer {
    fn visit_cxx_include(&mut self, include: &CxxInclude) {
        self.enter(Section::Includes);
        self.line(&format!("include \"{}\";", include.file));
    }

    fn visit_protocol_include(&mut self, include: &ProtocolInclude) {
        self.enter(Section::Includes);
        self.line(&format!("include protocol {};", include.protocol_name));
    }

    fn visit_using_stmt(&mut self, using: &UsingStmt) {
        self.enter(Section::Using);
        self.line(&format!("using {};", format_type_spec(&using.ty)));
    }

    fn visit_struct_decl(&mut self, struct_decl: &StructDecl) {
        self.enter(Section::Types);
        self.open_namespaces(&struct_decl.namespaces);
        self.line(&format!("struct {} {{", struct_decl.name));
        walk_struct_decl(self, struct_decl);
        self.line("};");
        self.close_namespaces(&struct_decl.namespaces);
    }

    fn visit_struct_field(&mut self, field: &StructField) {
        self.indented(&format!("{} {};", format_type_spec(&field.ty), field.name));
    }

    fn visit_union_decl(&mut self, union_decl: &UnionDecl) {
        self.enter(Section::Types);
        self.open_namespaces(&union_decl.namespaces);
        self.line(&format!("union {} {{", union_decl.name));
        for component in &union_decl.components {
            self.indented(&format!("{};", format_type_spec(component)));
        }
        self.line("};");
        self.close_namespaces(&union_decl.namespaces);
    }

    fn visit_protocol(&mut self, protocol: &Protocol) {
        self.enter(Section::Protocol);
        self.open_namespaces(&protocol.namespaces);
        match protocol.send_semantics {
            SendSemantics::Async => self.line(&format!("protocol {}", protocol.name)),
            semantics => self.line(&format!("{semantics} protocol {}", protocol.name)),
        }
        self.line("{");
        self.protocol_section = None;
        self.direction = None;
        walk_protocol(self, protocol);
        self.line("};");
        self.close_namespaces(&protocol.namespaces);
    }

    fn visit_spawns_stmt(&mut self, spawns: &SpawnsStmt) {
        self.enter_protocol_section(ProtocolSection::Header);
        self.indented(&format!(
            "{} spawns {} as {};",
            spawns.side, spawns.proto, spawns.spawned_as
        ));
    }

    fn visit_bridges_stmt(&mut self, bridges: &BridgesStmt) {
        self.enter_protocol_section(ProtocolSection::Header);
        self.indented(&format!(
            "bridges {}, {};",
            bridges.parent_side.name, bridges.child_side.name
        ));
    }

    fn visit_manager(&mut self, manager: &Manager) {
        self.enter_protocol_section(ProtocolSection::Header);
        self.indented(&format!("manager {};", manager.name));
    }

    fn visit_manages_stmt(&mut self, manages: &ManagesStmt) {
        self.enter_protocol_section(ProtocolSection::Header);
        self.indented(&format!("manages {};", manages.name));
    }

    fn visit_message_decl(&mut self, md: &MessageDecl) {
        self.enter_protocol_section(ProtocolSection::Messages);
        if self.direction != Some(md.direction) {
            self.line(direction_label(md.direction));
            self.direction = Some(md.direction);
        }
        self.indented(&format_message_decl(md));
    }

    fn visit_transition_stmt(&mut self, stmt: &TransitionStmt) {
        self.enter_protocol_section(ProtocolSection::States);
        if stmt.state.start {
            self.line(&format!("start state {}:", stmt.state.name()));
        } else {
            self.line(&format!("state {}:", stmt.state.name()));
        }
        for transition in &stmt.transitions {
            if let Some(text) = format_transition(transition) {
                self.indented(&text);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/tree/t_format.rs"]
mod tests;
