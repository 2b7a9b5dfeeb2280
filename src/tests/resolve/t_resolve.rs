use super::*;
use crate::core::api::CheckOptions;
use crate::core::context::ParsedContext;
use crate::core::diag::InternalError;
use crate::core::fixtures::{UnitBuilder, start_running};
use crate::core::tree::builder::AstBuilder;
use crate::core::tree::*;

fn resolve_unit(unit: TranslationUnit) -> ResolveOutput {
    resolve(ParsedContext::new(unit), &CheckOptions::default())
        .expect("resolve should not fail internally")
}

fn error_kinds(out: &ResolveOutput) -> Vec<ResolveErrorKind> {
    out.errors.iter().map(|e| e.kind().clone()).collect()
}

fn message_with_param(ub: &mut UnitBuilder, name: &str, ts: TypeSpec) -> MessageDecl {
    let param = ub.b.param(ts, "arg");
    let mut md = ub.b.message(name, SendSemantics::Async, Direction::In);
    md.add_in_params([param]);
    md
}

#[test]
fn test_resolve_start_running() {
    let out = resolve_unit(start_running());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);

    let ctx = &out.context;
    let protocol = ctx.protocol().unwrap();
    let transition = &protocol.transition_stmts[0].transitions[0];

    let msg_decl = ctx.decl(transition.id).unwrap();
    assert_eq!(msg_decl.fullname, "PGo::Go");
    assert_eq!(msg_decl.shortname, "Go");
    assert_eq!(
        msg_decl.kind,
        DeclKind::Message {
            send_semantics: SendSemantics::Async,
            direction: Direction::Out,
        }
    );
    assert_eq!(msg_decl.scope, DeclScope::Protocol);

    // The destination reference and the declaring statement share a decl.
    let dest = ctx.decl(transition.to_states[0].id).unwrap();
    let running = ctx.decl(protocol.transition_stmts[1].state.id).unwrap();
    assert_eq!(dest.id, running.id);
    assert_eq!(running.kind, DeclKind::State { start: false });

    let start = ctx.decl(protocol.transition_stmts[0].state.id).unwrap();
    assert_eq!(start.kind, DeclKind::State { start: true });
    assert_eq!(start.fullname, "PGo::START");
}

#[test]
fn test_resolve_protocol_decl() {
    let out = resolve_unit(start_running());
    let protocol = out.context.protocol().unwrap();
    let decl = out.context.decl(protocol.id).unwrap();
    assert_eq!(decl.progname, "PGo");
    assert!(decl.kind.is_protocol());
    assert!(decl.kind.is_type());
    assert_eq!(decl.scope, DeclScope::TranslationUnit);
}

#[test]
fn test_resolve_namespaced_names() {
    let mut ub = UnitBuilder::new("PBlob.ipdl", "PBlob");
    ub.namespace("dom").namespace("mozilla");

    let field_ty = ub.b.type_spec("uint32_t");
    let field = ub.b.struct_field(field_ty, "size");
    let mut data = ub.b.struct_decl("BlobData", vec![field]);
    data.add_outer_namespace(ub.b.namespace("dom"));
    data.add_outer_namespace(ub.b.namespace("mozilla"));
    ub.unit.add_struct_decl(data);

    let data_ty = ub.b.type_spec("BlobData");
    let md = message_with_param(&mut ub, "Send", data_ty);
    ub.message_with(md);
    let shmem_ty = ub.b.type_spec("ipc::Shmem");
    let md = message_with_param(&mut ub, "Share", shmem_ty);
    ub.message_with(md);
    ub.state("START", true, &[(Trigger::Recv, "Send", &["START"])]);

    let out = resolve_unit(ub.finish());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);

    let ctx = &out.context;
    let protocol = ctx.protocol().unwrap();

    let send = ctx.decl(protocol.message("Send").unwrap().id).unwrap();
    assert!(protocol.message("Receive").is_none());
    assert_eq!(send.fullname, "mozilla::dom::PBlob::Send");
    assert_eq!(send.shortname, "Send");
    assert_eq!(send.progname, "Send");

    // `BlobData` is found through the protocol's enclosing namespaces.
    let data_use = ctx.decl(protocol.message_decls[0].in_params[0].typespec.id).unwrap();
    assert_eq!(data_use.kind, DeclKind::Struct);
    assert_eq!(data_use.fullname, "mozilla::dom::BlobData");
    assert_eq!(data_use.shortname, "BlobData");

    let shmem_use = ctx.decl(protocol.message_decls[1].in_params[0].typespec.id).unwrap();
    assert_eq!(shmem_use.kind, DeclKind::BuiltinType);
    assert_eq!(shmem_use.fullname, "mozilla::ipc::Shmem");
    assert_eq!(shmem_use.shortname, "ipc::Shmem");

    let param = ctx.decl(protocol.message_decls[0].in_params[0].id).unwrap();
    assert_eq!(param.fullname, "mozilla::dom::PBlob::Send::arg");
    assert_eq!(param.kind, DeclKind::Param { ty: data_use.id });
    assert!(matches!(param.scope, DeclScope::Message(owner) if owner == send.id));
}

#[test]
fn test_resolve_struct_fields() {
    let mut ub = UnitBuilder::new("PData.ipdl", "PData");
    let ty = ub.b.type_spec("nsCString");
    let field = ub.b.struct_field(ty, "name");
    let field_id = field.id;
    let record = ub.b.struct_decl("Record", vec![field]);
    let record_id = record.id;
    ub.unit.add_struct_decl(record);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);

    let record = out.context.decl(record_id).unwrap();
    let field = out.context.decl(field_id).unwrap();
    assert_eq!(field.fullname, "Record::name");
    assert_eq!(field.scope, DeclScope::Struct(record.id));
    assert!(matches!(field.kind, DeclKind::Field { .. }));
}

#[test]
fn test_resolve_using_brings_in_base_name() {
    let mut ub = UnitBuilder::new("PBlob.ipdl", "PBlob");
    ub.using("mozilla::dom::BlobImpl");
    let ty = ub.b.type_spec("BlobImpl");
    let md = message_with_param(&mut ub, "Send", ty);
    ub.message_with(md);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    let protocol = out.context.protocol().unwrap();
    let decl = out
        .context
        .decl(protocol.message_decls[0].in_params[0].typespec.id)
        .unwrap();
    assert_eq!(decl.kind, DeclKind::ImportedType);
    assert_eq!(decl.fullname, "mozilla::dom::BlobImpl");
    assert_eq!(decl.progname, "BlobImpl");
}

#[test]
fn test_resolve_unknown_type_poisons_node() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    ub.message("Go", SendSemantics::Async, Direction::Out, &[("Gizmo", "g")]);
    ub.state("START", true, &[(Trigger::Send, "Go", &["START"])]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownType("Gizmo".to_string())]
    );
    let protocol = out.context.protocol().unwrap();
    let param = &protocol.message_decls[0].in_params[0];
    assert!(out.context.is_poisoned(param.typespec.id));
    assert!(out.context.is_poisoned(param.id));
    assert!(out.context.decls.lookup_node_decl(param.id).is_none());
}

#[test]
fn test_resolve_unknown_message() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    ub.message("Go", SendSemantics::Async, Direction::Out, &[]);
    ub.state("START", true, &[(Trigger::Send, "Stop", &["START"])]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownMessage("Stop".to_string())]
    );
    let protocol = out.context.protocol().unwrap();
    let transition = &protocol.transition_stmts[0].transitions[0];
    assert!(out.context.is_poisoned(transition.id));
    assert_eq!(out.errors[0].loc(), &transition.loc);
}

#[test]
fn test_resolve_leaves_dangling_destination_to_semck() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    ub.message("Go", SendSemantics::Async, Direction::Out, &[]);
    ub.state("START", true, &[(Trigger::Send, "Go", &["UNKNOWN"])]);

    let out = resolve_unit(ub.finish());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    let protocol = out.context.protocol().unwrap();
    let dest = &protocol.transition_stmts[0].transitions[0].to_states[0];
    assert!(out.context.decls.lookup_node_decl(dest.id).is_none());
}

#[test]
fn test_resolve_actor_states() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    let annotated = ub.b.actor_type("PGo", "RUNNING");
    let annotated_id = annotated.id;
    let md = message_with_param(&mut ub, "Annotated", annotated);
    ub.message_with(md);
    let bare = ub.b.type_spec("PGo");
    let bare_id = bare.id;
    let md = message_with_param(&mut ub, "Bare", bare);
    ub.message_with(md);
    let plain = ub.b.type_spec("int");
    let plain_id = plain.id;
    let md = message_with_param(&mut ub, "Plain", plain);
    ub.message_with(md);
    ub.state("START", true, &[(Trigger::Recv, "Bare", &["RUNNING"])]);
    ub.state("RUNNING", false, &[]);

    let out = resolve_unit(ub.finish());
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);

    let ctx = &out.context;
    assert_eq!(ctx.actor_state(annotated_id).map(State::name), Some("RUNNING"));
    assert_eq!(ctx.actor_state(bare_id), Some(&State::ANY));
    assert_eq!(ctx.actor_state(plain_id), None);
}

#[test]
fn test_resolve_unknown_actor_state() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    let ts = ub.b.actor_type("PGo", "FLYING");
    let ts_id = ts.id;
    let md = message_with_param(&mut ub, "Launch", ts);
    ub.message_with(md);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownState(
            "PGo".to_string(),
            "FLYING".to_string()
        )]
    );
    assert!(out.context.is_poisoned(ts_id));
    assert_eq!(out.context.actor_state(ts_id), None);
}

#[test]
fn test_resolve_state_on_non_actor_type() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    let ts = ub.b.actor_type("int", "START");
    let md = message_with_param(&mut ub, "Count", ts);
    ub.message_with(md);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::NotAnActorType(
            "int".to_string(),
            "START".to_string()
        )]
    );
}

#[test]
fn test_resolve_duplicates() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    ub.message("Go", SendSemantics::Async, Direction::Out, &[]);
    ub.message("Go", SendSemantics::Async, Direction::In, &[]);
    ub.message(
        "Pair",
        SendSemantics::Async,
        Direction::In,
        &[("int", "x"), ("int", "x")],
    );
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![
            ResolveErrorKind::DuplicateDecl("PGo::Go".to_string()),
            ResolveErrorKind::DuplicateParam("Pair".to_string(), "x".to_string()),
        ]
    );
}

#[test]
fn test_resolve_protocol_relations() {
    let mut ub = UnitBuilder::new("PChild.ipdl", "PChild");
    ub.include("PParent").manager("PParent").manager("PNowhere");
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownProtocol("PNowhere".to_string())]
    );

    let protocol = out.context.protocol().unwrap();
    let manager = out.context.decl(protocol.managers[0].id).unwrap();
    assert_eq!(
        manager.kind,
        DeclKind::IncludedProtocol {
            file: "PParent.ipdl".to_string()
        }
    );
    assert!(out.context.is_poisoned(protocol.managers[1].id));
}

#[test]
fn test_resolve_bridges_sides() {
    let mut ub = UnitBuilder::new("PBridge.ipdl", "PBridge");
    ub.include("PContent").include("PPlugin");
    let known = ub.b.bridges("PContent", "PPlugin");
    let unknown = ub.b.bridges("PContent", "PNowhere");
    ub.protocol.bridges_stmts.extend([known, unknown]);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownProtocol("PNowhere".to_string())]
    );

    let ctx = &out.context;
    let bridges = &ctx.protocol().unwrap().bridges_stmts;
    let parent = ctx.decl(bridges[0].parent_side.id).unwrap();
    let child = ctx.decl(bridges[0].child_side.id).unwrap();
    assert_eq!(parent.progname, "PContent");
    assert_eq!(child.progname, "PPlugin");
    assert!(child.kind.is_protocol());

    // Each side resolves on its own.
    assert_eq!(ctx.decl(bridges[1].parent_side.id).unwrap().id, parent.id);
    assert!(ctx.is_poisoned(bridges[1].child_side.id));
    assert!(!ctx.is_poisoned(bridges[1].parent_side.id));
}

#[test]
fn test_resolve_union_components() {
    let mut ub = UnitBuilder::new("PData.ipdl", "PData");
    let int_ty = ub.b.type_spec("int");
    let bad_ty = ub.b.type_spec("Widget");
    let int_id = int_ty.id;
    let bad_id = bad_ty.id;
    let variant = ub.b.union_decl("Variant", vec![int_ty, bad_ty]);
    let variant_id = variant.id;
    ub.unit.add_union_decl(variant);
    ub.state("START", true, &[]);

    let out = resolve_unit(ub.finish());
    assert_eq!(
        error_kinds(&out),
        vec![ResolveErrorKind::UnknownType("Widget".to_string())]
    );
    let ctx = &out.context;
    assert_eq!(ctx.decl(variant_id).unwrap().kind, DeclKind::Union);
    assert_eq!(ctx.decl(int_id).unwrap().kind, DeclKind::BuiltinType);
    assert!(ctx.is_poisoned(bad_id));
}

#[test]
fn test_resolve_extra_builtin_types() {
    let mut ub = UnitBuilder::new("PGo.ipdl", "PGo");
    ub.message("Go", SendSemantics::Async, Direction::Out, &[("Gizmo", "g")]);
    ub.state("START", true, &[]);

    let options = CheckOptions {
        extra_builtin_types: vec!["Gizmo".to_string()],
        ..CheckOptions::default()
    };
    let out = resolve(ParsedContext::new(ub.finish()), &options).unwrap();
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
}

#[test]
fn test_resolve_requires_protocol() {
    let mut b = AstBuilder::new("PEmpty.ipdl");
    let unit = b.translation_unit();
    let err = resolve(ParsedContext::new(unit), &CheckOptions::default())
        .err()
        .unwrap();
    assert_eq!(err, InternalError::MissingProtocol("PEmpty.ipdl".to_string()));
}

#[test]
fn test_decl_table_dump() {
    let out = resolve_unit(start_running());
    let dump = out.context.decls.to_string();
    assert!(dump.contains("PGo::Go: Message (async, out)"));
    assert!(dump.contains("PGo::START: State (start)"));
    assert!(dump.contains("Node -> Decl:"));
}

#[test]
fn test_short_name() {
    let context = vec!["mozilla".to_string(), "dom".to_string(), "PBlob".to_string()];
    assert_eq!(short_name("mozilla::dom::BlobData", &context), "BlobData");
    assert_eq!(short_name("mozilla::ipc::Shmem", &context), "ipc::Shmem");
    assert_eq!(short_name("nsresult", &context), "nsresult");
    assert_eq!(short_name("mozilla::dom::PBlob::Send", &context), "Send");
    assert_eq!(join_qualified(["a", "b"], "C"), "a::b::C");
    assert_eq!(join_qualified([], "C"), "C");
}
