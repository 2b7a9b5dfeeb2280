use indoc::indoc;

use super::*;
use crate::core::tree::builder::AstBuilder;

fn sample_unit() -> TranslationUnit {
    let mut b = AstBuilder::new("PSample.ipdl");
    let mut unit = b.translation_unit();
    unit.add_cxx_include(b.cxx_include("mozilla/Sample.h"));
    unit.add_protocol_include(b.protocol_include("PManager"));
    unit.add_using_stmt(b.using("mozilla::dom::Blob"));

    let field_ty = b.type_spec("int");
    let field = b.struct_field(field_ty, "count");
    let mut counter = b.struct_decl("Counter", vec![field]);
    counter.add_outer_namespace(b.namespace("mozilla"));
    unit.add_struct_decl(counter);

    let mut protocol = b.protocol("PSample");
    protocol.add_outer_namespace(b.namespace("mozilla"));
    protocol.send_semantics = SendSemantics::Sync;
    protocol.managers.push(b.manager("PManager"));

    let mut hello = b.message("Hello", SendSemantics::Sync, Direction::Out);
    let greeting_ty = b.type_spec("nsString");
    let ok_ty = b.type_spec("bool");
    hello.add_in_params([b.param(greeting_ty, "greeting")]);
    hello.add_out_params([b.param(ok_ty, "ok")]);
    protocol.message_decls.push(hello);
    protocol
        .message_decls
        .push(b.message("Bye", SendSemantics::Async, Direction::Out));
    protocol
        .message_decls
        .push(b.message("Notify", SendSemantics::Async, Direction::In));

    let start = b.state("START", true);
    let call = b.transition(Trigger::Call, "Hello", &["DONE"]);
    protocol
        .transition_stmts
        .push(b.transition_stmt(start, vec![call]));
    let done = b.state("DONE", false);
    protocol
        .transition_stmts
        .push(b.transition_stmt(done, Vec::new()));

    unit.set_protocol(protocol);
    unit
}

#[test]
fn test_format_translation_unit() {
    let expected = indoc! {r#"
        include "mozilla/Sample.h";
        include protocol PManager;

        namespace mozilla {
        struct Counter {
            int count;
        };
        } // namespace mozilla

        using mozilla::dom::Blob;

        namespace mozilla {
        sync protocol PSample
        {
            manager PManager;

        child:
            sync Hello(nsString greeting) returns (bool ok);
            async Bye();
        parent:
            async Notify();

        start state START:
            call Hello goto DONE;
        state DONE:
        };
        } // namespace mozilla
    "#};

    assert_eq!(format_translation_unit(&sample_unit()), expected);
}

#[test]
fn test_format_type_spec() {
    let mut b = AstBuilder::new("PSample.ipdl");
    let mut ts = b.actor_type("PSample", "RUNNING");
    ts.nullable = true;
    ts.array = true;
    assert_eq!(format_type_spec(&ts), "nullable PSample:RUNNING[]");

    let plain = b.type_spec("mozilla::ipc::Shmem");
    assert_eq!(format_type_spec(&plain), "mozilla::ipc::Shmem");
}

#[test]
fn test_format_message_decl() {
    let mut b = AstBuilder::new("PSample.ipdl");
    let mut md = b.message("Query", SendSemantics::Rpc, Direction::InOut);
    let key_ty = b.type_spec("uint32_t");
    md.add_in_params([b.param(key_ty, "key")]);
    assert_eq!(format_message_decl(&md), "rpc Query(uint32_t key) returns ();");

    let md = b.message("Poke", SendSemantics::Async, Direction::In);
    assert_eq!(format_message_decl(&md), "async Poke();");
}

#[test]
fn test_format_protocol_header() {
    let mut b = AstBuilder::new("PSample.ipdl");
    let mut unit = b.translation_unit();
    let mut protocol = b.protocol("PBridge");
    protocol
        .spawns_stmts
        .push(b.spawns(ActorSide::Parent, "PPlugin", ActorSide::Child));
    protocol.bridges_stmts.push(b.bridges("PContent", "PPlugin"));
    protocol.manages_stmts.push(b.manages("PPlugin"));
    unit.set_protocol(protocol);

    let expected = indoc! {"
        protocol PBridge
        {
            parent spawns PPlugin as child;
            bridges PContent, PPlugin;
            manages PPlugin;
        };
    "};
    assert_eq!(format_translation_unit(&unit), expected);
}

#[test]
fn test_format_transition() {
    let mut b = AstBuilder::new("PSample.ipdl");
    let transition = b.transition(Trigger::Recv, "Poke", &["IDLE", "[dead]"]);
    assert_eq!(
        format_transition(&transition).as_deref(),
        Some("recv Poke goto IDLE or [dead];")
    );
    assert_eq!(format_transition(&Transition::NULL), None);
}
