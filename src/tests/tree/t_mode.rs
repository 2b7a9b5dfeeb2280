use super::*;

#[test]
fn test_pretty_names() {
    assert_eq!(SendSemantics::Async.pretty(), "async");
    assert_eq!(SendSemantics::Sync.pretty(), "sync");
    assert_eq!(SendSemantics::Rpc.pretty(), "rpc");
    assert_eq!(Direction::In.pretty(), "in");
    assert_eq!(Direction::Out.pretty(), "out");
    assert_eq!(Direction::InOut.pretty(), "inout");
    assert_eq!(Trigger::Answer.to_string(), "answer");
}

#[test]
fn test_names_parse_back() {
    for ss in [SendSemantics::Async, SendSemantics::Sync, SendSemantics::Rpc] {
        assert_eq!(SendSemantics::from_name(ss.pretty()), Some(ss));
    }
    for trigger in [Trigger::Send, Trigger::Recv, Trigger::Call, Trigger::Answer] {
        assert_eq!(Trigger::from_name(trigger.pretty()), Some(trigger));
    }
    assert_eq!(SendSemantics::from_name("urgent"), None);
    assert_eq!(Trigger::from_name("goto"), None);
}

#[test]
fn test_only_blocking_semantics_have_reply() {
    assert!(!SendSemantics::Async.has_reply());
    assert!(SendSemantics::Sync.has_reply());
    assert!(SendSemantics::Rpc.has_reply());
    assert_eq!(SendSemantics::default(), SendSemantics::Async);
}

#[test]
fn test_trigger_directions_are_fixed() {
    assert_eq!(Trigger::Send.direction(), Direction::Out);
    assert_eq!(Trigger::Call.direction(), Direction::Out);
    assert_eq!(Trigger::Recv.direction(), Direction::In);
    assert_eq!(Trigger::Answer.direction(), Direction::In);

    assert!(Trigger::Call.is_reply_trigger());
    assert!(Trigger::Answer.is_reply_trigger());
    assert!(!Trigger::Send.is_reply_trigger());
}

#[test]
fn test_inout_admits_either_trigger_direction() {
    assert!(Direction::InOut.admits(Direction::In));
    assert!(Direction::InOut.admits(Direction::Out));
    assert!(Direction::In.admits(Direction::In));
    assert!(!Direction::In.admits(Direction::Out));
    assert!(!Direction::Out.admits(Direction::In));
}

#[test]
fn test_role_table() {
    let cases = [
        (Direction::In, SendSemantics::Async, MessageRole::AsyncRecv),
        (Direction::In, SendSemantics::Sync, MessageRole::SyncRecv),
        (Direction::In, SendSemantics::Rpc, MessageRole::RpcAnswer),
        (Direction::Out, SendSemantics::Async, MessageRole::AsyncSend),
        (Direction::Out, SendSemantics::Sync, MessageRole::SyncSend),
        (Direction::Out, SendSemantics::Rpc, MessageRole::RpcCall),
    ];
    for (direction, semantics, expected) in cases {
        assert_eq!(MessageRole::derive(direction, semantics), Ok(expected));
    }
    assert_eq!(MessageRole::RpcAnswer.to_string(), "RpcAnswer");
}

#[test]
fn test_role_of_inout_is_internal_error() {
    let err = MessageRole::derive(Direction::InOut, SendSemantics::Sync).unwrap_err();
    assert_eq!(err, InternalError::NoRoleForDirection(Direction::InOut));
}
