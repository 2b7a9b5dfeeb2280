//! Every message that blocks for a reply must be answerable.

use crate::core::protocol::StateMachine;
use crate::core::semck::errors::{SemCheckError, SemCheckErrorKind};
use crate::core::tree::{MessageDecl, Protocol, State};

pub(super) fn check(protocol: &Protocol, machine: &StateMachine) -> Vec<SemCheckError> {
    let mut errors = Vec::new();
    let reachable = machine.reachable_from_start();
    let has_start = machine.start_states().next().is_some();

    for md in protocol.message_decls.iter().filter(|md| md.has_reply()) {
        let sources = reply_sources(machine, md);
        if sources.is_empty() {
            errors.push(
                SemCheckErrorKind::MissingReplyTransition(md.name.clone(), md.send_semantics)
                    .at(md.loc.clone()),
            );
            continue;
        }
        // Without a start state nothing is reachable; that case has its own error.
        if has_start && !sources.iter().any(|state| reachable.contains(state.name())) {
            errors.push(
                SemCheckErrorKind::UnreachableReplyTransition(md.name.clone()).at(md.loc.clone()),
            );
        }
    }

    errors
}

fn reply_sources<'a>(machine: &'a StateMachine, md: &MessageDecl) -> Vec<&'a State> {
    machine
        .transitions()
        .filter(|(_, transition)| {
            transition
                .action()
                .is_some_and(|(trigger, msg)| trigger.is_reply_trigger() && msg == md.name)
        })
        .map(|(source, _)| source)
        .collect()
}
