//! Stage contexts threaded through the front end.
//!
//! Each pass consumes the previous stage's context and returns the next one,
//! so a later pass can only see tables an earlier pass actually built.

use std::collections::{HashMap, HashSet};

use crate::core::diag::InternalError;
use crate::core::protocol::StateMachine;
use crate::core::resolve::{Decl, DeclTable};
use crate::core::tree::{MessageDecl, MessageRole, NodeId, Protocol, State, TranslationUnit};

/// A translation unit as handed over by the producer.
#[derive(Clone, Debug)]
pub struct ParsedContext {
    pub unit: TranslationUnit,
}

impl ParsedContext {
    pub fn new(unit: TranslationUnit) -> Self {
        Self { unit }
    }

    pub fn with_resolution(
        self,
        decls: DeclTable,
        actor_states: HashMap<NodeId, State>,
        poisoned_nodes: HashSet<NodeId>,
    ) -> ResolvedContext {
        ResolvedContext {
            unit: self.unit,
            decls,
            actor_states,
            poisoned_nodes,
        }
    }
}

/// Output of name resolution.
#[derive(Clone, Debug)]
pub struct ResolvedContext {
    pub unit: TranslationUnit,
    pub decls: DeclTable,
    /// State carried by each actor type spec; unannotated actor types get
    /// [`State::ANY`].
    pub actor_states: HashMap<NodeId, State>,
    /// Nodes whose resolution failed and already produced an error. Later
    /// passes skip them instead of reporting twice.
    pub poisoned_nodes: HashSet<NodeId>,
}

impl ResolvedContext {
    pub fn protocol(&self) -> Result<&Protocol, InternalError> {
        self.unit.protocol()
    }

    pub fn decl(&self, node_id: NodeId) -> Result<&Decl, InternalError> {
        self.decls.node_decl(node_id)
    }

    pub fn actor_state(&self, node_id: NodeId) -> Option<&State> {
        self.actor_states.get(&node_id)
    }

    pub fn is_poisoned(&self, node_id: NodeId) -> bool {
        self.poisoned_nodes.contains(&node_id)
    }

    pub fn with_state_machine(self, machine: StateMachine) -> CheckedContext {
        CheckedContext {
            unit: self.unit,
            decls: self.decls,
            actor_states: self.actor_states,
            machine,
        }
    }
}

/// A translation unit that passed every per-unit check.
#[derive(Clone, Debug)]
pub struct CheckedContext {
    pub unit: TranslationUnit,
    pub decls: DeclTable,
    pub actor_states: HashMap<NodeId, State>,
    pub machine: StateMachine,
}

impl CheckedContext {
    pub fn protocol(&self) -> Result<&Protocol, InternalError> {
        self.unit.protocol()
    }

    pub fn decl(&self, node_id: NodeId) -> Result<&Decl, InternalError> {
        self.decls.node_decl(node_id)
    }

    pub fn actor_state(&self, node_id: NodeId) -> Option<&State> {
        self.actor_states.get(&node_id)
    }

    pub fn message_role(&self, md: &MessageDecl) -> Result<MessageRole, InternalError> {
        md.role()
    }
}
