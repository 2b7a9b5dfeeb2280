use std::collections::HashMap;
use std::fmt;

use crate::core::diag::InternalError;
use crate::core::resolve::{Decl, DeclId};
use crate::core::tree::NodeId;

pub struct DeclTableBuilder {
    decls: Vec<Decl>,
    node_decl: HashMap<NodeId, DeclId>,
}

impl Default for DeclTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclTableBuilder {
    pub fn new() -> Self {
        Self {
            decls: Vec::new(),
            node_decl: HashMap::new(),
        }
    }

    /// Records a decl declared by `node_id`.
    pub fn record_decl(&mut self, decl: Decl, node_id: NodeId) {
        self.node_decl.insert(node_id, decl.id);
        self.decls.push(decl);
    }

    /// Records a decl with no declaring node (builtins, sentinel states).
    pub fn record_detached(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    pub fn record_use(&mut self, node_id: NodeId, decl_id: DeclId) {
        self.node_decl.insert(node_id, decl_id);
    }

    pub fn lookup_decl(&self, decl_id: DeclId) -> Option<&Decl> {
        self.decls.get(decl_id.0 as usize)
    }

    pub fn lookup_node_decl_id(&self, node_id: NodeId) -> Option<DeclId> {
        self.node_decl.get(&node_id).copied()
    }

    pub fn finish(self) -> DeclTable {
        DeclTable {
            decls: self.decls,
            node_decl: self.node_decl,
        }
    }
}

// --- DeclTable ---

#[derive(Debug, Clone)]
pub struct DeclTable {
    decls: Vec<Decl>,
    node_decl: HashMap<NodeId, DeclId>,
}

impl DeclTable {
    pub fn lookup_decl(&self, decl_id: DeclId) -> Option<&Decl> {
        self.decls.get(decl_id.0 as usize)
    }

    pub fn lookup_node_decl_id(&self, node_id: NodeId) -> Option<DeclId> {
        self.node_decl.get(&node_id).copied()
    }

    pub fn lookup_node_decl(&self, node_id: NodeId) -> Option<&Decl> {
        self.lookup_node_decl_id(node_id)
            .and_then(|decl_id| self.lookup_decl(decl_id))
    }

    /// Reads the decl of a node that the resolve pass must have annotated.
    pub fn node_decl(&self, node_id: NodeId) -> Result<&Decl, InternalError> {
        self.lookup_node_decl(node_id)
            .ok_or(InternalError::MissingDecl(node_id))
    }

    pub fn lookup_fullname(&self, fullname: &str) -> Option<&Decl> {
        self.decls.iter().find(|decl| decl.fullname == fullname)
    }

    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl fmt::Display for DeclTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decls:")?;
        for decl in &self.decls {
            writeln!(f, "{decl}")?;
        }
        writeln!(f)?;
        writeln!(f, "Node -> Decl:")?;
        let mut node_decl = self.node_decl.iter().collect::<Vec<_>>();
        node_decl.sort_by_key(|(node, _)| node.0);
        for (node, decl) in node_decl {
            writeln!(f, "Node [{node}] -> Decl [{decl}]")?;
        }
        Ok(())
    }
}
