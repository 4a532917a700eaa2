//!
//! Analysis Annotations
//!
//! Side tables filled in by the analyzer, keyed by `NodeId` so the AST stays
//! immutable once parsed:
//! - resolved_type: the Type symbol every checked expression evaluates to
//! - symbol: the Symbol a declaration created, or an identifier names
//! - resolved_member: the member a `.`/`->` access selects
//! - resolved_label: the Label a `goto` jumps to
//! - declared_type: the Type symbol a written Type node resolves to
//! - signature: the Function-mode type of each function declaration
//!

use std::collections::HashMap;

use crate::ast::NodeId;

use super::symbols::SymbolId;

#[derive(Debug, Default)]
pub struct Annotations {
    resolved_types: HashMap<NodeId, SymbolId>,
    symbols: HashMap<NodeId, SymbolId>,
    resolved_members: HashMap<NodeId, SymbolId>,
    resolved_labels: HashMap<NodeId, SymbolId>,
    declared_types: HashMap<NodeId, SymbolId>,
    signatures: HashMap<NodeId, SymbolId>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_resolved_type(&mut self, node: NodeId, ty: SymbolId) {
        self.resolved_types.insert(node, ty);
    }

    pub fn resolved_type(&self, node: NodeId) -> Option<SymbolId> {
        self.resolved_types.get(&node).copied()
    }

    pub fn set_symbol(&mut self, node: NodeId, symbol: SymbolId) {
        self.symbols.insert(node, symbol);
    }

    pub fn symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.symbols.get(&node).copied()
    }

    pub fn set_resolved_member(&mut self, node: NodeId, member: SymbolId) {
        self.resolved_members.insert(node, member);
    }

    pub fn resolved_member(&self, node: NodeId) -> Option<SymbolId> {
        self.resolved_members.get(&node).copied()
    }

    pub fn set_resolved_label(&mut self, node: NodeId, label: SymbolId) {
        self.resolved_labels.insert(node, label);
    }

    pub fn resolved_label(&self, node: NodeId) -> Option<SymbolId> {
        self.resolved_labels.get(&node).copied()
    }

    pub fn set_declared_type(&mut self, node: NodeId, ty: SymbolId) {
        self.declared_types.insert(node, ty);
    }

    pub fn declared_type(&self, node: NodeId) -> Option<SymbolId> {
        self.declared_types.get(&node).copied()
    }

    pub fn set_signature(&mut self, node: NodeId, ty: SymbolId) {
        self.signatures.insert(node, ty);
    }

    pub fn signature(&self, node: NodeId) -> Option<SymbolId> {
        self.signatures.get(&node).copied()
    }

    pub fn resolved_type_count(&self) -> usize {
        self.resolved_types.len()
    }
}
