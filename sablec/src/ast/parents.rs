//!
//! Parent Links
//!
//! Children are owned by their parent; the reverse relation lives here, in a
//! map built once by a top-down linking walk. The map also indexes every node
//! by id so a later pass can climb from any node to an enclosing construct.
//!

use std::collections::HashMap;

use super::types::NodeId;
use super::visitor::NodeRef;

#[derive(Debug, Default)]
pub struct ParentMap<'ast> {
    parents: HashMap<NodeId, NodeId>,
    nodes: HashMap<NodeId, NodeRef<'ast>>,
}

impl<'ast> ParentMap<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links every node reachable from `root`. The root itself has no parent.
    pub fn build(root: NodeRef<'ast>) -> Self {
        let mut map = Self::new();
        map.link(root, None);
        map
    }

    pub fn link(&mut self, node: NodeRef<'ast>, parent: Option<NodeId>) {
        let mut stack = vec![(node, parent)];
        while let Some((node, parent)) = stack.pop() {
            let id = node.id();
            self.nodes.insert(id, node);
            if let Some(parent) = parent {
                self.parents.insert(id, parent);
            }
            for child in node.children().into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeRef<'ast>> {
        self.parents.get(&id).and_then(|parent| self.nodes.get(parent)).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'ast>> {
        self.nodes.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeRef<'ast>> + '_ {
        std::iter::successors(self.parent(id), move |node| self.parent(node.id()))
    }

    pub fn enclosing_function(&self, id: NodeId) -> Option<&'ast crate::ast::FunctionDecl> {
        self.ancestors(id).find_map(|node| match node {
            NodeRef::Function(f) => Some(f),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Statement};
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn test_parent_links() {
        let source = "fn f() { while (true) { return; } }";
        let (tokens, _) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        let parents = ParentMap::build(NodeRef::Block(&block));

        let Declaration::Function(func) = &block.declarations[0] else {
            panic!("expected function");
        };
        let Statement::While(w) = &func.body.statements[0] else {
            panic!("expected while");
        };
        let ret = &w.body.statements[0];

        assert!(parents.parent(block.id).is_none());
        assert_eq!(parents.parent(func.id).map(|n| n.id()), Some(block.id));
        assert_eq!(parents.parent(ret.id()).map(|n| n.id()), Some(w.body.id));
        assert_eq!(parents.enclosing_function(ret.id()).map(|f| f.id), Some(func.id));

        let kinds: Vec<_> = parents.ancestors(ret.id()).map(|n| n.kind_name()).collect();
        assert_eq!(kinds, vec!["Scope", "While", "Scope", "Function", "Block"]);
    }

    #[test]
    fn test_global_has_no_enclosing_function() {
        let source = "var x : Integer = 1;";
        let (tokens, _) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        let parents = ParentMap::build(NodeRef::Block(&block));
        assert!(parents.enclosing_function(block.declarations[0].id()).is_none());
        assert_eq!(parents.len(), 4);
    }
}
