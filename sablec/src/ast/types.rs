//!
//! AST Identity and Type Syntax
//!
//! Key types:
//! - NodeId: Stable identity of a node, used to key side tables
//!   (parent links, resolved types, bound symbols)
//! - NodeIds: Fresh-id source shared by one parse
//! - Ident: An identifier with its source location (uses string interning)
//! - TypeNode: A written type, `Name` followed by zero or more `*`
//!

use std::cell::Cell;
use std::fmt;

use lasso::Spur;

use crate::source::{Span, Spanned};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct NodeIds {
    next: Cell<u32>,
}

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }

    pub fn allocated(&self) -> u32 {
        self.next.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident {
    pub symbol: Spur,
    pub span: Span,
}

impl Ident {
    pub fn new(symbol: Spur, span: Span) -> Self {
        Self { symbol, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub id: NodeId,
    pub name: Ident,
    pub pointer_depth: usize,
    pub span: Span,
}

impl Spanned for TypeNode {
    fn span(&self) -> Span {
        self.span
    }
}
