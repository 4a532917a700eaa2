//!
//! Declaration AST Nodes
//!
//! Declarations introduce names: classes, functions, their parameters, and
//! variables. The root of a compilation unit is a `Block` of top-level
//! declarations (see `ast::Block`).
//!

use crate::source::{Span, Spanned};
use super::expressions::Expression;
use super::statements::Scope;
use super::types::{Ident, NodeId, TypeNode};

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
}

impl Declaration {
    pub fn id(&self) -> NodeId {
        match self {
            Declaration::Class(d) => d.id,
            Declaration::Function(d) => d.id,
            Declaration::Variable(d) => d.id,
        }
    }
}

impl Spanned for Declaration {
    fn span(&self) -> Span {
        match self {
            Declaration::Class(d) => d.span,
            Declaration::Function(d) => d.span,
            Declaration::Variable(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub name: Ident,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: Ident,
    pub parameters: Vec<Parameter>,
    /// Absent means the function returns `Void`.
    pub return_type: Option<TypeNode>,
    pub body: Scope,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: NodeId,
    pub name: Ident,
    pub ty: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub id: NodeId,
    pub name: Ident,
    pub ty: TypeNode,
    pub initializer: Option<Expression>,
    pub span: Span,
}
