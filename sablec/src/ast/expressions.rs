///
/// Expression AST Nodes
///
/// This module defines all expression types in the sable language. Every
/// expression variant carries a NodeId; its resolved type is recorded in
/// the analyzer's annotation tables under that id.
///
/// Expression categories:
/// - Value: literals and identifiers (the primary rule)
/// - Unary / Binary: prefix operators and the binary precedence ladder
/// - Post-expressions: member access, call, cast, index; each wraps the
///   expression to its left
///
/// Parenthesized sub-expressions produce no node of their own.
///

use lasso::Spur;

use crate::source::{Span, Spanned};
use super::operators::{AccessKind, BinaryOp, UnaryOp};
use super::types::{Ident, NodeId, TypeNode};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(ValueExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    MemberAccess(MemberAccessExpr),
    Call(CallExpr),
    Cast(CastExpr),
    Index(IndexExpr),
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Value(e) => e.id,
            Expression::Unary(e) => e.id,
            Expression::Binary(e) => e.id,
            Expression::MemberAccess(e) => e.id,
            Expression::Call(e) => e.id,
            Expression::Cast(e) => e.id,
            Expression::Index(e) => e.id,
        }
    }

    pub fn is_post_expression(&self) -> bool {
        matches!(
            self,
            Expression::MemberAccess(_) | Expression::Call(_) | Expression::Cast(_) | Expression::Index(_)
        )
    }
}

impl Spanned for Expression {
    fn span(&self) -> Span {
        match self {
            Expression::Value(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::MemberAccess(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::Cast(e) => e.span,
            Expression::Index(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    /// Raw lexeme, quotes and escapes included.
    Character(Spur),
    /// Raw lexeme, quotes and escapes included.
    String(Spur),
    Boolean(bool),
    Null,
    Identifier(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueExpr {
    pub id: NodeId,
    pub value: Value,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub id: NodeId,
    pub op: UnaryOp,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub left: Box<Expression>,
    pub op: BinaryOp,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessExpr {
    pub id: NodeId,
    pub object: Box<Expression>,
    pub access: AccessKind,
    pub member: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub id: NodeId,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub id: NodeId,
    pub operand: Box<Expression>,
    pub target: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub id: NodeId,
    pub target: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}
