///
/// Statement AST Nodes
///
/// This module defines all statement types in the sable language. Statements
/// live inside a `Scope` (a braced statement list).
///
/// Key statement categories:
/// - Delimited: label, goto, return, break, continue, var, expression;
///   each is terminated by `;` in the source
/// - Free: if, while, for; these end with their own scope
///
/// Design notes:
/// - `else if` chains are an `ElseBranch::If` holding the next IfStmt
/// - ForStmt keeps its initializer, condition and step all optional
///

use crate::source::{Span, Spanned};
use super::declarations::VariableDecl;
use super::expressions::Expression;
use super::types::{Ident, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Label(LabelStmt),
    Goto(GotoStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Variable(VariableDecl),
    Expression(Expression),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Label(s) => s.id,
            Statement::Goto(s) => s.id,
            Statement::Return(s) => s.id,
            Statement::Break(s) => s.id,
            Statement::Continue(s) => s.id,
            Statement::Variable(s) => s.id,
            Statement::Expression(e) => e.id(),
            Statement::If(s) => s.id,
            Statement::While(s) => s.id,
            Statement::For(s) => s.id,
        }
    }
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Label(s) => s.span,
            Statement::Goto(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Break(s) => s.span,
            Statement::Continue(s) => s.span,
            Statement::Variable(s) => s.span,
            Statement::Expression(e) => e.span(),
            Statement::If(s) => s.span,
            Statement::While(s) => s.span,
            Statement::For(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub id: NodeId,
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStmt {
    pub id: NodeId,
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GotoStmt {
    pub id: NodeId,
    pub label: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub id: NodeId,
    pub condition: Expression,
    pub then_scope: Scope,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Scope(Scope),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub id: NodeId,
    pub condition: Expression,
    pub body: Scope,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub id: NodeId,
    pub initializer: Option<ForInit>,
    pub condition: Option<Expression>,
    pub step: Option<Expression>,
    pub body: Scope,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Variable(VariableDecl),
    Expression(Expression),
}
