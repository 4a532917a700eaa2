//!
//! AST Visitor Pattern
//!
//! This module provides a borrowed view over every node kind (`NodeRef`) and a
//! visitor trait for traversing the tree without modifying the node types.
//!
//! Usage:
//! - Implement the Visitor trait
//! - Override only the methods you need
//! - Unhandled kinds fall back to their category handler:
//!   value/unary/binary -> expression, member access/call/cast/index ->
//!   post expression -> expression -> statement -> node. Declarations,
//!   parameters and types fall back straight to node.
//!
//! `walk` offers a node to the visitor (when `visit_self` is set) and then
//! descends into its children in the order `NodeRef::children` documents,
//! unless the visitor answered `VisitResult::Stop` for that node.
//!

use smallvec::SmallVec;

use crate::source::{Span, Spanned};
use super::Block;
use super::declarations::*;
use super::expressions::*;
use super::statements::*;
use super::types::{NodeId, TypeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'ast> {
    Block(&'ast Block),
    Class(&'ast ClassDecl),
    Function(&'ast FunctionDecl),
    Parameter(&'ast Parameter),
    Variable(&'ast VariableDecl),
    Type(&'ast TypeNode),
    Scope(&'ast Scope),
    Label(&'ast LabelStmt),
    Goto(&'ast GotoStmt),
    Return(&'ast ReturnStmt),
    Break(&'ast BreakStmt),
    Continue(&'ast ContinueStmt),
    If(&'ast IfStmt),
    While(&'ast WhileStmt),
    For(&'ast ForStmt),
    Value(&'ast ValueExpr),
    Unary(&'ast UnaryExpr),
    Binary(&'ast BinaryExpr),
    MemberAccess(&'ast MemberAccessExpr),
    Call(&'ast CallExpr),
    Cast(&'ast CastExpr),
    Index(&'ast IndexExpr),
}

impl<'ast> From<&'ast Expression> for NodeRef<'ast> {
    fn from(expr: &'ast Expression) -> Self {
        match expr {
            Expression::Value(e) => NodeRef::Value(e),
            Expression::Unary(e) => NodeRef::Unary(e),
            Expression::Binary(e) => NodeRef::Binary(e),
            Expression::MemberAccess(e) => NodeRef::MemberAccess(e),
            Expression::Call(e) => NodeRef::Call(e),
            Expression::Cast(e) => NodeRef::Cast(e),
            Expression::Index(e) => NodeRef::Index(e),
        }
    }
}

impl<'ast> From<&'ast Statement> for NodeRef<'ast> {
    fn from(stmt: &'ast Statement) -> Self {
        match stmt {
            Statement::Label(s) => NodeRef::Label(s),
            Statement::Goto(s) => NodeRef::Goto(s),
            Statement::Return(s) => NodeRef::Return(s),
            Statement::Break(s) => NodeRef::Break(s),
            Statement::Continue(s) => NodeRef::Continue(s),
            Statement::Variable(s) => NodeRef::Variable(s),
            Statement::Expression(e) => NodeRef::from(e),
            Statement::If(s) => NodeRef::If(s),
            Statement::While(s) => NodeRef::While(s),
            Statement::For(s) => NodeRef::For(s),
        }
    }
}

impl<'ast> From<&'ast Declaration> for NodeRef<'ast> {
    fn from(decl: &'ast Declaration) -> Self {
        match decl {
            Declaration::Class(d) => NodeRef::Class(d),
            Declaration::Function(d) => NodeRef::Function(d),
            Declaration::Variable(d) => NodeRef::Variable(d),
        }
    }
}

impl<'ast> From<&'ast Member> for NodeRef<'ast> {
    fn from(member: &'ast Member) -> Self {
        match member {
            Member::Variable(d) => NodeRef::Variable(d),
            Member::Function(d) => NodeRef::Function(d),
        }
    }
}

impl<'ast> NodeRef<'ast> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Block(n) => n.id,
            NodeRef::Class(n) => n.id,
            NodeRef::Function(n) => n.id,
            NodeRef::Parameter(n) => n.id,
            NodeRef::Variable(n) => n.id,
            NodeRef::Type(n) => n.id,
            NodeRef::Scope(n) => n.id,
            NodeRef::Label(n) => n.id,
            NodeRef::Goto(n) => n.id,
            NodeRef::Return(n) => n.id,
            NodeRef::Break(n) => n.id,
            NodeRef::Continue(n) => n.id,
            NodeRef::If(n) => n.id,
            NodeRef::While(n) => n.id,
            NodeRef::For(n) => n.id,
            NodeRef::Value(n) => n.id,
            NodeRef::Unary(n) => n.id,
            NodeRef::Binary(n) => n.id,
            NodeRef::MemberAccess(n) => n.id,
            NodeRef::Call(n) => n.id,
            NodeRef::Cast(n) => n.id,
            NodeRef::Index(n) => n.id,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Block(_) => "Block",
            NodeRef::Class(_) => "Class",
            NodeRef::Function(_) => "Function",
            NodeRef::Parameter(_) => "Parameter",
            NodeRef::Variable(_) => "Variable",
            NodeRef::Type(_) => "Type",
            NodeRef::Scope(_) => "Scope",
            NodeRef::Label(_) => "Label",
            NodeRef::Goto(_) => "Goto",
            NodeRef::Return(_) => "Return",
            NodeRef::Break(_) => "Break",
            NodeRef::Continue(_) => "Continue",
            NodeRef::If(_) => "If",
            NodeRef::While(_) => "While",
            NodeRef::For(_) => "For",
            NodeRef::Value(_) => "Value",
            NodeRef::Unary(_) => "UnaryOperator",
            NodeRef::Binary(_) => "BinaryOperator",
            NodeRef::MemberAccess(_) => "MemberAccess",
            NodeRef::Call(_) => "Call",
            NodeRef::Cast(_) => "Cast",
            NodeRef::Index(_) => "Index",
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeRef::Value(_)
                | NodeRef::Unary(_)
                | NodeRef::Binary(_)
                | NodeRef::MemberAccess(_)
                | NodeRef::Call(_)
                | NodeRef::Cast(_)
                | NodeRef::Index(_)
        )
    }

    /// Owned children in walk order:
    /// - Block: declarations; Class: members; Scope: statements
    /// - Function: parameters, return type, body
    /// - Parameter: type; Variable: type, then initializer
    /// - Return: value
    /// - If: condition, then-scope, else branch
    /// - While: condition, body
    /// - For: initializer, condition, step, body
    /// - Unary: operand; Binary: left, right
    /// - MemberAccess: object; Call: callee, then arguments
    /// - Cast: operand, then target type; Index: target, then index
    pub fn children(&self) -> SmallVec<[NodeRef<'ast>; 4]> {
        let mut out = SmallVec::new();
        match *self {
            NodeRef::Block(n) => out.extend(n.declarations.iter().map(NodeRef::from)),
            NodeRef::Class(n) => out.extend(n.members.iter().map(NodeRef::from)),
            NodeRef::Function(n) => {
                out.extend(n.parameters.iter().map(NodeRef::Parameter));
                if let Some(ret) = &n.return_type {
                    out.push(NodeRef::Type(ret));
                }
                out.push(NodeRef::Scope(&n.body));
            }
            NodeRef::Parameter(n) => out.push(NodeRef::Type(&n.ty)),
            NodeRef::Variable(n) => {
                out.push(NodeRef::Type(&n.ty));
                if let Some(init) = &n.initializer {
                    out.push(NodeRef::from(init));
                }
            }
            NodeRef::Scope(n) => out.extend(n.statements.iter().map(NodeRef::from)),
            NodeRef::Return(n) => {
                if let Some(value) = &n.value {
                    out.push(NodeRef::from(value));
                }
            }
            NodeRef::If(n) => {
                out.push(NodeRef::from(&n.condition));
                out.push(NodeRef::Scope(&n.then_scope));
                match &n.else_branch {
                    Some(ElseBranch::If(next)) => out.push(NodeRef::If(next)),
                    Some(ElseBranch::Scope(scope)) => out.push(NodeRef::Scope(scope)),
                    None => {}
                }
            }
            NodeRef::While(n) => {
                out.push(NodeRef::from(&n.condition));
                out.push(NodeRef::Scope(&n.body));
            }
            NodeRef::For(n) => {
                match &n.initializer {
                    Some(ForInit::Variable(var)) => out.push(NodeRef::Variable(var)),
                    Some(ForInit::Expression(expr)) => out.push(NodeRef::from(expr)),
                    None => {}
                }
                if let Some(cond) = &n.condition {
                    out.push(NodeRef::from(cond));
                }
                if let Some(step) = &n.step {
                    out.push(NodeRef::from(step));
                }
                out.push(NodeRef::Scope(&n.body));
            }
            NodeRef::Unary(n) => out.push(NodeRef::from(n.operand.as_ref())),
            NodeRef::Binary(n) => {
                out.push(NodeRef::from(n.left.as_ref()));
                out.push(NodeRef::from(n.right.as_ref()));
            }
            NodeRef::MemberAccess(n) => out.push(NodeRef::from(n.object.as_ref())),
            NodeRef::Call(n) => {
                out.push(NodeRef::from(n.callee.as_ref()));
                out.extend(n.arguments.iter().map(NodeRef::from));
            }
            NodeRef::Cast(n) => {
                out.push(NodeRef::from(n.operand.as_ref()));
                out.push(NodeRef::Type(&n.target));
            }
            NodeRef::Index(n) => {
                out.push(NodeRef::from(n.target.as_ref()));
                out.push(NodeRef::from(n.index.as_ref()));
            }
            NodeRef::Type(_)
            | NodeRef::Label(_)
            | NodeRef::Goto(_)
            | NodeRef::Break(_)
            | NodeRef::Continue(_)
            | NodeRef::Value(_) => {}
        }
        out
    }

    /// Hands this node to the visitor method for its kind.
    pub fn accept<V: Visitor<'ast> + ?Sized>(self, v: &mut V) -> VisitResult {
        match self {
            NodeRef::Block(n) => v.visit_block(n),
            NodeRef::Class(n) => v.visit_class(n),
            NodeRef::Function(n) => v.visit_function(n),
            NodeRef::Parameter(n) => v.visit_parameter(n),
            NodeRef::Variable(n) => v.visit_variable(n),
            NodeRef::Type(n) => v.visit_type(n),
            NodeRef::Scope(n) => v.visit_scope(n),
            NodeRef::Label(n) => v.visit_label(n),
            NodeRef::Goto(n) => v.visit_goto(n),
            NodeRef::Return(n) => v.visit_return(n),
            NodeRef::Break(n) => v.visit_break(n),
            NodeRef::Continue(n) => v.visit_continue(n),
            NodeRef::If(n) => v.visit_if(n),
            NodeRef::While(n) => v.visit_while(n),
            NodeRef::For(n) => v.visit_for(n),
            NodeRef::Value(n) => v.visit_value(n),
            NodeRef::Unary(n) => v.visit_unary(n),
            NodeRef::Binary(n) => v.visit_binary(n),
            NodeRef::MemberAccess(n) => v.visit_member_access(n),
            NodeRef::Call(n) => v.visit_call(n),
            NodeRef::Cast(n) => v.visit_cast(n),
            NodeRef::Index(n) => v.visit_index(n),
        }
    }
}

impl Spanned for NodeRef<'_> {
    fn span(&self) -> Span {
        match self {
            NodeRef::Block(n) => n.span,
            NodeRef::Class(n) => n.span,
            NodeRef::Function(n) => n.span,
            NodeRef::Parameter(n) => n.span,
            NodeRef::Variable(n) => n.span,
            NodeRef::Type(n) => n.span,
            NodeRef::Scope(n) => n.span,
            NodeRef::Label(n) => n.span,
            NodeRef::Goto(n) => n.span,
            NodeRef::Return(n) => n.span,
            NodeRef::Break(n) => n.span,
            NodeRef::Continue(n) => n.span,
            NodeRef::If(n) => n.span,
            NodeRef::While(n) => n.span,
            NodeRef::For(n) => n.span,
            NodeRef::Value(n) => n.span,
            NodeRef::Unary(n) => n.span,
            NodeRef::Binary(n) => n.span,
            NodeRef::MemberAccess(n) => n.span,
            NodeRef::Call(n) => n.span,
            NodeRef::Cast(n) => n.span,
            NodeRef::Index(n) => n.span,
        }
    }
}

pub trait Visitor<'ast> {
    fn visit_node(&mut self, _node: NodeRef<'ast>) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_statement(&mut self, node: NodeRef<'ast>) -> VisitResult {
        self.visit_node(node)
    }

    fn visit_expression(&mut self, node: NodeRef<'ast>) -> VisitResult {
        self.visit_statement(node)
    }

    fn visit_post_expression(&mut self, node: NodeRef<'ast>) -> VisitResult {
        self.visit_expression(node)
    }

    fn visit_block(&mut self, node: &'ast Block) -> VisitResult {
        self.visit_node(NodeRef::Block(node))
    }

    fn visit_class(&mut self, node: &'ast ClassDecl) -> VisitResult {
        self.visit_node(NodeRef::Class(node))
    }

    fn visit_function(&mut self, node: &'ast FunctionDecl) -> VisitResult {
        self.visit_node(NodeRef::Function(node))
    }

    fn visit_parameter(&mut self, node: &'ast Parameter) -> VisitResult {
        self.visit_node(NodeRef::Parameter(node))
    }

    fn visit_type(&mut self, node: &'ast TypeNode) -> VisitResult {
        self.visit_node(NodeRef::Type(node))
    }

    fn visit_variable(&mut self, node: &'ast VariableDecl) -> VisitResult {
        self.visit_statement(NodeRef::Variable(node))
    }

    fn visit_scope(&mut self, node: &'ast Scope) -> VisitResult {
        self.visit_statement(NodeRef::Scope(node))
    }

    fn visit_label(&mut self, node: &'ast LabelStmt) -> VisitResult {
        self.visit_statement(NodeRef::Label(node))
    }

    fn visit_goto(&mut self, node: &'ast GotoStmt) -> VisitResult {
        self.visit_statement(NodeRef::Goto(node))
    }

    fn visit_return(&mut self, node: &'ast ReturnStmt) -> VisitResult {
        self.visit_statement(NodeRef::Return(node))
    }

    fn visit_break(&mut self, node: &'ast BreakStmt) -> VisitResult {
        self.visit_statement(NodeRef::Break(node))
    }

    fn visit_continue(&mut self, node: &'ast ContinueStmt) -> VisitResult {
        self.visit_statement(NodeRef::Continue(node))
    }

    fn visit_if(&mut self, node: &'ast IfStmt) -> VisitResult {
        self.visit_statement(NodeRef::If(node))
    }

    fn visit_while(&mut self, node: &'ast WhileStmt) -> VisitResult {
        self.visit_statement(NodeRef::While(node))
    }

    fn visit_for(&mut self, node: &'ast ForStmt) -> VisitResult {
        self.visit_statement(NodeRef::For(node))
    }

    fn visit_value(&mut self, node: &'ast ValueExpr) -> VisitResult {
        self.visit_expression(NodeRef::Value(node))
    }

    fn visit_unary(&mut self, node: &'ast UnaryExpr) -> VisitResult {
        self.visit_expression(NodeRef::Unary(node))
    }

    fn visit_binary(&mut self, node: &'ast BinaryExpr) -> VisitResult {
        self.visit_expression(NodeRef::Binary(node))
    }

    fn visit_member_access(&mut self, node: &'ast MemberAccessExpr) -> VisitResult {
        self.visit_post_expression(NodeRef::MemberAccess(node))
    }

    fn visit_call(&mut self, node: &'ast CallExpr) -> VisitResult {
        self.visit_post_expression(NodeRef::Call(node))
    }

    fn visit_cast(&mut self, node: &'ast CastExpr) -> VisitResult {
        self.visit_post_expression(NodeRef::Cast(node))
    }

    fn visit_index(&mut self, node: &'ast IndexExpr) -> VisitResult {
        self.visit_post_expression(NodeRef::Index(node))
    }
}

pub fn walk<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, node: NodeRef<'ast>, visit_self: bool) {
    if visit_self && node.accept(v) == VisitResult::Stop {
        return;
    }
    walk_children(v, node);
}

pub fn walk_children<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, node: NodeRef<'ast>) {
    for child in node.children() {
        walk(v, child, true);
    }
}
