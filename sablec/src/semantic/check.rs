///
/// Phase 4: Type Resolution and Checking
///
/// Walks the tree with the scope stack, resolving children before applying
/// the parent's rule, and records the type of every expression. Statement
/// rules (conditions, loop control, labels, returns, initializers) are
/// validated on the way.
///
/// Typing rules:
/// - Literals: Integer, Float, Boolean, Byte (character), Byte* (string),
///   Null* (null). Identifiers resolve through the scope stack, then the
///   global map, and must name a variable or function.
/// - `+`: same numeric operands, or a pointer and an Integer in either order.
/// - `-`: same numeric operands, pointer minus Integer, or pointer minus
///   pointer (Integer).
/// - `* / %`: same numeric operands. Comparisons always give Boolean.
/// - `|| &&`: both operands Boolean or pointer, giving Boolean.
/// - `=`: identical types, right side not a function; compound forms apply
///   their arithmetic operator, which must give the left operand's type.
/// - Unary: `*` needs a pointer, `+ -` a number, `++ --` a number or
///   pointer, `!` a Boolean or pointer; `&` gives a pointer to its operand.
///
/// An operand that failed to resolve has no type, and rules applied to it
/// are skipped so one mistake is reported once.
///

use crate::ast::*;
use crate::source::{Span, Spanned};

use super::context::AnalysisContext;
use super::error::SemanticError;
use super::library::{BOOLEAN, BYTE, FLOAT, INTEGER, NULL, VOID};
use super::scope::ScopeKind;
use super::symbols::{Symbol, SymbolId, TypeMode};

pub fn check<'ast>(ctx: &mut AnalysisContext<'_, 'ast>, root: &'ast Block) {
    let mut checker = Checker { ctx };
    checker.node(NodeRef::Block(root));
}

struct Checker<'c, 'a, 'ast> {
    ctx: &'c mut AnalysisContext<'a, 'ast>,
}

impl<'ast> Checker<'_, '_, 'ast> {
    fn node(&mut self, node: NodeRef<'ast>) {
        match node {
            NodeRef::Class(class) => {
                let symbol = self.ctx.annotations.symbol(class.id);
                self.scoped(ScopeKind::Class, node, symbol);
            }
            NodeRef::Function(function) => {
                let symbol = self.ctx.annotations.symbol(function.id);
                self.scoped(ScopeKind::Function, node, symbol);
            }
            NodeRef::Scope(_) => self.scoped(ScopeKind::Block, node, None),
            NodeRef::Parameter(parameter) => self.declare(parameter.id, parameter.name),
            NodeRef::Variable(variable) => self.variable(variable),
            NodeRef::If(stmt) => self.if_stmt(stmt),
            NodeRef::While(stmt) => {
                self.condition(&stmt.condition);
                self.ctx.scopes.push(ScopeKind::Loop, stmt.id, None);
                self.node(NodeRef::Scope(&stmt.body));
                self.ctx.scopes.pop();
            }
            NodeRef::For(stmt) => self.for_stmt(stmt),
            NodeRef::Goto(stmt) => self.goto(stmt),
            NodeRef::Return(stmt) => self.return_stmt(stmt),
            NodeRef::Break(_) | NodeRef::Continue(_) => {
                if !self.ctx.scopes.in_loop() {
                    self.ctx.report(SemanticError::BreakContinueMustBeInsideLoop { span: node.span() });
                }
            }
            expr if expr.is_expression() => {
                self.expression(expr);
            }
            // Block, Type and Label carry no rule of their own.
            other => self.children(other),
        }
    }

    fn children(&mut self, node: NodeRef<'ast>) {
        for child in node.children() {
            self.node(child);
        }
    }

    fn scoped(&mut self, kind: ScopeKind, node: NodeRef<'ast>, symbol: Option<SymbolId>) {
        self.ctx.scopes.push(kind, node.id(), symbol);
        self.children(node);
        self.ctx.scopes.pop();
    }

    fn declare(&mut self, node: NodeId, name: Ident) {
        if let Some(symbol) = self.ctx.annotations.symbol(node) {
            let name = self.ctx.name(name);
            self.ctx.scopes.declare(name, symbol);
        }
    }

    fn variable(&mut self, variable: &'ast VariableDecl) {
        let declared = self.ctx.annotations.declared_type(variable.ty.id);
        if let Some(init) = &variable.initializer {
            let found = self.expression(NodeRef::from(init));
            if let (Some(expected), Some(found)) = (declared, found) {
                let null_for_pointer = self.ctx.is_pointer(expected) && self.ctx.is_null_pointer(found);
                if found != expected && !null_for_pointer {
                    self.mismatch(expected, Some(found), init.span());
                }
            }
        }
        self.declare(variable.id, variable.name);
    }

    fn condition(&mut self, condition: &'ast Expression) {
        let Some(ty) = self.expression(NodeRef::from(condition)) else {
            return;
        };
        if !self.ctx.is_boolean_or_pointer(ty) {
            self.ctx.report(SemanticError::ConditionExpectedBooleanOrPointer {
                found: self.ctx.type_name(ty),
                span: condition.span(),
            });
        }
    }

    fn if_stmt(&mut self, stmt: &'ast IfStmt) {
        self.condition(&stmt.condition);
        self.node(NodeRef::Scope(&stmt.then_scope));
        match &stmt.else_branch {
            Some(ElseBranch::If(next)) => self.if_stmt(next),
            Some(ElseBranch::Scope(scope)) => self.node(NodeRef::Scope(scope)),
            None => {}
        }
    }

    fn for_stmt(&mut self, stmt: &'ast ForStmt) {
        self.ctx.scopes.push(ScopeKind::Loop, stmt.id, None);
        match &stmt.initializer {
            Some(ForInit::Variable(variable)) => self.variable(variable),
            Some(ForInit::Expression(expr)) => {
                self.expression(NodeRef::from(expr));
            }
            None => {}
        }
        if let Some(condition) = &stmt.condition {
            self.condition(condition);
        }
        if let Some(step) = &stmt.step {
            self.expression(NodeRef::from(step));
        }
        self.node(NodeRef::Scope(&stmt.body));
        self.ctx.scopes.pop();
    }

    fn goto(&mut self, stmt: &'ast GotoStmt) {
        let name = self.ctx.name(stmt.label);
        let label = self
            .ctx
            .scopes
            .nearest_function()
            .and_then(|f| self.ctx.library.symbol(f))
            .and_then(Symbol::as_function)
            .and_then(|f| f.labels.get(name).copied());

        match label {
            Some(label) => self.ctx.annotations.set_resolved_label(stmt.id, label),
            None => self.ctx.report(SemanticError::not_found(name, stmt.label.span)),
        }
    }

    fn return_stmt(&mut self, stmt: &'ast ReturnStmt) {
        let found = stmt
            .value
            .as_ref()
            .and_then(|value| self.expression(NodeRef::from(value)));

        let Some(function) = self.ctx.parents.enclosing_function(stmt.id) else {
            return;
        };
        let expected = match &function.return_type {
            Some(ty) => self.ctx.annotations.declared_type(ty.id),
            None => self.ctx.global_type(VOID),
        };
        let Some(expected) = expected else {
            return;
        };

        match (&stmt.value, found) {
            (None, _) => {
                if !self.ctx.is_builtin(expected, VOID) {
                    self.mismatch(expected, None, stmt.span);
                }
            }
            (Some(value), Some(found)) if found != expected => {
                self.mismatch(expected, Some(found), value.span());
            }
            _ => {}
        }
    }

    fn mismatch(&mut self, expected: SymbolId, found: Option<SymbolId>, span: Span) {
        let expected = self.ctx.type_name(expected);
        let found = found.map(|f| self.ctx.type_name(f));
        self.ctx.report(SemanticError::type_mismatch(expected, found, span));
    }

    fn expression(&mut self, node: NodeRef<'ast>) -> Option<SymbolId> {
        let ty = match node {
            NodeRef::Value(expr) => self.value(expr),
            NodeRef::Unary(expr) => self.unary(expr),
            NodeRef::Binary(expr) => self.binary(expr),
            NodeRef::MemberAccess(expr) => self.member_access(expr),
            NodeRef::Call(expr) => self.call(expr),
            NodeRef::Cast(expr) => self.cast(expr),
            NodeRef::Index(expr) => self.index(expr),
            other => {
                self.node(other);
                None
            }
        };
        if let Some(ty) = ty {
            self.ctx.annotations.set_resolved_type(node.id(), ty);
        }
        ty
    }

    fn value(&mut self, expr: &'ast ValueExpr) -> Option<SymbolId> {
        match &expr.value {
            Value::Integer(_) => self.ctx.builtin(INTEGER, expr.span),
            Value::Float(_) => self.ctx.builtin(FLOAT, expr.span),
            Value::Boolean(_) => self.ctx.builtin(BOOLEAN, expr.span),
            Value::Character(_) => self.ctx.builtin(BYTE, expr.span),
            Value::String(_) => {
                let byte = self.ctx.builtin(BYTE, expr.span)?;
                Some(self.ctx.pointer_to(byte))
            }
            Value::Null => {
                let null = self.ctx.builtin(NULL, expr.span)?;
                Some(self.ctx.pointer_to(null))
            }
            Value::Identifier(ident) => self.identifier(expr.id, *ident),
        }
    }

    fn identifier(&mut self, node: NodeId, ident: Ident) -> Option<SymbolId> {
        let name = self.ctx.name(ident);
        let symbol = self
            .ctx
            .lookup_value(name)
            .filter(|id| self.ctx.library.symbol(*id).is_some_and(Symbol::is_value));

        let Some(symbol) = symbol else {
            self.ctx.report(SemanticError::not_found(name, ident.span));
            return None;
        };
        self.ctx.annotations.set_symbol(node, symbol);
        self.ctx.library.symbol(symbol).and_then(|s| s.ty)
    }

    fn unary(&mut self, expr: &'ast UnaryExpr) -> Option<SymbolId> {
        let operand = self.expression(NodeRef::from(expr.operand.as_ref()))?;
        let ctx = &*self.ctx;

        let result = match expr.op {
            UnaryOp::Deref => ctx.pointee(operand),
            UnaryOp::Plus | UnaryOp::Negate => ctx.is_numeric(operand).then_some(operand),
            UnaryOp::Increment | UnaryOp::Decrement => {
                (ctx.is_numeric(operand) || ctx.is_pointer(operand)).then_some(operand)
            }
            UnaryOp::Not => {
                if ctx.is_boolean_or_pointer(operand) {
                    return self.ctx.builtin(BOOLEAN, expr.span);
                }
                None
            }
            UnaryOp::AddressOf => return Some(self.ctx.pointer_to(operand)),
        };

        if result.is_none() {
            self.ctx.report(SemanticError::InvalidUnaryOperator {
                op: expr.op.to_string(),
                operand: self.ctx.type_name(operand),
                span: expr.span,
            });
        }
        result
    }

    fn binary(&mut self, expr: &'ast BinaryExpr) -> Option<SymbolId> {
        let left = self.expression(NodeRef::from(expr.left.as_ref()));
        let right = self.expression(NodeRef::from(expr.right.as_ref()));
        let (left, right) = (left?, right?);

        let result = match expr.op.compound_operator() {
            Some(arithmetic) => self
                .binary_result(arithmetic, left, right, expr.span)
                .filter(|ty| *ty == left),
            None => self.binary_result(expr.op, left, right, expr.span),
        };

        if result.is_none() {
            self.ctx.report(SemanticError::InvalidBinaryOperator {
                op: expr.op.to_string(),
                left: self.ctx.type_name(left),
                right: self.ctx.type_name(right),
                span: expr.span,
            });
        }
        result
    }

    fn binary_result(&mut self, op: BinaryOp, left: SymbolId, right: SymbolId, span: Span) -> Option<SymbolId> {
        let ctx = &*self.ctx;
        let same_numeric = left == right && ctx.is_numeric(left);

        match op {
            BinaryOp::Add => {
                if same_numeric || (ctx.is_pointer(left) && ctx.is_integer(right)) {
                    Some(left)
                } else if ctx.is_integer(left) && ctx.is_pointer(right) {
                    Some(right)
                } else {
                    None
                }
            }
            BinaryOp::Sub => {
                if same_numeric || (ctx.is_pointer(left) && ctx.is_integer(right)) {
                    Some(left)
                } else if ctx.is_pointer(left) && ctx.is_pointer(right) {
                    self.ctx.builtin(INTEGER, span)
                } else {
                    None
                }
            }
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => same_numeric.then_some(left),
            BinaryOp::Or | BinaryOp::And => {
                if ctx.is_boolean_or_pointer(left) && ctx.is_boolean_or_pointer(right) {
                    self.ctx.builtin(BOOLEAN, span)
                } else {
                    None
                }
            }
            BinaryOp::Assign => (left == right && !ctx.is_function_type(right)).then_some(left),
            op if op.is_comparison() => self.ctx.builtin(BOOLEAN, span),
            // Compound assignments are reduced to their arithmetic operator.
            _ => None,
        }
    }

    fn member_access(&mut self, expr: &'ast MemberAccessExpr) -> Option<SymbolId> {
        let object = self.expression(NodeRef::from(expr.object.as_ref()))?;
        let class = match expr.access {
            AccessKind::Dot => Some(object),
            AccessKind::Arrow => self.ctx.pointee(object),
        }
        .filter(|class| self.ctx.mode(*class) == Some(TypeMode::Class));

        let Some(class) = class else {
            self.ctx.report(SemanticError::InvalidMemberAccess {
                access: expr.access.to_string(),
                ty: self.ctx.type_name(object),
                span: expr.span,
            });
            return None;
        };

        let name = self.ctx.name(expr.member);
        let member = self
            .ctx
            .type_symbol(class)
            .and_then(|t| t.members.get(name).copied());
        let Some(member) = member else {
            self.ctx.report(SemanticError::not_found(name, expr.member.span));
            return None;
        };
        self.ctx.annotations.set_resolved_member(expr.id, member);
        self.ctx.library.symbol(member).and_then(|s| s.ty)
    }

    fn call(&mut self, expr: &'ast CallExpr) -> Option<SymbolId> {
        let callee = self.expression(NodeRef::from(expr.callee.as_ref()));
        let arguments: Vec<Option<SymbolId>> = expr
            .arguments
            .iter()
            .map(|arg| self.expression(NodeRef::from(arg)))
            .collect();
        let callee = callee?;

        let Some(signature) = self
            .ctx
            .type_symbol(callee)
            .filter(|t| t.mode == TypeMode::Function)
            .cloned()
        else {
            self.ctx.report(SemanticError::NonCallableType {
                ty: self.ctx.type_name(callee),
                span: expr.callee.span(),
            });
            return None;
        };

        if let Some(arguments) = arguments.into_iter().collect::<Option<Vec<_>>>() {
            if arguments != signature.parameter_types {
                let names: Vec<String> = arguments.iter().map(|a| self.ctx.type_name(*a)).collect();
                self.ctx.report(SemanticError::InvalidCall {
                    callee: self.ctx.type_name(callee),
                    arguments: names.join(", "),
                    span: expr.span,
                });
            }
        }
        signature.return_type
    }

    fn cast(&mut self, expr: &'ast CastExpr) -> Option<SymbolId> {
        let from = self.expression(NodeRef::from(expr.operand.as_ref()));
        let to = self.ctx.annotations.declared_type(expr.target.id);
        let (from, to) = (from?, to?);

        let ctx = &*self.ctx;
        let is_value = |id| matches!(ctx.mode(id), Some(TypeMode::Primitive | TypeMode::Class));
        let invalid = ctx.is_function_type(from)
            || ctx.is_function_type(to)
            || (ctx.is_pointer(from)
                && is_value(to)
                && !ctx.is_builtin(to, BOOLEAN)
                && !ctx.is_integer(to))
            || (is_value(from) && !ctx.is_integer(from) && ctx.is_pointer(to));

        if invalid {
            self.ctx.report(SemanticError::InvalidCast {
                from: self.ctx.type_name(from),
                to: self.ctx.type_name(to),
                span: expr.span,
            });
            return None;
        }
        Some(to)
    }

    fn index(&mut self, expr: &'ast IndexExpr) -> Option<SymbolId> {
        let target = self.expression(NodeRef::from(expr.target.as_ref()));
        let index = self.expression(NodeRef::from(expr.index.as_ref()));
        let (target, index) = (target?, index?);

        match self.ctx.pointee(target) {
            Some(pointee) if self.ctx.is_integer(index) => Some(pointee),
            _ => {
                self.ctx.report(SemanticError::InvalidIndexer {
                    target: self.ctx.type_name(target),
                    index: self.ctx.type_name(index),
                    span: expr.span,
                });
                None
            }
        }
    }
}
