//!
//! Phase 3: Declaration Binding
//!
//! Creates the Symbol of every variable, parameter, function and label and
//! registers it where it is visible:
//! - the global map when no Class or Function encloses it
//! - the nearest Function's locals (unique across the whole function)
//! - the nearest Class's member set
//!
//! A function registers after its body has been bound; its parameters go
//! into its locals first, in declaration order.
//!

use crate::ast::{Block, ClassDecl, FunctionDecl, LabelStmt, NodeRef, Parameter, VariableDecl};
use crate::source::Span;

use super::context::AnalysisContext;
use super::scope::ScopeKind;
use super::symbols::SymbolId;

pub fn bind<'ast>(ctx: &mut AnalysisContext<'_, 'ast>, root: &'ast Block) {
    let mut binder = Binder { ctx };
    binder.node(NodeRef::Block(root));
}

struct Binder<'c, 'a, 'ast> {
    ctx: &'c mut AnalysisContext<'a, 'ast>,
}

impl<'ast> Binder<'_, '_, 'ast> {
    fn node(&mut self, node: NodeRef<'ast>) {
        match node {
            NodeRef::Class(class) => self.class(class),
            NodeRef::Function(function) => self.function(function),
            NodeRef::Variable(variable) => self.variable(variable),
            NodeRef::Label(label) => self.label(label),
            NodeRef::Scope(scope) => {
                self.ctx.scopes.push(ScopeKind::Block, scope.id, None);
                self.children(node);
                self.ctx.scopes.pop();
            }
            // Nothing else declares a name.
            other => self.children(other),
        }
    }

    fn children(&mut self, node: NodeRef<'ast>) {
        for child in node.children() {
            self.node(child);
        }
    }

    fn class(&mut self, class: &'ast ClassDecl) {
        let symbol = self.ctx.annotations.symbol(class.id);
        self.ctx.scopes.push(ScopeKind::Class, class.id, symbol);
        self.children(NodeRef::Class(class));
        self.ctx.scopes.pop();
    }

    fn function(&mut self, function: &'ast FunctionDecl) {
        let name = self.ctx.name(function.name);
        let id = self.ctx.library.create_function(name, function.name.span);
        self.ctx.library.set_declaration(id, function.id);
        if let Some(signature) = self.ctx.annotations.signature(function.id) {
            self.ctx.library.set_type(id, signature);
        }
        self.ctx.annotations.set_symbol(function.id, id);

        self.ctx.scopes.push(ScopeKind::Function, function.id, Some(id));
        for parameter in &function.parameters {
            self.parameter(parameter, id);
        }
        self.node(NodeRef::Scope(&function.body));
        self.ctx.scopes.pop();

        self.register(name, id, function.name.span);
    }

    fn parameter(&mut self, parameter: &'ast Parameter, function: SymbolId) {
        let name = self.ctx.name(parameter.name);
        let id = self.ctx.library.create_variable(name, parameter.name.span, true);
        self.ctx.library.set_declaration(id, parameter.id);
        if let Some(ty) = self.ctx.annotations.declared_type(parameter.ty.id) {
            self.ctx.library.set_type(id, ty);
        }
        self.ctx.annotations.set_symbol(parameter.id, id);

        if let Err(err) = self.ctx.library.add_local(function, id) {
            self.ctx.report(err);
        }
    }

    fn variable(&mut self, variable: &'ast VariableDecl) {
        let name = self.ctx.name(variable.name);
        let id = self.ctx.library.create_variable(name, variable.name.span, false);
        self.ctx.library.set_declaration(id, variable.id);
        if let Some(ty) = self.ctx.annotations.declared_type(variable.ty.id) {
            self.ctx.library.set_type(id, ty);
        }
        self.ctx.annotations.set_symbol(variable.id, id);

        self.register(name, id, variable.name.span);
    }

    fn label(&mut self, label: &'ast LabelStmt) {
        let name = self.ctx.name(label.name);
        let id = self.ctx.library.create_label(name, label.name.span);
        self.ctx.library.set_declaration(id, label.id);
        self.ctx.annotations.set_symbol(label.id, id);

        match self.ctx.scopes.nearest_function() {
            Some(function) => {
                if let Err(err) = self.ctx.library.add_label(function, id) {
                    self.ctx.report(err);
                }
            }
            None => self.register(name, id, label.name.span),
        }
    }

    fn register(&mut self, name: &str, id: SymbolId, span: Span) {
        let target = self
            .ctx
            .scopes
            .registration_target()
            .map(|entry| (entry.kind, entry.symbol));

        let result = match target {
            None => {
                self.ctx.declare_global(name, id, span);
                Ok(())
            }
            Some((ScopeKind::Function, Some(function))) => self.ctx.library.add_local(function, id),
            Some((ScopeKind::Class, Some(class))) => self.ctx.library.add_member(class, id),
            // The owner failed to bind and was already reported.
            Some(_) => Ok(()),
        };
        if let Err(err) = result {
            self.ctx.report(err);
        }
    }
}
