//!
//! Phase 2: Declared-Type Resolution
//!
//! Resolves every written Type node to a Type symbol (the base name through
//! the global map, then one interned pointer level per `*`) and builds the
//! signature type of each function from its resolved parameter and return
//! types. A function without a written return type returns Void.
//!

use std::collections::HashSet;

use crate::ast::{walk, Block, FunctionDecl, NodeId, NodeRef, TypeNode, VisitResult, Visitor};

use super::context::AnalysisContext;
use super::error::SemanticError;
use super::library::VOID;
use super::symbols::SymbolId;

pub fn resolve<'ast>(ctx: &mut AnalysisContext<'_, 'ast>, root: &'ast Block) {
    let mut pass = TypeResolver {
        ctx,
        attempted: HashSet::new(),
    };
    walk(&mut pass, NodeRef::Block(root), true);
}

struct TypeResolver<'c, 'a, 'ast> {
    ctx: &'c mut AnalysisContext<'a, 'ast>,
    attempted: HashSet<NodeId>,
}

impl TypeResolver<'_, '_, '_> {
    /// Each Type node is resolved (and reported) at most once.
    fn resolve_type(&mut self, node: &TypeNode) -> Option<SymbolId> {
        if !self.attempted.insert(node.id) {
            return self.ctx.annotations.declared_type(node.id);
        }

        let name = self.ctx.name(node.name);
        let Some(base) = self.ctx.global_type(name) else {
            self.ctx.report(SemanticError::not_found(name, node.name.span));
            return None;
        };
        let ty = self.ctx.library.get_pointer_type(base, node.pointer_depth);
        self.ctx.annotations.set_declared_type(node.id, ty);
        Some(ty)
    }
}

impl<'ast> Visitor<'ast> for TypeResolver<'_, '_, 'ast> {
    fn visit_type(&mut self, node: &'ast TypeNode) -> VisitResult {
        self.resolve_type(node);
        VisitResult::Continue
    }

    fn visit_function(&mut self, node: &'ast FunctionDecl) -> VisitResult {
        let parameters: Vec<Option<SymbolId>> =
            node.parameters.iter().map(|p| self.resolve_type(&p.ty)).collect();
        let return_type = match &node.return_type {
            Some(ty) => self.resolve_type(ty),
            None => self.ctx.builtin(VOID, node.name.span),
        };

        let parameters: Option<Vec<SymbolId>> = parameters.into_iter().collect();
        if let (Some(parameters), Some(return_type)) = (parameters, return_type) {
            let signature = self.ctx.function_type(&parameters, return_type);
            self.ctx.annotations.set_signature(node.id, signature);
        }
        VisitResult::Continue
    }
}
