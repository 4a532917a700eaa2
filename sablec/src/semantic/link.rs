//!
//! Phase 1: Parent Linking
//!
//! Builds the parent map for the whole tree and predeclares every class as a
//! global Type, so later phases can name a class before its declaration.
//!

use crate::ast::{walk, Block, ClassDecl, FunctionDecl, NodeRef, ParentMap, VariableDecl, VisitResult, Visitor};

use super::context::AnalysisContext;

pub fn link<'ast>(ctx: &mut AnalysisContext<'_, 'ast>, root: &'ast Block) {
    ctx.parents = ParentMap::build(NodeRef::Block(root));
    let mut pass = ClassPredeclarer { ctx };
    walk(&mut pass, NodeRef::Block(root), true);
}

struct ClassPredeclarer<'c, 'a, 'ast> {
    ctx: &'c mut AnalysisContext<'a, 'ast>,
}

impl<'ast> Visitor<'ast> for ClassPredeclarer<'_, '_, 'ast> {
    fn visit_class(&mut self, node: &'ast ClassDecl) -> VisitResult {
        let name = self.ctx.name(node.name);
        match self.ctx.library.create_type(name, false, node.name.span) {
            Ok(id) => {
                self.ctx.library.set_declaration(id, node.id);
                // A redeclared class keeps its own type so its members are
                // still bound and checked.
                self.ctx.annotations.set_symbol(node.id, id);
                self.ctx.declare_global(name, id, node.name.span);
            }
            Err(err) => self.ctx.report(err),
        }
        VisitResult::Stop
    }

    // Classes are only declared at the top level.
    fn visit_function(&mut self, _node: &'ast FunctionDecl) -> VisitResult {
        VisitResult::Stop
    }

    fn visit_variable(&mut self, _node: &'ast VariableDecl) -> VisitResult {
        VisitResult::Stop
    }
}
