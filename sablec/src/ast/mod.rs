///
/// Abstract Syntax Tree Module
///
/// This module defines the complete AST for the sable language. The AST is
/// the representation produced by the parser and consumed by the semantic
/// analyzer.
///
/// Module structure:
/// - types: Node identity, identifiers and written types
/// - operators: Binary, unary and member access operators
/// - expressions: All expression node types
/// - statements: All statement node types and `Scope`
/// - declarations: Classes, functions, parameters and variables
/// - visitor: Borrowed node view, visitor trait and walk
/// - parents: Parent links built by a separate pass
/// - printer: Indented outline rendering
///
/// The root AST node is Block, the top-level declarations of one source file.
///

pub mod declarations;
pub mod expressions;
pub mod operators;
pub mod parents;
pub mod printer;
pub mod statements;
pub mod types;
pub mod visitor;

pub use declarations::*;
pub use expressions::*;
pub use operators::*;
pub use parents::ParentMap;
pub use printer::print_tree;
pub use statements::*;
pub use types::*;
pub use visitor::*;

use crate::source::{Span, Spanned};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Block {
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Class(c) => Some(c),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn test_block_iterators() {
        let source = "class A { } fn f() { } fn g() { } var x : Integer;";
        let (tokens, _) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        assert_eq!(block.classes().count(), 1);
        assert_eq!(block.functions().count(), 2);
        assert_eq!(block.declarations.len(), 4);
    }
}
