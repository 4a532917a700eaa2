///
/// Parser Module - nom-based Token Parsing
///
/// This module provides the parser for the sable language. It uses nom
/// parser combinators to turn a token sequence into an AST.
///
/// The parser is structured as follows:
/// - input: TokenStream type for nom integration
/// - combinators: Reusable token-matching combinators
/// - error: ParseError, the single fatal failure a parse can end with
/// - types: Written types (`Name*...`)
/// - expressions: Precedence ladder, unary, postfix and value rules
/// - statements: Scopes and statements
/// - declarations: The top-level block, classes, functions, variables
///
/// Entry points: `parse()` for a whole unit (returns the root Block) and
/// `parse_expression()` for a lone expression. Both drop trivia tokens first.
///

mod combinators;
mod declarations;
mod error;
mod expressions;
mod input;
mod statements;
mod types;

pub use combinators::{PError, PErrorKind};
pub use error::{ParseError, ParseResult};
pub use input::TokenStream;

use tracing::debug;

use crate::ast::{Block, Expression, NodeIds};
use crate::lexer::Token;

use combinators::is_eof;

fn significant(tokens: &[Token]) -> Vec<Token> {
    tokens.iter().filter(|t| !t.is_trivia()).copied().collect()
}

fn finish<'a, O>(result: combinators::PResult<'a, O>) -> ParseResult<(TokenStream<'a>, O)> {
    match result {
        Ok(ok) => Ok(ok),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::from(e)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::premature_end("more input", Default::default())),
    }
}

pub fn parse(tokens: &[Token], source: &str) -> ParseResult<Block> {
    let tokens = significant(tokens);
    let ids = NodeIds::new();
    let input = TokenStream::new(&tokens, source, &ids);

    debug!(tokens = tokens.len(), "parsing unit");
    let (_, block) = finish(declarations::parse_block(input))?;
    debug!(declarations = block.declarations.len(), nodes = ids.allocated(), "parsed unit");
    Ok(block)
}

pub fn parse_expression(tokens: &[Token], source: &str) -> ParseResult<Expression> {
    let tokens = significant(tokens);
    let ids = NodeIds::new();
    let input = TokenStream::new(&tokens, source, &ids);

    let (rest, expr) = finish(combinators::required(
        expressions::parse_expression,
        PErrorKind::ExpectedExpression,
    )(input))?;
    if !is_eof(rest) {
        let found = rest.first().map(|t| t.kind).unwrap_or(crate::lexer::TokenKind::Eof);
        return Err(ParseError::unexpected("end of input", found, rest.current_span()));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Statement};
    use crate::lexer::tokenize;

    fn parse_str(source: &str) -> ParseResult<Block> {
        let (tokens, _interner) = tokenize(source);
        parse(&tokens, source)
    }

    #[test]
    fn test_parse_program() {
        let source = r#"
            class Node {
                var value : Integer;
                var next : Node*;
            }

            fn length(head : Node*) : Integer {
                var count : Integer = 0;
                while (head) {
                    count += 1;
                    head = head->next;
                }
                return count;
            }

            var name : Byte* = "sable";
        "#;
        let block = parse_str(source).unwrap();
        assert_eq!(block.declarations.len(), 3);
        let Declaration::Function(f) = &block.declarations[1] else {
            panic!("expected function");
        };
        assert!(matches!(f.body.statements[1], Statement::While(_)));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let block = parse_str("fn f(a : Integer) { a = a + 1; }").unwrap();
        let parents = crate::ast::ParentMap::build(crate::ast::NodeRef::Block(&block));
        // Block, Function, Parameter, Type, Scope, `=`, `a`, `+`, `a`, `1`.
        assert_eq!(parents.len(), 10);
    }

    #[test]
    fn test_unrecognized_token_is_rejected() {
        let result = parse_str("var s : Byte* = \"open;");
        assert!(matches!(result, Err(ParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_error_span_points_at_offender() {
        let source = "fn f() { return 1 }";
        let err = parse_str(source).unwrap_err();
        assert_eq!(&source[err.span().start as usize..err.span().end as usize], "}");
    }
}
