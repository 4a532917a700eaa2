///
/// Type Parser
///
/// A written type is a name followed by zero or more `*`:
///   Integer, Byte*, Node**
///

use crate::ast::TypeNode;
use crate::lexer::Symbol;

use super::combinators::*;
use super::input::TokenStream;

pub fn parse_type(input: TokenStream) -> PResult<TypeNode> {
    let (mut rest, name) = identifier(input)?;
    let mut pointer_depth = 0;
    while let Ok((next, _)) = symbol(Symbol::Star)(rest) {
        pointer_depth += 1;
        rest = next;
    }

    Ok((
        rest,
        TypeNode {
            id: input.fresh_id(),
            name,
            pointer_depth,
            span: rest.span_since(&input),
        },
    ))
}

/// `':' Type`. No match without the colon; a colon without a type fails.
pub fn type_annotation(input: TokenStream) -> PResult<TypeNode> {
    let (rest, _) = symbol(Symbol::Colon)(input)?;
    required(parse_type, PErrorKind::ExpectedType)(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeIds;
    use crate::lexer::{tokenize, Token};

    fn with_input<T>(source: &str, f: impl FnOnce(TokenStream) -> T) -> T {
        let (tokens, _) = tokenize(source);
        let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();
        let ids = NodeIds::new();
        f(TokenStream::new(&tokens, source, &ids))
    }

    #[test]
    fn test_parse_pointer_type() {
        with_input("Integer**", |input| {
            let (_, ty) = parse_type(input).unwrap();
            assert_eq!(ty.pointer_depth, 2);
            assert_eq!((ty.span.start, ty.span.end), (0, 9));
        });
    }

    #[test]
    fn test_annotation_requires_type() {
        with_input(": 5", |input| {
            assert!(matches!(
                type_annotation(input),
                Err(nom::Err::Failure(PError { kind: PErrorKind::ExpectedType, .. }))
            ));
        });
        with_input("Integer", |input| {
            assert!(matches!(type_annotation(input), Err(nom::Err::Error(_))));
        });
    }
}
