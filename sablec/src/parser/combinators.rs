//!
//! Base Combinators for Token Parsing
//!
//! Reusable nom combinators for matching tokens, keywords, symbols and
//! identifiers.
//!
//! Every grammar rule answers in one of three ways:
//! - `Ok`: matched, with the remaining input
//! - `nom::Err::Error`: no match, nothing consumed; callers may try another rule
//! - `nom::Err::Failure`: a required piece is missing; the whole parse aborts
//!
//! `token`, `keyword`, `symbol` and `identifier` only ever answer "no match".
//! `expect` and `required` turn a miss into a failure.
//!

use nom::error::{ErrorKind, ParseError};
use nom::{IResult, InputTake};

use crate::ast::Ident;
use crate::lexer::{Keyword, Symbol, Token, TokenKind};

use super::input::TokenStream;

pub type PResult<'a, O> = IResult<TokenStream<'a>, O, PError<'a>>;

#[derive(Debug, Clone)]
pub struct PError<'a> {
    pub input: TokenStream<'a>,
    pub kind: PErrorKind,
}

impl<'a> PError<'a> {
    pub fn new(input: TokenStream<'a>, kind: PErrorKind) -> Self {
        Self { input, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PErrorKind {
    Expected(TokenKind),
    ExpectedIdentifier,
    ExpectedExpression,
    ExpectedType,
    ExpectedScope,
    ExpectedDeclaration,
    InvalidLiteral,
    Nom(ErrorKind),
}

impl PErrorKind {
    pub fn describe(&self) -> String {
        match self {
            PErrorKind::Expected(kind) => kind.to_string(),
            PErrorKind::ExpectedIdentifier => "identifier".to_string(),
            PErrorKind::ExpectedExpression => "expression".to_string(),
            PErrorKind::ExpectedType => "type".to_string(),
            PErrorKind::ExpectedScope => "'{'".to_string(),
            PErrorKind::ExpectedDeclaration => "class, function or variable declaration".to_string(),
            PErrorKind::InvalidLiteral => "valid literal".to_string(),
            PErrorKind::Nom(kind) => format!("{:?}", kind),
        }
    }
}

impl<'a> ParseError<TokenStream<'a>> for PError<'a> {
    fn from_error_kind(input: TokenStream<'a>, kind: ErrorKind) -> Self {
        PError {
            input,
            kind: PErrorKind::Nom(kind),
        }
    }

    fn append(_input: TokenStream<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

fn no_match<'a, O>(input: TokenStream<'a>, kind: PErrorKind) -> PResult<'a, O> {
    Err(nom::Err::Error(PError::new(input, kind)))
}

pub fn token(kind: TokenKind) -> impl Fn(TokenStream) -> PResult<Token> {
    move |input: TokenStream| match input.first() {
        Some(tok) if tok.kind == kind => {
            let (rest, _) = input.take_split(1);
            Ok((rest, *tok))
        }
        _ => no_match(input, PErrorKind::Expected(kind)),
    }
}

pub fn keyword(kw: Keyword) -> impl Fn(TokenStream) -> PResult<Token> {
    token(TokenKind::Keyword(kw))
}

pub fn symbol(sym: Symbol) -> impl Fn(TokenStream) -> PResult<Token> {
    token(TokenKind::Symbol(sym))
}

pub fn identifier(input: TokenStream) -> PResult<Ident> {
    match input.first() {
        Some(tok) if tok.kind == TokenKind::Identifier => match tok.symbol {
            Some(symbol) => {
                let (rest, _) = input.take_split(1);
                Ok((rest, Ident::new(symbol, tok.span)))
            }
            None => no_match(input, PErrorKind::ExpectedIdentifier),
        },
        _ => no_match(input, PErrorKind::ExpectedIdentifier),
    }
}

/// Like `token`, but a missing token aborts the parse.
pub fn expect(kind: TokenKind) -> impl Fn(TokenStream) -> PResult<Token> {
    move |input: TokenStream| match token(kind)(input) {
        Err(nom::Err::Error(e)) => Err(nom::Err::Failure(e)),
        other => other,
    }
}

pub fn expect_symbol(sym: Symbol) -> impl Fn(TokenStream) -> PResult<Token> {
    expect(TokenKind::Symbol(sym))
}

/// Runs `parser`; a "no match" becomes a failure of `kind` at the point
/// where the rule was attempted.
pub fn required<'a, O, F>(mut parser: F, kind: PErrorKind) -> impl FnMut(TokenStream<'a>) -> PResult<'a, O>
where
    F: FnMut(TokenStream<'a>) -> PResult<'a, O>,
{
    move |input: TokenStream<'a>| match parser(input) {
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(PError::new(input, kind.clone()))),
        other => other,
    }
}

/// `element (',' element)*`, or nothing. A comma must be followed by another
/// element; a dangling comma fails with `kind`.
pub fn comma_list<'a, O, F>(mut element: F, kind: PErrorKind) -> impl FnMut(TokenStream<'a>) -> PResult<'a, Vec<O>>
where
    F: FnMut(TokenStream<'a>) -> PResult<'a, O>,
{
    move |input: TokenStream<'a>| {
        let (mut rest, first) = match element(input) {
            Ok(ok) => ok,
            Err(nom::Err::Error(_)) => return Ok((input, Vec::new())),
            Err(e) => return Err(e),
        };
        let mut items = vec![first];
        while let Ok((next, _)) = symbol(Symbol::Comma)(rest) {
            let (next, item) = required(&mut element, kind.clone())(next)?;
            items.push(item);
            rest = next;
        }
        Ok((rest, items))
    }
}

pub fn peek_token(input: TokenStream) -> Option<TokenKind> {
    input.first().map(|t| t.kind)
}

pub fn check(kind: TokenKind) -> impl Fn(TokenStream) -> bool {
    move |input: TokenStream| input.first().map(|t| t.kind == kind).unwrap_or(false)
}

pub fn is_eof(input: TokenStream) -> bool {
    input.is_empty() || input.first().map(|t| t.kind == TokenKind::Eof).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeIds;
    use crate::lexer::tokenize;

    fn significant(source: &str) -> Vec<Token> {
        let (tokens, _) = tokenize(source);
        tokens.into_iter().filter(|t| !t.is_trivia()).collect()
    }

    #[test]
    fn test_token_no_match_consumes_nothing() {
        let tokens = significant("x ;");
        let ids = NodeIds::new();
        let input = TokenStream::new(&tokens, "x ;", &ids);
        match symbol(Symbol::Semicolon)(input) {
            Err(nom::Err::Error(e)) => assert_eq!(e.input.start, 0),
            other => panic!("expected no match, got {:?}", other.map(|(_, t)| t)),
        }
        let (rest, ident) = identifier(input).unwrap();
        assert_eq!(ident.span.start, 0);
        assert!(check(TokenKind::Symbol(Symbol::Semicolon))(rest));
    }

    #[test]
    fn test_expect_is_fatal() {
        let tokens = significant("x");
        let ids = NodeIds::new();
        let input = TokenStream::new(&tokens, "x", &ids);
        assert!(matches!(
            expect_symbol(Symbol::Colon)(input),
            Err(nom::Err::Failure(PError { kind: PErrorKind::Expected(_), .. }))
        ));
    }

    #[test]
    fn test_comma_list_rejects_dangling_comma() {
        let source = "a, b,";
        let tokens = significant(source);
        let ids = NodeIds::new();
        let input = TokenStream::new(&tokens, source, &ids);
        let result = comma_list(identifier, PErrorKind::ExpectedIdentifier)(input);
        assert!(matches!(
            result,
            Err(nom::Err::Failure(PError { kind: PErrorKind::ExpectedIdentifier, .. }))
        ));

        let source = "a, b";
        let tokens = significant(source);
        let input = TokenStream::new(&tokens, source, &ids);
        let (rest, items) = comma_list(identifier, PErrorKind::ExpectedIdentifier)(input).unwrap();
        assert_eq!(items.len(), 2);
        assert!(is_eof(rest));
    }
}
