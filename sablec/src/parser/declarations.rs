//!
//! Declaration Parser
//!
//! Handles the top-level block and the declarations it contains:
//! - Class: `class Name { (var ...; | fn ...)* }`
//! - Function: `fn name(p : T, ...) (: T)? { ... }`
//! - Variable: `var name : T (= expr)?` (the `;` belongs to the caller)
//!

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{preceded, terminated};

use crate::ast::*;
use crate::lexer::{Keyword, Symbol, TokenKind};

use super::combinators::*;
use super::expressions::parse_expression;
use super::input::TokenStream;
use super::statements::parse_scope;
use super::types::type_annotation;

pub fn parse_block(input: TokenStream) -> PResult<Block> {
    let mut rest = input;
    let mut declarations = Vec::new();

    while !is_eof(rest) {
        let (next, decl) = required(parse_declaration, PErrorKind::ExpectedDeclaration)(rest)?;
        declarations.push(decl);
        rest = next;
    }

    Ok((
        rest,
        Block {
            id: input.fresh_id(),
            declarations,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_declaration(input: TokenStream) -> PResult<Declaration> {
    alt((
        map(parse_class, Declaration::Class),
        map(parse_function, Declaration::Function),
        map(terminated(parse_var, expect_symbol(Symbol::Semicolon)), Declaration::Variable),
    ))(input)
}

pub fn parse_class(input: TokenStream) -> PResult<ClassDecl> {
    let (rest, _) = keyword(Keyword::Class)(input)?;
    let (rest, name) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    let (rest, _) = expect_symbol(Symbol::OpenBrace)(rest)?;
    let (rest, members) = many0(alt((
        map(terminated(parse_var, expect_symbol(Symbol::Semicolon)), Member::Variable),
        map(parse_function, Member::Function),
    )))(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseBrace)(rest)?;

    Ok((
        rest,
        ClassDecl {
            id: input.fresh_id(),
            name,
            members,
            span: rest.span_since(&input),
        },
    ))
}

pub fn parse_function(input: TokenStream) -> PResult<FunctionDecl> {
    let (rest, _) = keyword(Keyword::Function)(input)?;
    let (rest, name) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    let (rest, _) = expect_symbol(Symbol::OpenParen)(rest)?;
    let (rest, parameters) = comma_list(parse_parameter, PErrorKind::ExpectedIdentifier)(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseParen)(rest)?;
    let (rest, return_type) = opt(type_annotation)(rest)?;
    let (rest, body) = required(parse_scope, PErrorKind::ExpectedScope)(rest)?;

    Ok((
        rest,
        FunctionDecl {
            id: input.fresh_id(),
            name,
            parameters,
            return_type,
            body,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_parameter(input: TokenStream) -> PResult<Parameter> {
    let (rest, name) = identifier(input)?;
    let (rest, ty) = required(
        type_annotation,
        PErrorKind::Expected(TokenKind::Symbol(Symbol::Colon)),
    )(rest)?;

    Ok((
        rest,
        Parameter {
            id: input.fresh_id(),
            name,
            ty,
            span: rest.span_since(&input),
        },
    ))
}

pub fn parse_var(input: TokenStream) -> PResult<VariableDecl> {
    let (rest, _) = keyword(Keyword::Var)(input)?;
    let (rest, name) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    let (rest, ty) = required(
        type_annotation,
        PErrorKind::Expected(TokenKind::Symbol(Symbol::Colon)),
    )(rest)?;
    let (rest, initializer) = opt(preceded(
        symbol(Symbol::Assign),
        required(parse_expression, PErrorKind::ExpectedExpression),
    ))(rest)?;

    Ok((
        rest,
        VariableDecl {
            id: input.fresh_id(),
            name,
            ty,
            initializer,
            span: rest.span_since(&input),
        },
    ))
}
