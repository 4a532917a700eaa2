///
/// Expression Parser
///
/// Parses expressions with a fixed precedence ladder:
///
///   assignment  = += -= *= /= %=     right-associative
///   1           ||                   left-associative
///   2           &&
///   3           < > <= >= == !=
///   4           + -
///   5           * / %
///   unary       * + - ++ -- ! &      prefix, nests right to left
///   postfix     . -> (args) as [ ]   chains left to right
///   value       literal | identifier | '(' expression ')'
///

use lasso::Spur;

use crate::ast::*;
use crate::lexer::{Keyword, Symbol, Token, TokenKind};
use crate::source::Spanned;
use nom::InputTake;

use super::combinators::*;
use super::input::TokenStream;
use super::types::parse_type;

pub fn parse_expression(input: TokenStream) -> PResult<Expression> {
    parse_assignment(input)
}

fn binary_operator(input: TokenStream) -> Option<(TokenStream, BinaryOp)> {
    let op = peek_token(input).and_then(BinaryOp::from_token)?;
    let (rest, _) = input.take_split(1);
    Some((rest, op))
}

fn binary(input: TokenStream, left: Expression, op: BinaryOp, right: Expression) -> Expression {
    let span = left.span().merge(right.span());
    Expression::Binary(BinaryExpr {
        id: input.fresh_id(),
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    })
}

fn parse_assignment(input: TokenStream) -> PResult<Expression> {
    let (rest, left) = parse_binary(input, 1)?;
    match binary_operator(rest) {
        Some((next, op)) if op.is_assignment() => {
            let (next, right) = required(parse_assignment, PErrorKind::ExpectedExpression)(next)?;
            Ok((next, binary(input, left, op, right)))
        }
        _ => Ok((rest, left)),
    }
}

fn parse_binary(input: TokenStream, level: u8) -> PResult<Expression> {
    if level > BinaryOp::MAX_PRECEDENCE {
        return parse_unary(input);
    }

    let (mut rest, mut left) = parse_binary(input, level + 1)?;
    while let Some((next, op)) = binary_operator(rest).filter(|(_, op)| op.precedence() == level) {
        let (next, right) =
            required(|i| parse_binary(i, level + 1), PErrorKind::ExpectedExpression)(next)?;
        left = binary(input, left, op, right);
        rest = next;
    }

    Ok((rest, left))
}

fn parse_unary(input: TokenStream) -> PResult<Expression> {
    let Some(op) = peek_token(input).and_then(UnaryOp::from_token) else {
        return parse_postfix(input);
    };

    let (rest, _) = input.take_split(1);
    let (rest, operand) = required(parse_unary, PErrorKind::ExpectedExpression)(rest)?;
    Ok((
        rest,
        Expression::Unary(UnaryExpr {
            id: input.fresh_id(),
            op,
            operand: Box::new(operand),
            span: rest.span_since(&input),
        }),
    ))
}

fn parse_postfix(input: TokenStream) -> PResult<Expression> {
    let (mut rest, mut expr) = parse_value(input)?;

    loop {
        let (next, wrapped) = match peek_token(rest) {
            Some(TokenKind::Symbol(Symbol::Dot)) => parse_member_access(rest, expr, AccessKind::Dot)?,
            Some(TokenKind::Symbol(Symbol::Arrow)) => parse_member_access(rest, expr, AccessKind::Arrow)?,
            Some(TokenKind::Symbol(Symbol::OpenParen)) => parse_call(rest, expr)?,
            Some(TokenKind::Keyword(Keyword::As)) => parse_cast(rest, expr)?,
            Some(TokenKind::Symbol(Symbol::OpenBracket)) => parse_index(rest, expr)?,
            _ => break,
        };
        rest = next;
        expr = wrapped;
    }

    Ok((rest, expr))
}

fn parse_member_access<'a>(
    input: TokenStream<'a>,
    object: Expression,
    access: AccessKind,
) -> PResult<'a, Expression> {
    let (rest, _) = input.take_split(1);
    let (rest, member) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    let span = object.span().merge(member.span);
    Ok((
        rest,
        Expression::MemberAccess(MemberAccessExpr {
            id: input.fresh_id(),
            object: Box::new(object),
            access,
            member,
            span,
        }),
    ))
}

fn parse_call<'a>(input: TokenStream<'a>, callee: Expression) -> PResult<'a, Expression> {
    let (rest, _) = symbol(Symbol::OpenParen)(input)?;
    let (rest, arguments) = comma_list(parse_expression, PErrorKind::ExpectedExpression)(rest)?;
    let (rest, close) = expect_symbol(Symbol::CloseParen)(rest)?;
    let span = callee.span().merge(close.span);
    Ok((
        rest,
        Expression::Call(CallExpr {
            id: input.fresh_id(),
            callee: Box::new(callee),
            arguments,
            span,
        }),
    ))
}

fn parse_cast<'a>(input: TokenStream<'a>, operand: Expression) -> PResult<'a, Expression> {
    let (rest, _) = keyword(Keyword::As)(input)?;
    let (rest, target) = required(parse_type, PErrorKind::ExpectedType)(rest)?;
    let span = operand.span().merge(target.span);
    Ok((
        rest,
        Expression::Cast(CastExpr {
            id: input.fresh_id(),
            operand: Box::new(operand),
            target,
            span,
        }),
    ))
}

fn parse_index<'a>(input: TokenStream<'a>, target: Expression) -> PResult<'a, Expression> {
    let (rest, _) = symbol(Symbol::OpenBracket)(input)?;
    let (rest, index) = required(parse_expression, PErrorKind::ExpectedExpression)(rest)?;
    let (rest, close) = expect_symbol(Symbol::CloseBracket)(rest)?;
    let span = target.span().merge(close.span);
    Ok((
        rest,
        Expression::Index(IndexExpr {
            id: input.fresh_id(),
            target: Box::new(target),
            index: Box::new(index),
            span,
        }),
    ))
}

fn parse_grouped(input: TokenStream) -> PResult<Expression> {
    let (rest, _) = symbol(Symbol::OpenParen)(input)?;
    let (rest, inner) = required(parse_expression, PErrorKind::ExpectedExpression)(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseParen)(rest)?;
    Ok((rest, inner))
}

fn invalid_literal<O>(input: TokenStream) -> PResult<O> {
    Err(nom::Err::Failure(PError::new(input, PErrorKind::InvalidLiteral)))
}

fn literal_symbol<'a>(input: TokenStream<'a>, tok: &Token) -> Result<Spur, nom::Err<PError<'a>>> {
    match tok.symbol {
        Some(symbol) => Ok(symbol),
        None => invalid_literal(input).map(|(_, s)| s),
    }
}

fn parse_value(input: TokenStream) -> PResult<Expression> {
    let Some(tok) = input.first() else {
        return Err(nom::Err::Error(PError::new(input, PErrorKind::ExpectedExpression)));
    };

    let value = match tok.kind {
        TokenKind::IntegerLiteral => match input.span_text(tok.span).parse::<i64>() {
            Ok(v) => Value::Integer(v),
            Err(_) => return invalid_literal(input),
        },
        TokenKind::FloatLiteral => {
            let text = input.span_text(tok.span);
            match text.strip_suffix('f').unwrap_or(text).parse::<f64>() {
                Ok(v) => Value::Float(v),
                Err(_) => return invalid_literal(input),
            }
        }
        TokenKind::CharacterLiteral => Value::Character(literal_symbol(input, tok)?),
        TokenKind::StringLiteral => Value::String(literal_symbol(input, tok)?),
        TokenKind::Keyword(Keyword::True) => Value::Boolean(true),
        TokenKind::Keyword(Keyword::False) => Value::Boolean(false),
        TokenKind::Keyword(Keyword::Null) => Value::Null,
        TokenKind::Identifier => {
            let (rest, ident) = identifier(input)?;
            return Ok((
                rest,
                Expression::Value(ValueExpr {
                    id: input.fresh_id(),
                    value: Value::Identifier(ident),
                    span: ident.span,
                }),
            ));
        }
        TokenKind::Symbol(Symbol::OpenParen) => return parse_grouped(input),
        _ => return Err(nom::Err::Error(PError::new(input, PErrorKind::ExpectedExpression))),
    };

    let (rest, _) = input.take_split(1);
    Ok((
        rest,
        Expression::Value(ValueExpr {
            id: input.fresh_id(),
            value,
            span: tok.span,
        }),
    ))
}
