///
/// Statement Parser
///
/// Free statements (if, while, for) end with their own scope. Everything
/// else is a delimited statement and must be followed by `;`.
///

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{preceded, terminated};

use crate::ast::*;
use crate::lexer::{Keyword, Symbol};

use super::combinators::*;
use super::declarations::parse_var;
use super::expressions::parse_expression;
use super::input::TokenStream;

pub fn parse_scope(input: TokenStream) -> PResult<Scope> {
    let (rest, _) = symbol(Symbol::OpenBrace)(input)?;
    let (rest, statements) = many0(parse_statement)(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseBrace)(rest)?;

    Ok((
        rest,
        Scope {
            id: input.fresh_id(),
            statements,
            span: rest.span_since(&input),
        },
    ))
}

pub fn parse_statement(input: TokenStream) -> PResult<Statement> {
    alt((
        map(parse_if, Statement::If),
        map(parse_while, Statement::While),
        map(parse_for, Statement::For),
        terminated(parse_delimited, expect_symbol(Symbol::Semicolon)),
    ))(input)
}

fn parse_delimited(input: TokenStream) -> PResult<Statement> {
    alt((
        map(parse_label, Statement::Label),
        map(parse_goto, Statement::Goto),
        map(parse_return, Statement::Return),
        map(parse_break, Statement::Break),
        map(parse_continue, Statement::Continue),
        map(parse_var, Statement::Variable),
        map(parse_expression, Statement::Expression),
    ))(input)
}

fn parse_label(input: TokenStream) -> PResult<LabelStmt> {
    let (rest, _) = keyword(Keyword::Label)(input)?;
    let (rest, name) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    Ok((
        rest,
        LabelStmt {
            id: input.fresh_id(),
            name,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_goto(input: TokenStream) -> PResult<GotoStmt> {
    let (rest, _) = keyword(Keyword::Goto)(input)?;
    let (rest, label) = required(identifier, PErrorKind::ExpectedIdentifier)(rest)?;
    Ok((
        rest,
        GotoStmt {
            id: input.fresh_id(),
            label,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_return(input: TokenStream) -> PResult<ReturnStmt> {
    let (rest, _) = keyword(Keyword::Return)(input)?;
    let (rest, value) = opt(parse_expression)(rest)?;
    Ok((
        rest,
        ReturnStmt {
            id: input.fresh_id(),
            value,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_break(input: TokenStream) -> PResult<BreakStmt> {
    let (rest, tok) = keyword(Keyword::Break)(input)?;
    Ok((rest, BreakStmt { id: input.fresh_id(), span: tok.span }))
}

fn parse_continue(input: TokenStream) -> PResult<ContinueStmt> {
    let (rest, tok) = keyword(Keyword::Continue)(input)?;
    Ok((rest, ContinueStmt { id: input.fresh_id(), span: tok.span }))
}

/// `'(' Expression ')'`, all of it required.
fn parse_condition(input: TokenStream) -> PResult<Expression> {
    let (rest, _) = expect_symbol(Symbol::OpenParen)(input)?;
    let (rest, condition) = required(parse_expression, PErrorKind::ExpectedExpression)(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseParen)(rest)?;
    Ok((rest, condition))
}

fn parse_if(input: TokenStream) -> PResult<IfStmt> {
    let (rest, _) = keyword(Keyword::If)(input)?;
    let (rest, condition) = parse_condition(rest)?;
    let (rest, then_scope) = required(parse_scope, PErrorKind::ExpectedScope)(rest)?;
    let (rest, else_branch) = opt(preceded(
        keyword(Keyword::Else),
        required(
            alt((
                map(parse_if, |next| ElseBranch::If(Box::new(next))),
                map(parse_scope, ElseBranch::Scope),
            )),
            PErrorKind::ExpectedScope,
        ),
    ))(rest)?;

    Ok((
        rest,
        IfStmt {
            id: input.fresh_id(),
            condition,
            then_scope,
            else_branch,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_while(input: TokenStream) -> PResult<WhileStmt> {
    let (rest, _) = keyword(Keyword::While)(input)?;
    let (rest, condition) = parse_condition(rest)?;
    let (rest, body) = required(parse_scope, PErrorKind::ExpectedScope)(rest)?;

    Ok((
        rest,
        WhileStmt {
            id: input.fresh_id(),
            condition,
            body,
            span: rest.span_since(&input),
        },
    ))
}

fn parse_for(input: TokenStream) -> PResult<ForStmt> {
    let (rest, _) = keyword(Keyword::For)(input)?;
    let (rest, _) = expect_symbol(Symbol::OpenParen)(rest)?;
    let (rest, initializer) = opt(alt((
        map(parse_var, ForInit::Variable),
        map(parse_expression, ForInit::Expression),
    )))(rest)?;
    let (rest, _) = expect_symbol(Symbol::Semicolon)(rest)?;
    let (rest, condition) = opt(parse_expression)(rest)?;
    let (rest, _) = expect_symbol(Symbol::Semicolon)(rest)?;
    let (rest, step) = opt(parse_expression)(rest)?;
    let (rest, _) = expect_symbol(Symbol::CloseParen)(rest)?;
    let (rest, body) = required(parse_scope, PErrorKind::ExpectedScope)(rest)?;

    Ok((
        rest,
        ForStmt {
            id: input.fresh_id(),
            initializer,
            condition,
            step,
            body,
            span: rest.span_since(&input),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::{parse, ParseError};

    fn body(source: &str) -> Vec<Statement> {
        let wrapped = format!("fn f() {{ {} }}", source);
        let (tokens, _) = tokenize(&wrapped);
        let block = parse(&tokens, &wrapped).unwrap();
        match block.declarations.into_iter().next() {
            Some(Declaration::Function(f)) => f.body.statements,
            other => panic!("expected function, got {:?}", other),
        }
    }

    fn body_err(source: &str) -> ParseError {
        let wrapped = format!("fn f() {{ {} }}", source);
        let (tokens, _) = tokenize(&wrapped);
        parse(&tokens, &wrapped).unwrap_err()
    }

    #[test]
    fn test_delimited_statements() {
        let stmts = body("label top; goto top; return; return 1; break; continue; var x : Integer; x = 1;");
        assert_eq!(stmts.len(), 8);
        assert!(matches!(stmts[0], Statement::Label(_)));
        assert!(matches!(stmts[1], Statement::Goto(_)));
        assert!(matches!(stmts[2], Statement::Return(ReturnStmt { value: None, .. })));
        assert!(matches!(stmts[3], Statement::Return(ReturnStmt { value: Some(_), .. })));
        assert!(matches!(stmts[4], Statement::Break(_)));
        assert!(matches!(stmts[5], Statement::Continue(_)));
        assert!(matches!(stmts[6], Statement::Variable(_)));
        assert!(matches!(stmts[7], Statement::Expression(_)));
    }

    #[test]
    fn test_missing_semicolon_is_fatal() {
        match body_err("return 1") {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, "';'"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_if_else_chain() {
        let stmts = body("if (a) { } else if (b) { } else { x; }");
        let Statement::If(first) = &stmts[0] else {
            panic!("expected if");
        };
        let Some(ElseBranch::If(second)) = &first.else_branch else {
            panic!("expected else if");
        };
        assert!(matches!(&second.else_branch, Some(ElseBranch::Scope(s)) if s.statements.len() == 1));
    }

    #[test]
    fn test_if_requires_scope() {
        assert!(matches!(body_err("if (a) x;"), ParseError::UnexpectedToken { .. }));
        assert!(matches!(body_err("if (a) { } else x;"), ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_while_and_for() {
        let stmts = body("while (i < 10) { i += 1; } for (var i : Integer = 0; i < 3; ++i) { } for (;;) { }");
        assert!(matches!(stmts[0], Statement::While(_)));
        let Statement::For(full) = &stmts[1] else {
            panic!("expected for");
        };
        assert!(matches!(full.initializer, Some(ForInit::Variable(_))));
        assert!(full.condition.is_some() && full.step.is_some());
        let Statement::For(empty) = &stmts[2] else {
            panic!("expected for");
        };
        assert!(empty.initializer.is_none() && empty.condition.is_none() && empty.step.is_none());
    }

    #[test]
    fn test_nested_scopes_are_not_statements() {
        // A bare `{` is neither a free nor a delimited statement.
        assert!(matches!(body_err("{ }"), ParseError::UnexpectedToken { .. }));
    }
}
