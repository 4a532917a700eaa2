///
/// Front End Pipeline Integration Tests
///
/// Drives source strings through the public API: `tokenize` -> `parse` ->
/// `analyze` against the core library, and asserts on the token stream,
/// the tree shape, the populated Library and the reported errors.
///
/// Run all:  `cargo test --test pipeline`
///

use std::sync::Arc;

use sablec::ast::{Declaration, Expression, NodeRef, ParentMap, Value, ValueExpr};
use sablec::lexer::{Keyword, TokenKind};
use sablec::semantic::{Analysis, SemanticError, INTEGER};
use sablec::{analyze, parse, parse_expression, tokenize, Library};

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, _) = tokenize(source);
    tokens.iter().map(|t| t.kind).collect()
}

fn check(source: &str) -> Vec<SemanticError> {
    let (tokens, interner) = tokenize(source);
    let block = parse(&tokens, source).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e));
    let core = Arc::new(Library::core());
    let mut library = Library::new("unit");
    analyze(&block, &interner, &[core], &mut library).errors
}

// ── Lexing ──────────────────────────────────────────────────────────

#[test]
fn maximal_munch_literals() {
    let (tokens, _) = tokenize("123.45f");
    assert_eq!(tokens[0].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[0].text("123.45f"), "123.45f");

    let (tokens, _) = tokenize("123");
    assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[0].len(), 3);
}

#[test]
fn keyword_exactness() {
    assert_eq!(kinds("class")[0], TokenKind::Keyword(Keyword::Class));
    assert_eq!(kinds("classify")[0], TokenKind::Identifier);
}

#[test]
fn comment_termination() {
    assert_eq!(
        kinds("// a\nx"),
        vec![
            TokenKind::SingleLineComment,
            TokenKind::Whitespace,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

// ── Parsing ─────────────────────────────────────────────────────────

#[test]
fn global_variable_parses() {
    let source = "var x : Integer = 5;";
    let (tokens, _) = tokenize(source);
    let block = parse(&tokens, source).unwrap();
    assert_eq!(block.declarations.len(), 1);
    let Declaration::Variable(var) = &block.declarations[0] else {
        panic!("expected variable");
    };
    assert!(matches!(
        var.initializer,
        Some(Expression::Value(ValueExpr { value: Value::Integer(5), .. }))
    ));
}

#[test]
fn expression_only_parsing() {
    let source = "a - b - c";
    let (tokens, _) = tokenize(source);
    let expr = parse_expression(&tokens, source).unwrap();
    let Expression::Binary(outer) = &expr else {
        panic!("expected binary");
    };
    // (a - b) - c
    assert!(matches!(outer.left.as_ref(), Expression::Binary(_)));
    assert!(matches!(outer.right.as_ref(), Expression::Value(_)));

    let (tokens, _) = tokenize("a b");
    assert!(parse_expression(&tokens, "a b").is_err());
}

// ── Analysis ────────────────────────────────────────────────────────

#[test]
fn pointer_and_function_types_are_interned() {
    let core = Library::core();
    let integer = core.global(INTEGER).unwrap();
    let boolean = core.global("Boolean").unwrap();

    let mut lib = Library::new("unit");
    lib.link(Arc::new(core));
    assert_eq!(lib.get_pointer_type(integer, 1), lib.get_pointer_type(integer, 1));
    assert_eq!(
        lib.get_function_type(&[integer], boolean),
        lib.get_function_type(&[integer], boolean)
    );
}

#[test]
fn duplicate_globals_are_rejected() {
    let errors = check("var x : Integer; var x : Integer;");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::SameName { .. }));
}

#[test]
fn global_and_local_may_share_a_name() {
    assert!(check("var x : Integer; fn f() { var x : Integer; }").is_empty());
}

#[test]
fn break_needs_a_loop() {
    assert!(check("fn f() { while (true) { if (true) { break; } } }").is_empty());
    let errors = check("fn f() { if (true) { break; } }");
    assert!(matches!(
        errors.as_slice(),
        [SemanticError::BreakContinueMustBeInsideLoop { .. }]
    ));
}

#[test]
fn variable_type_is_the_core_integer() {
    let source = "var x : Integer = 5;";
    let (tokens, interner) = tokenize(source);
    let block = parse(&tokens, source).unwrap();
    let core = Arc::new(Library::core());
    let mut library = Library::new("unit");

    let analysis: Analysis = analyze(&block, &interner, &[core.clone()], &mut library);
    assert!(analysis.is_ok());

    let symbol = analysis.annotations.symbol(block.declarations[0].id()).unwrap();
    let ty = library.symbol(symbol).and_then(|s| s.ty);
    assert_eq!(ty, core.global(INTEGER));
}

#[test]
fn bare_return_in_integer_function() {
    let errors = check("fn f() : Integer { return; }");
    match errors.as_slice() {
        [SemanticError::TypeMismatch { expected, found, .. }] => {
            assert_eq!(expected, "Integer");
            assert!(found.is_none());
        }
        other => panic!("unexpected errors {:?}", other),
    }
}

#[test]
fn linked_list_program() {
    let source = r#"
        class Node {
            var value : Integer;
            var next : Node*;
        }

        fn sum(head : Node*) : Integer {
            var total : Integer = 0;
            for (var cur : Node* = head; cur; cur = cur->next) {
                if (cur->value < 0) {
                    continue;
                }
                total += cur->value;
            }
            return total;
        }

        fn main() : Integer {
            var n : Node;
            n.value = 3;
            n.next = null as Node*;
            return sum(&n);
        }
    "#;
    let errors = check(source);
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn parents_reach_every_node() {
    let source = "fn f(a : Integer) : Integer { return a; }";
    let (tokens, _) = tokenize(source);
    let block = parse(&tokens, source).unwrap();
    let parents = ParentMap::build(NodeRef::Block(&block));
    // Block, Function, Parameter, two Types, Scope, Return, Value.
    assert_eq!(parents.len(), 8);
}
