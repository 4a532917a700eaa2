///
/// Semantic Analysis Module
///
/// This module checks a parsed unit and populates its Library. Analysis
/// runs four phases in strict order, each a complete walk of the tree:
///
/// 1. link: parent links, class types predeclared as globals
/// 2. resolve: written types and function signatures
/// 3. bind: a Symbol for every declaration, registered where it is visible
/// 4. check: the type of every expression plus the statement rules
///
/// Errors never abort a phase. They are collected, and the run is failed
/// when any was reported; callers check `Analysis::is_ok` before trusting the
/// annotations or the library contents.
///
/// Dependencies (normally `Library::core()`) supply the names visible before
/// the unit declares anything, the built-in types among them.
///

mod annotations;
mod bind;
mod check;
mod context;
mod error;
mod library;
mod link;
mod resolve;
mod scope;
mod symbols;

pub use annotations::Annotations;
pub use context::AnalysisContext;
pub use error::{SemanticError, SemanticResult};
pub use library::{Library, BOOLEAN, BYTE, FLOAT, INTEGER, NULL, VOID};
pub use scope::{ScopeEntry, ScopeKind, ScopeStack};
pub use symbols::{FunctionSymbol, LibraryId, Symbol, SymbolId, SymbolKind, TypeMode, TypeSymbol};

use std::sync::Arc;

use lasso::Rodeo;
use tracing::debug;

use crate::ast::{Block, ParentMap};

pub struct Analysis<'ast> {
    pub annotations: Annotations,
    pub parents: ParentMap<'ast>,
    pub errors: Vec<SemanticError>,
}

impl Analysis<'_> {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn analyze<'ast>(
    root: &'ast Block,
    interner: &Rodeo,
    dependencies: &[Arc<Library>],
    library: &mut Library,
) -> Analysis<'ast> {
    let mut ctx = AnalysisContext::new(library, interner, dependencies);

    link::link(&mut ctx, root);
    debug!(nodes = ctx.parents.len(), errors = ctx.errors.len(), "linked parents");

    resolve::resolve(&mut ctx, root);
    debug!(errors = ctx.errors.len(), "resolved declared types");

    bind::bind(&mut ctx, root);
    debug!(
        symbols = ctx.library.symbols().len(),
        errors = ctx.errors.len(),
        "bound declarations"
    );

    check::check(&mut ctx, root);
    debug!(
        expressions = ctx.annotations.resolved_type_count(),
        errors = ctx.errors.len(),
        "checked types"
    );

    Analysis {
        annotations: ctx.annotations,
        parents: ctx.parents,
        errors: ctx.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Expression, Statement};
    use crate::lexer::tokenize;
    use crate::parser::parse;

    struct Checked {
        block: Block,
        interner: Rodeo,
        core: Arc<Library>,
        library: Library,
    }

    fn setup(source: &str) -> Checked {
        let (tokens, interner) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        Checked {
            block,
            interner,
            core: Arc::new(Library::core()),
            library: Library::new("test"),
        }
    }

    fn errors(source: &str) -> Vec<SemanticError> {
        let mut unit = setup(source);
        let deps = [unit.core.clone()];
        analyze(&unit.block, &unit.interner, &deps, &mut unit.library).errors
    }

    fn assert_ok(source: &str) {
        let errs = errors(source);
        assert!(errs.is_empty(), "unexpected errors for {:?}: {:?}", source, errs);
    }

    fn single_error(source: &str) -> SemanticError {
        let mut errs = errors(source);
        assert_eq!(errs.len(), 1, "expected one error for {:?}: {:?}", source, errs);
        errs.remove(0)
    }

    #[test]
    fn test_global_variable_type_is_core_integer() {
        let mut unit = setup("var x : Integer = 5;");
        let deps = [unit.core.clone()];
        let analysis = analyze(&unit.block, &unit.interner, &deps, &mut unit.library);
        assert!(analysis.is_ok());

        let Declaration::Variable(var) = &unit.block.declarations[0] else {
            panic!("expected variable");
        };
        let symbol = analysis.annotations.symbol(var.id).unwrap();
        let ty = unit.library.symbol(symbol).and_then(|s| s.ty);
        assert_eq!(ty, unit.core.global(INTEGER));
        assert_eq!(unit.library.global("x"), Some(symbol));
    }

    #[test]
    fn test_library_reused_across_runs() {
        let mut unit = setup("var x : Integer; fn f() : Integer { return x; }");
        let deps = [unit.core.clone()];
        assert!(analyze(&unit.block, &unit.interner, &deps, &mut unit.library).is_ok());
        let first_count = unit.library.symbols().len();
        let first_globals = unit.library.globals().count();

        let analysis = analyze(&unit.block, &unit.interner, &deps, &mut unit.library);
        assert!(analysis.is_ok(), "{:?}", analysis.errors);
        assert_eq!(unit.library.symbols().len(), first_count);
        assert_eq!(unit.library.globals().count(), first_globals);
        assert!(unit.library.global("x").is_some());
    }

    #[test]
    fn test_duplicate_globals() {
        assert!(matches!(
            single_error("var x : Integer; var x : Float;"),
            SemanticError::SameName { ref name, .. } if name == "x"
        ));
        assert!(matches!(
            single_error("var Integer : Integer;"),
            SemanticError::SameName { .. }
        ));
    }

    #[test]
    fn test_global_and_local_same_name() {
        assert_ok("var x : Integer; fn f() { var x : Float = 1.0; }");
    }

    #[test]
    fn test_locals_unique_across_nested_blocks() {
        assert!(matches!(
            single_error("fn f(a : Integer) { while (true) { var a : Integer; } }"),
            SemanticError::SameName { .. }
        ));
    }

    #[test]
    fn test_class_members() {
        assert_ok(
            "class Point { var x : Integer; var y : Integer; }
             fn len(p : Point*) : Integer { return p->x + p->y; }
             fn first(p : Point) : Integer { return p.x; }",
        );
        assert!(matches!(
            single_error("class P { var x : Integer; var x : Integer; }"),
            SemanticError::SameName { .. }
        ));
        assert!(matches!(
            single_error("class P { var x : Integer; } fn f(p : P) : Integer { return p.z; }"),
            SemanticError::SymbolNotFound { ref name, .. } if name == "z"
        ));
        assert!(matches!(
            single_error("class P { var x : Integer; } fn f(p : P) : Integer { return p->x; }"),
            SemanticError::InvalidMemberAccess { .. }
        ));
    }

    #[test]
    fn test_redeclared_class_members_are_checked() {
        let errs = errors("class A { var x : Integer; } class A { var y : Integer; var y : Integer; }");
        let names: Vec<&str> = errs
            .iter()
            .map(|e| match e {
                SemanticError::SameName { name, .. } => name.as_str(),
                other => panic!("unexpected error {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["A", "y"]);
    }

    #[test]
    fn test_redeclared_class_keeps_its_members() {
        let mut unit = setup("class A { var x : Integer; } class A { var y : Integer; }");
        let deps = [unit.core.clone()];
        let analysis = analyze(&unit.block, &unit.interner, &deps, &mut unit.library);
        assert_eq!(analysis.errors.len(), 1);

        let second = analysis.annotations.symbol(unit.block.declarations[1].id()).unwrap();
        let members = unit.library.type_of(second).map(|t| t.members.len());
        assert_eq!(members, Some(1));
        assert_ne!(unit.library.global("A"), Some(second));
    }

    #[test]
    fn test_class_used_before_declaration() {
        assert_ok("var head : Node*; class Node { var next : Node*; }");
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            single_error("var x : Missing;"),
            SemanticError::SymbolNotFound { ref name, .. } if name == "Missing"
        ));
    }

    #[test]
    fn test_break_placement() {
        assert_ok("fn f() { while (true) { if (true) { break; } continue; } }");
        assert_ok("fn f() { for (var i : Integer = 0; i < 10; ++i) { break; } }");
        assert!(matches!(
            single_error("fn f() { break; }"),
            SemanticError::BreakContinueMustBeInsideLoop { .. }
        ));
        assert!(matches!(
            single_error("fn f() { continue; }"),
            SemanticError::BreakContinueMustBeInsideLoop { .. }
        ));
        assert!(matches!(
            single_error("fn f() { if (true) { continue; } }"),
            SemanticError::BreakContinueMustBeInsideLoop { .. }
        ));
        // A method body does not see the loops of its surroundings.
        assert!(matches!(
            single_error("class C { fn m() { break; } } fn f() { while (true) { } }"),
            SemanticError::BreakContinueMustBeInsideLoop { .. }
        ));
    }

    #[test]
    fn test_return_types() {
        assert_ok("fn f() : Integer { return 1; } fn g() { return; }");
        match single_error("fn f() : Integer { return; }") {
            SemanticError::TypeMismatch { expected, found, .. } => {
                assert_eq!(expected, "Integer");
                assert_eq!(found, None);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            single_error("fn f() : Integer { return 1.5; }"),
            SemanticError::TypeMismatch { found: Some(ref found), .. } if found == "Float"
        ));
    }

    #[test]
    fn test_arithmetic() {
        assert_ok(
            "fn f(p : Integer*, q : Integer*, n : Integer) : Integer {
                 var r : Integer* = p + n;
                 r = n + p;
                 r = p - 1;
                 return (p - q) * 2 % n;
             }",
        );
        assert!(matches!(
            single_error("fn f() : Integer { return 1 + 2.0; }"),
            SemanticError::InvalidBinaryOperator { .. }
        ));
        assert!(matches!(
            single_error("fn f(p : Integer*) { var x : Integer* = 1 - p; }"),
            SemanticError::InvalidBinaryOperator { .. }
        ));
    }

    #[test]
    fn test_assignment() {
        assert_ok("fn f() { var x : Integer; x = 2; x += 3; x *= x; }");
        assert!(matches!(
            single_error("fn f() { var x : Integer; x = 1.0; }"),
            SemanticError::InvalidBinaryOperator { .. }
        ));
        assert!(matches!(
            single_error("fn g() { } fn f() { var x : Integer; x = g; }"),
            SemanticError::InvalidBinaryOperator { .. }
        ));
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_ok("fn f(p : Byte*, n : Integer) : Boolean { return p && n < 3 || !p; }");
        assert!(matches!(
            single_error("fn f() : Boolean { return 1 && true; }"),
            SemanticError::InvalidBinaryOperator { .. }
        ));
    }

    #[test]
    fn test_unary() {
        assert_ok(
            "fn f(p : Integer*) : Integer {
                 var q : Integer** = &p;
                 ++p;
                 return -*p + **q;
             }",
        );
        assert!(matches!(
            single_error("fn f(n : Integer) : Integer { return *n; }"),
            SemanticError::InvalidUnaryOperator { .. }
        ));
        assert!(matches!(
            single_error("fn f(n : Integer) : Boolean { return !n; }"),
            SemanticError::InvalidUnaryOperator { .. }
        ));
    }

    #[test]
    fn test_conditions() {
        assert_ok("fn f(p : Byte*) { if (p) { } while (p == null) { } }");
        assert!(matches!(
            single_error("fn f() { if (1) { } }"),
            SemanticError::ConditionExpectedBooleanOrPointer { ref found, .. } if found == "Integer"
        ));
    }

    #[test]
    fn test_calls() {
        assert_ok(
            "fn add(a : Integer, b : Integer) : Integer { return a + b; }
             fn main() : Integer { return add(1, add(2, 3)); }",
        );
        assert!(matches!(
            single_error("fn add(a : Integer) : Integer { return a; } fn main() { add(1, 2); }"),
            SemanticError::InvalidCall { .. }
        ));
        assert!(matches!(
            single_error("fn add(a : Integer) : Integer { return a; } fn main() { add(1.0); }"),
            SemanticError::InvalidCall { .. }
        ));
        assert!(matches!(
            single_error("fn main() { var x : Integer; x(); }"),
            SemanticError::NonCallableType { .. }
        ));
    }

    #[test]
    fn test_methods_are_members() {
        assert_ok(
            "class Counter { var n : Integer; fn bump() : Integer { return 1; } }
             fn f(c : Counter*) : Integer { return c->bump() + c->n; }",
        );
    }

    #[test]
    fn test_index() {
        assert_ok("fn f(s : Byte*) : Byte { return s[0]; }");
        assert!(matches!(
            single_error("fn f(s : Byte*) : Byte { return s[1.0]; }"),
            SemanticError::InvalidIndexer { .. }
        ));
        assert!(matches!(
            single_error("fn f(n : Integer) : Integer { return n[0]; }"),
            SemanticError::InvalidIndexer { .. }
        ));
    }

    #[test]
    fn test_casts() {
        assert_ok(
            "fn f(p : Byte*, n : Integer) : Boolean {
                 var q : Integer* = p as Integer*;
                 var r : Byte* = n as Byte*;
                 var m : Integer = p as Integer;
                 var x : Float = n as Float;
                 return p as Boolean;
             }",
        );
        assert!(matches!(
            single_error("fn f(p : Byte*) : Float { return p as Float; }"),
            SemanticError::InvalidCast { .. }
        ));
        assert!(matches!(
            single_error("fn f(x : Float) : Byte* { return x as Byte*; }"),
            SemanticError::InvalidCast { .. }
        ));
        assert!(matches!(
            single_error("fn g() { } fn f() : Integer { return g as Integer; }"),
            SemanticError::InvalidCast { .. }
        ));
    }

    #[test]
    fn test_labels() {
        assert_ok("fn f() { label top; goto top; goto later; label later; }");
        assert!(matches!(
            single_error("fn f() { goto nowhere; }"),
            SemanticError::SymbolNotFound { ref name, .. } if name == "nowhere"
        ));
        assert!(matches!(
            single_error("fn f() { label a; label a; }"),
            SemanticError::SameName { .. }
        ));
    }

    #[test]
    fn test_identifiers() {
        assert!(matches!(
            single_error("fn f() : Integer { return y; }"),
            SemanticError::SymbolNotFound { ref name, .. } if name == "y"
        ));
        // A type name is not a value.
        assert!(matches!(
            single_error("fn f() { Integer; }"),
            SemanticError::SymbolNotFound { .. }
        ));
        // Locals of another function are not visible.
        assert!(matches!(
            single_error("fn f() { var a : Integer; } fn g() { a; }"),
            SemanticError::SymbolNotFound { .. }
        ));
    }

    #[test]
    fn test_initializers() {
        assert_ok("var s : Byte* = \"text\"; var p : Integer* = null; var c : Byte = 'c';");
        assert!(matches!(
            single_error("var x : Integer = 1.0;"),
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_resolved_types_are_recorded() {
        let mut unit = setup("fn f(a : Integer) : Integer { return a + 1; }");
        let deps = [unit.core.clone()];
        let analysis = analyze(&unit.block, &unit.interner, &deps, &mut unit.library);
        assert!(analysis.is_ok());

        let Declaration::Function(func) = &unit.block.declarations[0] else {
            panic!("expected function");
        };
        let Statement::Return(ret) = &func.body.statements[0] else {
            panic!("expected return");
        };
        let Some(Expression::Binary(sum)) = &ret.value else {
            panic!("expected binary expression");
        };
        assert_eq!(analysis.annotations.resolved_type(sum.id), unit.core.global(INTEGER));

        let signature = analysis.annotations.signature(func.id).unwrap();
        assert_eq!(unit.library.name_of(signature), "function(Integer) : Integer");
    }

    #[test]
    fn test_missing_core_reports_builtins() {
        let mut unit = setup("var x : Integer = 1;");
        let analysis = analyze(&unit.block, &unit.interner, &[], &mut unit.library);
        assert!(!analysis.is_ok());
        assert!(analysis
            .errors
            .iter()
            .all(|e| matches!(e, SemanticError::SymbolNotFound { .. })));
    }

    #[test]
    fn test_dependency_globals_are_visible() {
        let core = Arc::new(Library::core());

        let (tokens, interner) = tokenize("var shared : Integer;");
        let block = parse(&tokens, "var shared : Integer;").unwrap();
        let mut first = Library::new("first");
        assert!(analyze(&block, &interner, &[core.clone()], &mut first).is_ok());
        let first = Arc::new(first);

        let source = "fn f() : Integer { return shared; }";
        let (tokens, interner) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        let mut second = Library::new("second");
        let analysis = analyze(&block, &interner, &[core, first], &mut second);
        assert!(analysis.is_ok(), "{:?}", analysis.errors);
    }

    #[test]
    fn test_errors_do_not_stop_analysis() {
        let errs = errors("fn f() { break; } fn g() : Integer { return; } var z : Missing;");
        assert_eq!(errs.len(), 3);
    }
}
