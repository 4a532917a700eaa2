///
/// sablec - The sable Compiler Front End
///
/// This crate provides the front end for the sable language, a small
/// C-like language with classes, pointers, labels and goto. It includes:
///
/// - source: Source file handling and spans
/// - config: `sable.toml` loading (literal tables, log level)
/// - lexer: DFA-driven tokenization with keyword reclassification
/// - ast: Abstract syntax tree, visitor and parent links
/// - parser: Parsing tokens into an AST
/// - semantic: Symbol tables and the four-phase analyzer
/// - diagnostic: miette-rendered error reports
/// - driver: File discovery and whole-file checking for the CLI
///
/// Entry points:
/// - `tokenize`: Convert source text into tokens
/// - `parse`: Parse tokens into an AST
/// - `analyze`: Check an AST and populate a Library
///

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod source;

pub use config::Config;
pub use diagnostic::DiagnosticReporter;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_expression};
pub use semantic::{analyze, Library};
pub use source::SourceFile;
