//!
//! Lexer Module - DFA Tokenization
//!
//! This module turns sable source text into a token sequence the parser
//! consumes. Scanning is driven by a table-built automaton (see `dfa`):
//! each step takes the longest prefix that ends in an accepting state, and
//! identifier tokens whose text exactly matches a reserved word are then
//! reclassified as keywords.
//!
//! Key design decisions:
//! - Trivia is kept: whitespace and comments are real tokens, the parser
//!   filters them out before matching grammar rules
//! - String interning: identifier and literal text stored via lasso::Spur
//! - Runs the automaton cannot accept become `Unrecognized` tokens instead
//!   of being silently passed through
//!
//! Token categories:
//! - Keywords: class, fn, var, if, while, for, etc.
//! - Identifiers: User-defined names
//! - Literals: Integers, floats, characters, strings
//! - Symbols: Operators and punctuation
//! - Trivia: Whitespace, comments
//!

pub mod dfa;
pub mod tables;

pub use dfa::{Dfa, DfaState, Munch, StateId};
pub use tables::{Keyword, LanguageTables, Symbol, TableError, TableKind};

use std::fmt;

use lasso::{Rodeo, Spur};
use serde::Serialize;
use tracing::debug;

use crate::source::Span;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub symbol: Option<Spur>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            symbol: None,
        }
    }

    pub fn with_symbol(kind: TokenKind, span: Span, symbol: Spur) -> Self {
        Self {
            kind,
            span,
            symbol: Some(symbol),
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.span.start as usize..self.span.end as usize)
            .unwrap_or("")
    }

    pub fn len(&self) -> u32 {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    pub fn position(&self) -> u32 {
        self.span.start
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::SingleLineComment | TokenKind::MultiLineComment
        )
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Whitespace,
    SingleLineComment,
    MultiLineComment,

    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharacterLiteral,
    StringLiteral,

    Keyword(Keyword),
    Symbol(Symbol),

    Unrecognized,
    Eof,
}

impl TokenKind {
    /// Start of the keyword code range; keyword `i` has code `KEYWORD_RANGE_START + i + 1`.
    pub const KEYWORD_RANGE_START: u16 = 10;
    /// Start of the symbol code range, directly after the last keyword.
    pub const SYMBOL_RANGE_START: u16 = Self::KEYWORD_RANGE_START + Keyword::ALL.len() as u16 + 1;

    /// Stable numeric code for this kind.
    pub fn code(self) -> u16 {
        match self {
            TokenKind::Whitespace => 0,
            TokenKind::SingleLineComment => 1,
            TokenKind::MultiLineComment => 2,
            TokenKind::Identifier => 3,
            TokenKind::IntegerLiteral => 4,
            TokenKind::FloatLiteral => 5,
            TokenKind::CharacterLiteral => 6,
            TokenKind::StringLiteral => 7,
            TokenKind::Unrecognized => 8,
            TokenKind::Eof => 9,
            TokenKind::Keyword(kw) => Self::KEYWORD_RANGE_START + kw.index() as u16 + 1,
            TokenKind::Symbol(sym) => Self::SYMBOL_RANGE_START + sym.index() as u16 + 1,
        }
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharacterLiteral
                | TokenKind::StringLiteral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::SingleLineComment | TokenKind::MultiLineComment => write!(f, "comment"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::IntegerLiteral => write!(f, "integer literal"),
            TokenKind::FloatLiteral => write!(f, "float literal"),
            TokenKind::CharacterLiteral => write!(f, "character literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw.default_spelling()),
            TokenKind::Symbol(sym) => write!(f, "'{}'", sym.default_spelling()),
            TokenKind::Unrecognized => write!(f, "unrecognized input"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A lexer bound to one set of literal tables. Building the automaton is the
/// expensive part, so a `Lexer` is meant to be reused across files.
#[derive(Debug, Clone)]
pub struct Lexer {
    dfa: Dfa,
    tables: LanguageTables,
    file_id: u32,
}

impl Lexer {
    pub fn new(tables: LanguageTables) -> Self {
        Self {
            dfa: Dfa::build(&tables),
            tables,
            file_id: 0,
        }
    }

    pub fn with_file_id(mut self, file_id: u32) -> Self {
        self.file_id = file_id;
        self
    }

    pub fn tables(&self) -> &LanguageTables {
        &self.tables
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Scans one token from the front of `input`, keyword reclassification
    /// included.
    pub fn read_token(&self, input: &str) -> Option<Munch> {
        let munch = self.dfa.read_token(input)?;
        let text = input.get(..munch.len).unwrap_or("");
        Some(Munch {
            kind: self.reclassify(munch.kind, text),
            len: munch.len,
        })
    }

    pub fn reclassify(&self, kind: TokenKind, text: &str) -> TokenKind {
        match kind {
            TokenKind::Identifier => self
                .tables
                .keyword(text)
                .map(TokenKind::Keyword)
                .unwrap_or(TokenKind::Identifier),
            other => other,
        }
    }

    /// Tokenizes a whole source text. The result always ends with `Eof`.
    pub fn tokenize(&self, source: &str) -> (Vec<Token>, Rodeo) {
        let mut interner = Rodeo::default();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while let Some(munch) = source.get(pos..).and_then(|rest| self.read_token(rest)) {
            let span = Span::new(pos as u32, (pos + munch.len) as u32, self.file_id);
            let text = &source[pos..pos + munch.len];

            let token = match munch.kind {
                TokenKind::Identifier
                | TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharacterLiteral
                | TokenKind::StringLiteral => {
                    Token::with_symbol(munch.kind, span, interner.get_or_intern(text))
                }
                kind => Token::new(kind, span),
            };
            tokens.push(token);
            pos += munch.len;
        }

        tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(pos as u32, pos as u32, self.file_id),
        ));

        debug!(tokens = tokens.len(), bytes = source.len(), "tokenized source");
        (tokens, interner)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(LanguageTables::default())
    }
}

/// Tokenizes with the built-in keyword and symbol tables.
pub fn tokenize(source: &str) -> (Vec<Token>, Rodeo) {
    Lexer::default().tokenize(source)
}
