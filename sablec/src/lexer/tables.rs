//!
//! Keyword and Symbol Literal Tables
//!
//! The lexer is parameterized by two ordered string tables: reserved words
//! and operator/punctuation spellings. The position of an entry in its table
//! fixes its token kind; the spelling is free to change (see `sable.toml`).
//!
//! `Keyword` and `Symbol` are generated together with their default spelling
//! tables so the enum order and the table order can never drift apart.
//!

use serde::Serialize;
use thiserror::Error;

macro_rules! literal_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const SPELLINGS: &'static [&'static str] = &[$($text),+];

            pub fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            pub fn default_spelling(self) -> &'static str {
                Self::SPELLINGS[self as usize]
            }
        }
    };
}

literal_table! {
    /// Reserved words, reclassified from identifiers after scanning.
    Keyword {
        As => "as",
        Break => "break",
        Class => "class",
        Continue => "continue",
        Else => "else",
        False => "false",
        Function => "fn",
        For => "for",
        Goto => "goto",
        If => "if",
        Label => "label",
        Null => "null",
        Return => "return",
        True => "true",
        Var => "var",
        While => "while",
    }
}

literal_table! {
    /// Operators and punctuation, recognized by the DFA symbol trie.
    Symbol {
        OpenParen => "(",
        CloseParen => ")",
        OpenBrace => "{",
        CloseBrace => "}",
        OpenBracket => "[",
        CloseBracket => "]",
        Dot => ".",
        Arrow => "->",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        Assign => "=",
        PlusAssign => "+=",
        MinusAssign => "-=",
        StarAssign => "*=",
        SlashAssign => "/=",
        PercentAssign => "%=",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        Increment => "++",
        Decrement => "--",
        Not => "!",
        AndAnd => "&&",
        OrOr => "||",
        Less => "<",
        Greater => ">",
        LessEqual => "<=",
        GreaterEqual => ">=",
        Equal => "==",
        NotEqual => "!=",
        Ampersand => "&",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Keywords,
    Symbols,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Keywords => write!(f, "keyword"),
            TableKind::Symbols => write!(f, "symbol"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("{table} table has {found} entries, expected {expected}")]
    Length {
        table: TableKind,
        expected: usize,
        found: usize,
    },

    #[error("{table} table entry {index} is empty")]
    EmptySpelling { table: TableKind, index: usize },

    #[error("{table} table spells '{spelling}' twice")]
    Duplicate { table: TableKind, spelling: String },
}

/// The runtime spelling tables handed to DFA construction and keyword
/// reclassification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTables {
    keywords: Vec<String>,
    symbols: Vec<String>,
}

impl LanguageTables {
    pub fn new(keywords: Vec<String>, symbols: Vec<String>) -> Result<Self, TableError> {
        validate(TableKind::Keywords, &keywords, Keyword::ALL.len())?;
        validate(TableKind::Symbols, &symbols, Symbol::ALL.len())?;
        Ok(Self { keywords, symbols })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn keyword_spelling(&self, keyword: Keyword) -> &str {
        &self.keywords[keyword.index()]
    }

    pub fn symbol_spelling(&self, symbol: Symbol) -> &str {
        &self.symbols[symbol.index()]
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn keyword(&self, text: &str) -> Option<Keyword> {
        self.keywords
            .iter()
            .position(|k| k == text)
            .and_then(Keyword::from_index)
    }
}

impl Default for LanguageTables {
    fn default() -> Self {
        Self {
            keywords: Keyword::SPELLINGS.iter().map(|s| s.to_string()).collect(),
            symbols: Symbol::SPELLINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn validate(table: TableKind, entries: &[String], expected: usize) -> Result<(), TableError> {
    if entries.len() != expected {
        return Err(TableError::Length {
            table,
            expected,
            found: entries.len(),
        });
    }

    for (index, spelling) in entries.iter().enumerate() {
        if spelling.is_empty() {
            return Err(TableError::EmptySpelling { table, index });
        }
        if entries[..index].contains(spelling) {
            return Err(TableError::Duplicate {
                table,
                spelling: spelling.clone(),
            });
        }
    }

    Ok(())
}
