//!
//! Operator Definitions
//!
//! Key types:
//! - BinaryOp: Two-operand operators, assignment family included
//! - UnaryOp: Prefix operators
//! - AccessKind: `.` versus `->` member access
//!
//! `precedence()` drives the parser's precedence ladder: every level is
//! left-associative except assignment (level 0), which is right-associative.
//!

use std::fmt;

use crate::lexer::{Symbol, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,

    Or,
    And,

    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,

    Add,
    Sub,

    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub const MAX_PRECEDENCE: u8 = 5;

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Assign
            | BinaryOp::AddAssign
            | BinaryOp::SubAssign
            | BinaryOp::MulAssign
            | BinaryOp::DivAssign
            | BinaryOp::ModAssign => 0,
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessEqual
            | BinaryOp::GreaterEqual
            | BinaryOp::Equal
            | BinaryOp::NotEqual => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 5,
        }
    }

    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let TokenKind::Symbol(symbol) = kind else {
            return None;
        };
        let op = match symbol {
            Symbol::Assign => BinaryOp::Assign,
            Symbol::PlusAssign => BinaryOp::AddAssign,
            Symbol::MinusAssign => BinaryOp::SubAssign,
            Symbol::StarAssign => BinaryOp::MulAssign,
            Symbol::SlashAssign => BinaryOp::DivAssign,
            Symbol::PercentAssign => BinaryOp::ModAssign,
            Symbol::OrOr => BinaryOp::Or,
            Symbol::AndAnd => BinaryOp::And,
            Symbol::Less => BinaryOp::Less,
            Symbol::Greater => BinaryOp::Greater,
            Symbol::LessEqual => BinaryOp::LessEqual,
            Symbol::GreaterEqual => BinaryOp::GreaterEqual,
            Symbol::Equal => BinaryOp::Equal,
            Symbol::NotEqual => BinaryOp::NotEqual,
            Symbol::Plus => BinaryOp::Add,
            Symbol::Minus => BinaryOp::Sub,
            Symbol::Star => BinaryOp::Mul,
            Symbol::Slash => BinaryOp::Div,
            Symbol::Percent => BinaryOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> Symbol {
        match self {
            BinaryOp::Assign => Symbol::Assign,
            BinaryOp::AddAssign => Symbol::PlusAssign,
            BinaryOp::SubAssign => Symbol::MinusAssign,
            BinaryOp::MulAssign => Symbol::StarAssign,
            BinaryOp::DivAssign => Symbol::SlashAssign,
            BinaryOp::ModAssign => Symbol::PercentAssign,
            BinaryOp::Or => Symbol::OrOr,
            BinaryOp::And => Symbol::AndAnd,
            BinaryOp::Less => Symbol::Less,
            BinaryOp::Greater => Symbol::Greater,
            BinaryOp::LessEqual => Symbol::LessEqual,
            BinaryOp::GreaterEqual => Symbol::GreaterEqual,
            BinaryOp::Equal => Symbol::Equal,
            BinaryOp::NotEqual => Symbol::NotEqual,
            BinaryOp::Add => Symbol::Plus,
            BinaryOp::Sub => Symbol::Minus,
            BinaryOp::Mul => Symbol::Star,
            BinaryOp::Div => Symbol::Slash,
            BinaryOp::Mod => Symbol::Percent,
        }
    }

    pub fn is_assignment(&self) -> bool {
        self.precedence() == 0
    }

    pub fn is_comparison(&self) -> bool {
        self.precedence() == 3
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn compound_operator(&self) -> Option<BinaryOp> {
        match self {
            BinaryOp::AddAssign => Some(BinaryOp::Add),
            BinaryOp::SubAssign => Some(BinaryOp::Sub),
            BinaryOp::MulAssign => Some(BinaryOp::Mul),
            BinaryOp::DivAssign => Some(BinaryOp::Div),
            BinaryOp::ModAssign => Some(BinaryOp::Mod),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol().default_spelling())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Deref,
    Plus,
    Negate,
    Increment,
    Decrement,
    Not,
    AddressOf,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let TokenKind::Symbol(symbol) = kind else {
            return None;
        };
        let op = match symbol {
            Symbol::Star => UnaryOp::Deref,
            Symbol::Plus => UnaryOp::Plus,
            Symbol::Minus => UnaryOp::Negate,
            Symbol::Increment => UnaryOp::Increment,
            Symbol::Decrement => UnaryOp::Decrement,
            Symbol::Not => UnaryOp::Not,
            Symbol::Ampersand => UnaryOp::AddressOf,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> Symbol {
        match self {
            UnaryOp::Deref => Symbol::Star,
            UnaryOp::Plus => Symbol::Plus,
            UnaryOp::Negate => Symbol::Minus,
            UnaryOp::Increment => Symbol::Increment,
            UnaryOp::Decrement => Symbol::Decrement,
            UnaryOp::Not => Symbol::Not,
            UnaryOp::AddressOf => Symbol::Ampersand,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol().default_spelling())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Dot,
    Arrow,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Dot => f.write_str("."),
            AccessKind::Arrow => f.write_str("->"),
        }
    }
}
