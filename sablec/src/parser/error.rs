///
/// Parser Error Types
///
/// A parse stops at the first failure; there is no resynchronization. The
/// error names what the grammar required and carries the span of the token
/// found instead (or of the end of input).
///
/// Error categories:
/// - UnexpectedToken: a required token or construct was missing
/// - PrematureEndOfStream: the input ran out while something was required
/// - InvalidLiteral: a numeric literal does not fit its type
///

use crate::lexer::TokenKind;
use crate::source::Span;
use thiserror::Error;

use super::combinators::{PError, PErrorKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        span: Span,
    },

    #[error("expected {expected}, found end of input")]
    PrematureEndOfStream { expected: String, span: Span },

    #[error("invalid literal")]
    InvalidLiteral { span: Span },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found,
            span,
        }
    }

    pub fn premature_end(expected: impl Into<String>, span: Span) -> Self {
        ParseError::PrematureEndOfStream {
            expected: expected.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::PrematureEndOfStream { span, .. } => *span,
            ParseError::InvalidLiteral { span } => *span,
        }
    }
}

impl<'a> From<PError<'a>> for ParseError {
    fn from(error: PError<'a>) -> Self {
        let span = error.input.current_span();
        if error.kind == PErrorKind::InvalidLiteral {
            return ParseError::InvalidLiteral { span };
        }
        let expected = error.kind.describe();
        match error.input.first().map(|t| t.kind) {
            Some(TokenKind::Eof) | None => ParseError::premature_end(expected, span),
            Some(found) => ParseError::unexpected(expected, found, span),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
