///
/// Semantic Error Types
///
/// Every rule violation the analyzer can detect. Errors are collected, not
/// thrown: a pass keeps walking sibling subtrees after reporting, and the
/// run as a whole is failed when any error was recorded.
///
/// Each variant carries the names of the involved symbols or types (as
/// rendered by the Library) and the span of the offending node.
///

use crate::source::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("'{name}' is already defined in this scope")]
    SameName { name: String, span: Span },

    #[error("symbol '{name}' not found")]
    SymbolNotFound { name: String, span: Span },

    #[error("cannot index '{target}' with '{index}'")]
    InvalidIndexer {
        target: String,
        index: String,
        span: Span,
    },

    #[error("invalid member access '{access}' on '{ty}'")]
    InvalidMemberAccess {
        access: String,
        ty: String,
        span: Span,
    },

    #[error("invalid binary operator: cannot apply {op} to '{left}' and '{right}'")]
    InvalidBinaryOperator {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    #[error("invalid unary operator: cannot apply {op} to '{operand}'")]
    InvalidUnaryOperator {
        op: String,
        operand: String,
        span: Span,
    },

    #[error("type '{ty}' is not callable")]
    NonCallableType { ty: String, span: Span },

    #[error("invalid call to '{callee}' with arguments ({arguments})")]
    InvalidCall {
        callee: String,
        arguments: String,
        span: Span,
    },

    #[error("cannot cast '{from}' to '{to}'")]
    InvalidCast { from: String, to: String, span: Span },

    #[error("condition must be Boolean or a pointer, found '{found}'")]
    ConditionExpectedBooleanOrPointer { found: String, span: Span },

    #[error("break and continue must be inside a loop")]
    BreakContinueMustBeInsideLoop { span: Span },

    #[error("type mismatch: expected {expected}, found {}", .found.as_deref().unwrap_or("None"))]
    TypeMismatch {
        expected: String,
        found: Option<String>,
        span: Span,
    },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::SameName { span, .. } => *span,
            SemanticError::SymbolNotFound { span, .. } => *span,
            SemanticError::InvalidIndexer { span, .. } => *span,
            SemanticError::InvalidMemberAccess { span, .. } => *span,
            SemanticError::InvalidBinaryOperator { span, .. } => *span,
            SemanticError::InvalidUnaryOperator { span, .. } => *span,
            SemanticError::NonCallableType { span, .. } => *span,
            SemanticError::InvalidCall { span, .. } => *span,
            SemanticError::InvalidCast { span, .. } => *span,
            SemanticError::ConditionExpectedBooleanOrPointer { span, .. } => *span,
            SemanticError::BreakContinueMustBeInsideLoop { span } => *span,
            SemanticError::TypeMismatch { span, .. } => *span,
        }
    }

    pub fn same_name(name: impl Into<String>, span: Span) -> Self {
        SemanticError::SameName {
            name: name.into(),
            span,
        }
    }

    pub fn not_found(name: impl Into<String>, span: Span) -> Self {
        SemanticError::SymbolNotFound {
            name: name.into(),
            span,
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, found: Option<String>, span: Span) -> Self {
        SemanticError::TypeMismatch {
            expected: expected.into(),
            found,
            span,
        }
    }
}

pub type SemanticResult<T> = Result<T, SemanticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = SemanticError::type_mismatch("Integer", None, Span::dummy());
        assert_eq!(err.to_string(), "type mismatch: expected Integer, found None");
        let err = SemanticError::type_mismatch("Integer", Some("Float".into()), Span::new(3, 5, 0));
        assert_eq!(err.to_string(), "type mismatch: expected Integer, found Float");
        assert_eq!(err.span(), Span::new(3, 5, 0));
    }
}
