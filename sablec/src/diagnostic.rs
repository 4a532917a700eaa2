//!
//! Diagnostic Module - Rich Error Reporting
//!
//! This module renders parse and semantic errors with source context using
//! miette. Each diagnostic shows the `line:col` of the offending node, a
//! labeled source snippet and, where one helps, a hint.
//!
//! Usage:
//!   let reporter = DiagnosticReporter::new(&source_file);
//!   reporter.report_parse_error(&error);
//!   reporter.report_semantic_errors(&analysis.errors);
//!

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceSpan};
use thiserror::Error;

use crate::parser::ParseError;
use crate::semantic::SemanticError;
use crate::source::{SourceFile, Span};

#[derive(Debug, Error)]
#[error("{message}")]
pub struct SableDiagnostic {
    message: String,
    src: NamedSource<String>,
    span: SourceSpan,
    label: String,
    help_text: Option<String>,
}

impl Diagnostic for SableDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(self.label.clone()),
            self.span,
        ))))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help_text
            .as_ref()
            .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>)
    }
}

impl SableDiagnostic {
    fn new(source: &SourceFile, span: Span, message: String, label: String, help_text: Option<String>) -> Self {
        let (line, col) = source.line_col(span.start);
        Self {
            message: format!("{} at {}:{}", message, line, col),
            src: NamedSource::new(&source.name, source.source.clone()),
            span: (span.start as usize, span.len() as usize).into(),
            label,
            help_text,
        }
    }

    pub fn from_parse_error(err: &ParseError, source: &SourceFile) -> Self {
        let label = match err {
            ParseError::UnexpectedToken { expected, .. } | ParseError::PrematureEndOfStream { expected, .. } => {
                format!("expected {}", expected)
            }
            ParseError::InvalidLiteral { .. } => "literal out of range".to_string(),
        };
        Self::new(source, err.span(), err.to_string(), label, None)
    }

    pub fn from_semantic_error(err: &SemanticError, source: &SourceFile) -> Self {
        let (label, help) = semantic_error_details(err);
        Self::new(source, err.span(), err.to_string(), label, help)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn semantic_error_details(err: &SemanticError) -> (String, Option<String>) {
    match err {
        SemanticError::SameName { .. } => (
            "already defined".to_string(),
            Some("rename or remove one of the definitions".to_string()),
        ),
        SemanticError::SymbolNotFound { .. } => (
            "not found in this scope".to_string(),
            Some("check spelling or declare it first".to_string()),
        ),
        SemanticError::InvalidIndexer { .. } => (
            "not indexable".to_string(),
            Some("index a pointer with an Integer".to_string()),
        ),
        SemanticError::InvalidMemberAccess { access, .. } => (
            format!("invalid '{}'", access),
            Some("use '.' on a class value and '->' on a pointer to a class".to_string()),
        ),
        SemanticError::InvalidBinaryOperator { op, .. } => (format!("invalid operands for {}", op), None),
        SemanticError::InvalidUnaryOperator { op, .. } => (format!("invalid operand for {}", op), None),
        SemanticError::NonCallableType { .. } => ("not a function".to_string(), None),
        SemanticError::InvalidCall { callee, .. } => (format!("arguments do not match {}", callee), None),
        SemanticError::InvalidCast { .. } => ("invalid cast".to_string(), None),
        SemanticError::ConditionExpectedBooleanOrPointer { .. } => (
            "not a Boolean or pointer".to_string(),
            Some("compare the value explicitly".to_string()),
        ),
        SemanticError::BreakContinueMustBeInsideLoop { .. } => (
            "not inside a loop".to_string(),
            Some("break and continue can only be used inside while and for".to_string()),
        ),
        SemanticError::TypeMismatch { expected, .. } => (format!("expected {}", expected), None),
    }
}

pub struct DiagnosticReporter<'a> {
    source: &'a SourceFile,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self { source }
    }

    pub fn report_parse_error(&self, err: &ParseError) {
        let diag = SableDiagnostic::from_parse_error(err, self.source);
        eprintln!("{:?}", Report::new(diag));
    }

    pub fn report_semantic_error(&self, err: &SemanticError) {
        let diag = SableDiagnostic::from_semantic_error(err, self.source);
        eprintln!("{:?}", Report::new(diag));
    }

    pub fn report_semantic_errors(&self, errors: &[SemanticError]) {
        for err in errors {
            self.report_semantic_error(err);
        }
    }
}
