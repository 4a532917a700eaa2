///
/// TokenStream Input Type for nom
///
/// This module provides a custom input type that wraps a slice of significant
/// tokens (trivia already removed). nom requires `InputLength` for its
/// repetition combinators and `InputTake` for splitting off consumed tokens.
///
/// The stream also carries the parse-wide `NodeIds` source so every rule can
/// stamp the node it builds with a fresh id.
///

use nom::{InputLength, InputTake};

use crate::ast::{NodeId, NodeIds};
use crate::lexer::Token;
use crate::source::Span;

#[derive(Debug, Clone, Copy)]
pub struct TokenStream<'a> {
    pub tokens: &'a [Token],
    pub source: &'a str,
    pub start: usize,
    ids: &'a NodeIds,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str, ids: &'a NodeIds) -> Self {
        Self {
            tokens,
            source,
            start: 0,
            ids,
        }
    }

    pub fn span_text(&self, span: Span) -> &'a str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn first(&self) -> Option<&'a Token> {
        self.tokens.first()
    }

    pub fn current_span(&self) -> Span {
        self.tokens.first().map(|t| t.span).unwrap_or(Span::dummy())
    }

    pub fn fresh_id(&self) -> NodeId {
        self.ids.fresh()
    }

    /// Span covering the tokens consumed between `earlier` and `self`.
    pub fn span_since(&self, earlier: &TokenStream<'a>) -> Span {
        let consumed = self.start.saturating_sub(earlier.start);
        let first = earlier.tokens.first();
        let last = consumed.checked_sub(1).and_then(|i| earlier.tokens.get(i));
        match (first, last) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            (Some(first), None) => Span::new(first.span.start, first.span.start, first.span.file_id),
            _ => Span::dummy(),
        }
    }
}

impl<'a> InputLength for TokenStream<'a> {
    fn input_len(&self) -> usize {
        self.tokens.len()
    }
}

impl<'a> InputTake for TokenStream<'a> {
    fn take(&self, count: usize) -> Self {
        TokenStream {
            tokens: &self.tokens[..count],
            ..*self
        }
    }

    fn take_split(&self, count: usize) -> (Self, Self) {
        let count = count.min(self.tokens.len());
        let (prefix, suffix) = self.tokens.split_at(count);
        (
            TokenStream {
                tokens: suffix,
                start: self.start + count,
                ..*self
            },
            TokenStream {
                tokens: prefix,
                ..*self
            },
        )
    }
}
