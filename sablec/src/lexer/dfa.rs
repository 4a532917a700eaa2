//!
//! Deterministic Finite Automaton
//!
//! The token recognizer is a single transition graph. States live in an
//! arena owned by `Dfa` and refer to each other by `StateId`, so shared
//! edges (the whitespace state reuses the root's edge set, every comment
//! starts on the `/` symbol state) never need shared ownership.
//!
//! Each state holds:
//! - explicit per-character edges
//! - an optional default edge taken when no explicit edge matches
//! - an optional accepting token kind
//!
//! Scanning is maximal munch: the walk remembers the last accepting state it
//! passed through and cuts the token there when it can go no further.
//!

use std::collections::HashMap;

use tracing::debug;

use super::TokenKind;
use super::tables::{LanguageTables, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct DfaState {
    edges: HashMap<char, StateId>,
    default: Option<StateId>,
    accepting: Option<TokenKind>,
}

impl DfaState {
    pub fn edge(&self, c: char) -> Option<StateId> {
        self.edges.get(&c).copied()
    }

    pub fn default_edge(&self) -> Option<StateId> {
        self.default
    }

    pub fn accepting(&self) -> Option<TokenKind> {
        self.accepting
    }
}

/// Result of one maximal-munch scan: the kind of the longest accepted
/// prefix and its length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Munch {
    pub kind: TokenKind,
    pub len: usize,
}

const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];
const ESCAPES: [char; 5] = ['n', 'r', 't', '\'', '"'];

#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    pub const ROOT: StateId = StateId(0);

    /// An automaton holding only the non-accepting root state.
    pub fn new() -> Self {
        Self {
            states: vec![DfaState::default()],
        }
    }

    pub fn add_state(&mut self, accepting: Option<TokenKind>) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(DfaState {
            accepting,
            ..DfaState::default()
        });
        id
    }

    pub fn add_edge(&mut self, from: StateId, c: char, to: StateId) {
        self.states[from.index()].edges.insert(c, to);
    }

    pub fn add_edges(&mut self, from: StateId, chars: impl IntoIterator<Item = char>, to: StateId) {
        for c in chars {
            self.add_edge(from, c, to);
        }
    }

    pub fn set_default(&mut self, from: StateId, to: StateId) {
        self.states[from.index()].default = Some(to);
    }

    pub fn set_accepting(&mut self, state: StateId, kind: TokenKind) {
        self.states[state.index()].accepting = Some(kind);
    }

    /// Copies the current edge set of `from` onto `to`.
    pub fn share_edges(&mut self, from: StateId, to: StateId) {
        let edges = self.states[from.index()].edges.clone();
        self.states[to.index()].edges = edges;
    }

    pub fn state(&self, id: StateId) -> Option<&DfaState> {
        self.states.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Explicit edge first, default edge second.
    pub fn transition(&self, from: StateId, c: char) -> Option<StateId> {
        let state = self.state(from)?;
        state.edge(c).or(state.default)
    }

    fn edge_or_insert(&mut self, from: StateId, c: char) -> StateId {
        match self.states[from.index()].edge(c) {
            Some(next) => next,
            None => {
                let next = self.add_state(None);
                self.add_edge(from, c, next);
                next
            }
        }
    }

    /// Builds the language automaton. Construction order matters only where
    /// parts overlap: the symbol trie claims `/` before comments hang their
    /// edges off it, and the identifier default edge is installed before
    /// digits and quotes claim explicit root edges.
    pub fn build(tables: &LanguageTables) -> Self {
        let mut dfa = Dfa::new();

        let whitespace = dfa.add_state(Some(TokenKind::Whitespace));
        dfa.add_edges(Self::ROOT, WHITESPACE, whitespace);
        dfa.share_edges(Self::ROOT, whitespace);

        for (index, spelling) in tables.symbols().iter().enumerate() {
            let Some(symbol) = Symbol::from_index(index) else {
                continue;
            };
            let mut state = Self::ROOT;
            for c in spelling.chars() {
                state = dfa.edge_or_insert(state, c);
            }
            dfa.set_accepting(state, TokenKind::Symbol(symbol));
        }

        dfa.build_comments();
        dfa.build_identifiers();
        dfa.build_numbers();
        dfa.build_quoted('\'', TokenKind::CharacterLiteral);
        dfa.build_quoted('"', TokenKind::StringLiteral);

        debug!(states = dfa.len(), "built lexer automaton");
        dfa
    }

    fn build_comments(&mut self) {
        let slash = self.edge_or_insert(Self::ROOT, '/');

        let line = self.add_state(Some(TokenKind::SingleLineComment));
        self.add_edge(slash, '/', line);
        self.set_default(line, line);
        // Newlines lead into a dead state so the comment stops in front of them.
        let line_break = self.add_state(None);
        self.add_edges(line, ['\r', '\n'], line_break);

        let block = self.add_state(None);
        self.add_edge(slash, '*', block);
        self.set_default(block, block);
        let star = self.add_state(None);
        self.add_edge(block, '*', star);
        self.add_edge(star, '*', star);
        self.set_default(star, block);
        let close = self.add_state(Some(TokenKind::MultiLineComment));
        self.add_edge(star, '/', close);
    }

    fn build_identifiers(&mut self) {
        let ident = self.add_state(Some(TokenKind::Identifier));
        self.set_default(Self::ROOT, ident);
        self.add_edges(ident, ('a'..='z').chain('A'..='Z'), ident);
        self.add_edges(ident, ('0'..='9').chain(['_']), ident);
    }

    fn build_numbers(&mut self) {
        let digits = || '0'..='9';

        let integer = self.add_state(Some(TokenKind::IntegerLiteral));
        self.add_edges(Self::ROOT, digits(), integer);
        self.add_edges(integer, digits(), integer);

        let point = self.add_state(None);
        self.add_edge(integer, '.', point);
        let fraction = self.add_state(Some(TokenKind::FloatLiteral));
        self.add_edges(point, digits(), fraction);
        self.add_edges(fraction, digits(), fraction);

        let exponent_mark = self.add_state(None);
        self.add_edges(fraction, ['e', 'E'], exponent_mark);
        let exponent_sign = self.add_state(None);
        self.add_edges(exponent_mark, ['+', '-'], exponent_sign);
        let exponent = self.add_state(Some(TokenKind::FloatLiteral));
        self.add_edges(exponent_mark, digits(), exponent);
        self.add_edges(exponent_sign, digits(), exponent);
        self.add_edges(exponent, digits(), exponent);

        let suffix = self.add_state(Some(TokenKind::FloatLiteral));
        self.add_edge(fraction, 'f', suffix);
        self.add_edge(exponent, 'f', suffix);
    }

    fn build_quoted(&mut self, quote: char, kind: TokenKind) {
        let body = self.add_state(None);
        self.add_edge(Self::ROOT, quote, body);
        self.set_default(body, body);

        let end = self.add_state(Some(kind));
        self.add_edge(body, quote, end);

        let escape = self.add_state(None);
        self.add_edge(body, '\\', escape);
        self.add_edges(escape, ESCAPES, body);
    }

    /// Scans one token from the front of `input`.
    ///
    /// Returns `None` only for empty input. When the walk never reaches an
    /// accepting state the consumed run is returned as `Unrecognized`; at
    /// least one character is always consumed so the caller makes progress.
    pub fn read_token(&self, input: &str) -> Option<Munch> {
        let first = input.chars().next()?;

        let mut state = Self::ROOT;
        let mut consumed = 0;
        let mut best = None;

        for (offset, c) in input.char_indices() {
            let Some(next) = self.transition(state, c) else {
                break;
            };
            state = next;
            consumed = offset + c.len_utf8();
            if let Some(kind) = self.state(state).and_then(DfaState::accepting) {
                best = Some(Munch { kind, len: consumed });
            }
        }

        Some(best.unwrap_or(Munch {
            kind: TokenKind::Unrecognized,
            len: consumed.max(first.len_utf8()),
        }))
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn munch(input: &str) -> Munch {
        Dfa::build(&LanguageTables::default()).read_token(input).unwrap()
    }

    #[test]
    fn test_hand_built_automaton() {
        let mut dfa = Dfa::new();
        let a = dfa.add_state(Some(TokenKind::Identifier));
        dfa.add_edge(Dfa::ROOT, 'a', a);
        dfa.add_edge(a, 'a', a);

        assert_eq!(
            dfa.read_token("aab"),
            Some(Munch { kind: TokenKind::Identifier, len: 2 })
        );
        assert_eq!(
            dfa.read_token("b"),
            Some(Munch { kind: TokenKind::Unrecognized, len: 1 })
        );
        assert_eq!(dfa.read_token(""), None);
    }

    #[test]
    fn test_whitespace_accumulates() {
        assert_eq!(munch(" \t\r\n x"), Munch { kind: TokenKind::Whitespace, len: 5 });
    }

    #[test]
    fn test_symbol_maximal_munch() {
        assert_eq!(munch("->x").kind, TokenKind::Symbol(Symbol::Arrow));
        assert_eq!(munch("->x").len, 2);
        assert_eq!(munch("-x").kind, TokenKind::Symbol(Symbol::Minus));
        assert_eq!(munch("--x").kind, TokenKind::Symbol(Symbol::Decrement));
        assert_eq!(munch("<=").kind, TokenKind::Symbol(Symbol::LessEqual));
        assert_eq!(munch("/= 2").kind, TokenKind::Symbol(Symbol::SlashAssign));
        assert_eq!(munch("/ 2").kind, TokenKind::Symbol(Symbol::Slash));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(munch("123.45f"), Munch { kind: TokenKind::FloatLiteral, len: 7 });
        assert_eq!(munch("123"), Munch { kind: TokenKind::IntegerLiteral, len: 3 });
        assert_eq!(munch("1.5e-3;"), Munch { kind: TokenKind::FloatLiteral, len: 6 });
        assert_eq!(munch("2.0e10f"), Munch { kind: TokenKind::FloatLiteral, len: 7 });
        // A dangling dot falls back to the integer prefix.
        assert_eq!(munch("1.x"), Munch { kind: TokenKind::IntegerLiteral, len: 1 });
        assert_eq!(munch("1.5e+"), Munch { kind: TokenKind::FloatLiteral, len: 3 });
    }

    #[test]
    fn test_comments() {
        assert_eq!(munch("// a\nx"), Munch { kind: TokenKind::SingleLineComment, len: 4 });
        assert_eq!(munch("// to the end"), Munch { kind: TokenKind::SingleLineComment, len: 13 });
        assert_eq!(munch("/* a * b **/c"), Munch { kind: TokenKind::MultiLineComment, len: 12 });
    }

    #[test]
    fn test_unterminated_comment_falls_back_to_slash() {
        assert_eq!(munch("/* open"), Munch { kind: TokenKind::Symbol(Symbol::Slash), len: 1 });
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(munch("'a'"), Munch { kind: TokenKind::CharacterLiteral, len: 3 });
        assert_eq!(munch("'\\n'"), Munch { kind: TokenKind::CharacterLiteral, len: 4 });
        assert_eq!(
            munch("\"say \\\"hi\\\"\" rest"),
            Munch { kind: TokenKind::StringLiteral, len: 12 }
        );
    }

    #[test]
    fn test_unterminated_string_is_unrecognized() {
        assert_eq!(munch("\"abc"), Munch { kind: TokenKind::Unrecognized, len: 4 });
        assert_eq!(munch("'\\q'"), Munch { kind: TokenKind::Unrecognized, len: 2 });
    }

    #[test]
    fn test_identifiers_and_fallback() {
        assert_eq!(munch("foo_1 bar"), Munch { kind: TokenKind::Identifier, len: 5 });
        assert_eq!(munch("@+"), Munch { kind: TokenKind::Identifier, len: 1 });
    }
}
