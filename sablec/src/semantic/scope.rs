///
/// Scope Stack
///
/// The analyzer keeps one entry per active Class, Function, Block or Loop
/// construct. Entries are pushed on entry and popped on exit, strictly
/// nested. Binding uses the stack to find where a declaration registers;
/// checking uses it to resolve identifiers and validate loop control.
///
/// Name lookup walks from the innermost entry outward and stops after the
/// first Function or Class entry: locals of an enclosing function are never
/// visible across that boundary. Anything not found falls back to globals.
///

use indexmap::IndexMap;

use crate::ast::NodeId;

use super::symbols::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Block,
    Class,
    Function,
    Loop,
}

#[derive(Debug, Clone)]
pub struct ScopeEntry {
    pub kind: ScopeKind,
    pub owner: NodeId,
    /// The Class type or Function symbol owning the entry.
    pub symbol: Option<SymbolId>,
    pub locals: IndexMap<String, SymbolId>,
}

impl ScopeEntry {
    fn is_boundary(&self) -> bool {
        matches!(self.kind, ScopeKind::Function | ScopeKind::Class)
    }
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ScopeKind, owner: NodeId, symbol: Option<SymbolId>) {
        self.entries.push(ScopeEntry {
            kind,
            owner,
            symbol,
            locals: IndexMap::new(),
        });
    }

    pub fn pop(&mut self) -> Option<ScopeEntry> {
        self.entries.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn top_mut(&mut self) -> Option<&mut ScopeEntry> {
        self.entries.last_mut()
    }

    /// Adds a name to the innermost entry. A later declaration shadows an
    /// earlier one with the same name.
    pub fn declare(&mut self, name: impl Into<String>, symbol: SymbolId) {
        if let Some(top) = self.entries.last_mut() {
            top.locals.insert(name.into(), symbol);
        }
    }

    /// True when a Loop entry is active within the current function.
    pub fn in_loop(&self) -> bool {
        self.entries
            .iter()
            .rev()
            .take_while(|e| e.kind != ScopeKind::Function)
            .any(|e| e.kind == ScopeKind::Loop)
    }

    pub fn nearest_function(&self) -> Option<SymbolId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind == ScopeKind::Function)
            .and_then(|e| e.symbol)
    }

    /// The innermost Class or Function entry: where a declaration made here
    /// registers. `None` means global scope.
    pub fn registration_target(&self) -> Option<&ScopeEntry> {
        self.entries.iter().rev().find(|e| e.is_boundary())
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        for entry in self.entries.iter().rev() {
            if let Some(id) = entry.locals.get(name) {
                return Some(*id);
            }
            if entry.is_boundary() {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::LibraryId;

    fn sym(index: u32) -> SymbolId {
        SymbolId {
            library: LibraryId(0),
            index,
        }
    }

    #[test]
    fn test_lookup_stops_at_function() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Class, NodeId(0), Some(sym(0)));
        scopes.declare("member", sym(1));
        scopes.push(ScopeKind::Function, NodeId(1), Some(sym(2)));
        scopes.declare("param", sym(3));
        scopes.push(ScopeKind::Block, NodeId(2), None);
        scopes.declare("local", sym(4));

        assert_eq!(scopes.lookup("local"), Some(sym(4)));
        assert_eq!(scopes.lookup("param"), Some(sym(3)));
        assert_eq!(scopes.lookup("member"), None);
    }

    #[test]
    fn test_shadowing() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Function, NodeId(0), None);
        scopes.declare("x", sym(1));
        scopes.push(ScopeKind::Block, NodeId(1), None);
        scopes.declare("x", sym(2));
        assert_eq!(scopes.lookup("x"), Some(sym(2)));
        scopes.pop();
        assert_eq!(scopes.lookup("x"), Some(sym(1)));
    }

    #[test]
    fn test_in_loop() {
        let mut scopes = ScopeStack::new();
        assert!(!scopes.in_loop());
        scopes.push(ScopeKind::Function, NodeId(0), Some(sym(0)));
        scopes.push(ScopeKind::Loop, NodeId(1), None);
        scopes.push(ScopeKind::Block, NodeId(2), None);
        assert!(scopes.in_loop());
        assert_eq!(scopes.nearest_function(), Some(sym(0)));
        scopes.pop();
        scopes.pop();
        assert!(!scopes.in_loop());
    }

    #[test]
    fn test_registration_target_skips_blocks() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.registration_target().is_none());
        scopes.push(ScopeKind::Function, NodeId(0), Some(sym(0)));
        scopes.push(ScopeKind::Block, NodeId(1), None);
        scopes.push(ScopeKind::Loop, NodeId(2), None);
        let target = scopes.registration_target().unwrap();
        assert_eq!(target.kind, ScopeKind::Function);
        assert_eq!(target.symbol, Some(sym(0)));
    }
}
