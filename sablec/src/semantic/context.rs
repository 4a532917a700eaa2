///
/// Analysis Context
///
/// All mutable state of one `analyze` run: the target Library, the global
/// name map (seeded from the dependency libraries), the scope stack, the
/// parent links, the annotation side tables and the collected errors.
///
/// A context is built fresh per run and handed to every phase in turn, so
/// independent units never share analysis state. A target library that
/// already holds symbols from an earlier run is reset first.
///

use std::sync::Arc;

use indexmap::IndexMap;
use lasso::Rodeo;
use tracing::{debug, warn};

use crate::ast::{Ident, ParentMap};
use crate::source::Span;

use super::annotations::Annotations;
use super::error::SemanticError;
use super::library::{Library, BOOLEAN, BYTE, FLOAT, INTEGER, NULL};
use super::scope::ScopeStack;
use super::symbols::{SymbolId, TypeMode, TypeSymbol};

pub struct AnalysisContext<'a, 'ast> {
    pub library: &'a mut Library,
    pub interner: &'a Rodeo,
    pub parents: ParentMap<'ast>,
    pub globals: IndexMap<String, SymbolId>,
    pub scopes: ScopeStack,
    pub annotations: Annotations,
    pub errors: Vec<SemanticError>,
}

impl<'a, 'ast> AnalysisContext<'a, 'ast> {
    pub fn new(library: &'a mut Library, interner: &'a Rodeo, dependencies: &[Arc<Library>]) -> Self {
        if !library.symbols().is_empty() {
            debug!(library = library.name(), symbols = library.symbols().len(), "resetting target library");
            library.reset();
        }

        let mut globals = IndexMap::new();
        for dep in dependencies {
            library.link(dep.clone());
            for (name, id) in dep.globals() {
                if globals.contains_key(name) {
                    warn!(name, library = dep.name(), "global already provided by an earlier dependency");
                    continue;
                }
                globals.insert(name.to_string(), id);
            }
        }

        Self {
            library,
            interner,
            parents: ParentMap::new(),
            globals,
            scopes: ScopeStack::new(),
            annotations: Annotations::new(),
            errors: Vec::new(),
        }
    }

    pub fn name(&self, ident: Ident) -> &'a str {
        let interner: &'a Rodeo = self.interner;
        interner.resolve(&ident.symbol)
    }

    pub fn report(&mut self, error: SemanticError) {
        debug!(%error, start = error.span().start, "semantic error");
        self.errors.push(error);
    }

    /// Records `id` under `name` in the global map and the library. A taken
    /// name is reported as SameName and leaves the map unchanged.
    pub fn declare_global(&mut self, name: &str, id: SymbolId, span: Span) -> bool {
        if self.globals.contains_key(name) {
            self.report(SemanticError::same_name(name, span));
            return false;
        }
        self.globals.insert(name.to_string(), id);
        if let Err(err) = self.library.register_global(id) {
            self.report(err);
        }
        true
    }

    pub fn lookup_value(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .lookup(name)
            .or_else(|| self.globals.get(name).copied())
    }

    /// A global Type symbol by name.
    pub fn global_type(&self, name: &str) -> Option<SymbolId> {
        self.globals
            .get(name)
            .copied()
            .filter(|id| self.library.type_of(*id).is_some())
    }

    /// Like `global_type`, but a missing built-in is reported.
    pub fn builtin(&mut self, name: &str, span: Span) -> Option<SymbolId> {
        let found = self.global_type(name);
        if found.is_none() {
            self.report(SemanticError::not_found(name, span));
        }
        found
    }

    pub fn is_builtin(&self, id: SymbolId, name: &str) -> bool {
        self.globals.get(name) == Some(&id)
    }

    pub fn type_symbol(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.library.type_of(id)
    }

    pub fn mode(&self, id: SymbolId) -> Option<TypeMode> {
        self.type_symbol(id).map(|t| t.mode)
    }

    pub fn is_pointer(&self, id: SymbolId) -> bool {
        self.mode(id) == Some(TypeMode::Pointer)
    }

    pub fn is_function_type(&self, id: SymbolId) -> bool {
        self.mode(id) == Some(TypeMode::Function)
    }

    pub fn is_numeric(&self, id: SymbolId) -> bool {
        [BYTE, INTEGER, FLOAT].iter().any(|name| self.is_builtin(id, name))
    }

    pub fn is_integer(&self, id: SymbolId) -> bool {
        self.is_builtin(id, INTEGER)
    }

    pub fn is_boolean_or_pointer(&self, id: SymbolId) -> bool {
        self.is_builtin(id, BOOLEAN) || self.is_pointer(id)
    }

    /// The type of the `null` literal.
    pub fn is_null_pointer(&self, id: SymbolId) -> bool {
        self.pointee(id).is_some_and(|p| self.is_builtin(p, NULL))
    }

    pub fn pointee(&self, id: SymbolId) -> Option<SymbolId> {
        self.type_symbol(id).and_then(|t| t.pointee)
    }

    pub fn pointer_to(&mut self, id: SymbolId) -> SymbolId {
        self.library.pointer_to(id)
    }

    pub fn function_type(&mut self, parameters: &[SymbolId], return_type: SymbolId) -> SymbolId {
        self.library.get_function_type(parameters, return_type)
    }

    pub fn type_name(&self, id: SymbolId) -> String {
        self.library.name_of(id)
    }
}
