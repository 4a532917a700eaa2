///
/// Library - Symbol Arena and Type Interning
///
/// A Library owns every Symbol created while analyzing one compilation unit.
/// It keeps:
///
/// - The symbol arena, addressed by `SymbolId`
/// - An ordered global name map (global names are unique)
/// - Two intern caches, pointer types keyed by pointee and function types
///   keyed by (parameter types, return type)
/// - Links to the dependency libraries whose symbols this one may refer to
///
/// Interning consults dependency caches before allocating, so a pointer or
/// signature type built from dependency symbols has one identity no matter
/// which library asks for it first.
///

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;

use crate::ast::NodeId;
use crate::source::Span;

use super::error::{SemanticError, SemanticResult};
use super::symbols::{FunctionSymbol, LibraryId, Symbol, SymbolId, SymbolKind, TypeMode, TypeSymbol};

pub const VOID: &str = "Void";
pub const BOOLEAN: &str = "Boolean";
pub const INTEGER: &str = "Integer";
pub const FLOAT: &str = "Float";
pub const BYTE: &str = "Byte";
pub const NULL: &str = "Null";

static NEXT_LIBRARY_ID: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
pub struct Library {
    id: LibraryId,
    name: String,
    symbols: Vec<Symbol>,
    globals: IndexMap<String, SymbolId>,
    pointer_types: HashMap<SymbolId, SymbolId>,
    function_types: HashMap<(Vec<SymbolId>, SymbolId), SymbolId>,
    dependencies: Vec<Arc<Library>>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LibraryId(NEXT_LIBRARY_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            symbols: Vec::new(),
            globals: IndexMap::new(),
            pointer_types: HashMap::new(),
            function_types: HashMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// The built-in library: the primitive types plus the pointer types the
    /// string and null literals evaluate to.
    pub fn core() -> Self {
        let mut lib = Self::new("core");
        for name in [VOID, BOOLEAN, INTEGER, FLOAT] {
            lib.primitive(name);
        }
        let byte = lib.primitive(BYTE);
        let null = lib.primitive(NULL);
        lib.pointer_to(byte);
        lib.pointer_to(null);
        lib
    }

    fn primitive(&mut self, name: &str) -> SymbolId {
        let id = self.alloc(Symbol::new(
            name,
            self.id,
            SymbolKind::Type(TypeSymbol::new(TypeMode::Primitive)),
            Span::dummy(),
        ));
        self.globals.insert(name.to_string(), id);
        id
    }

    /// Drops every symbol and cache this library owns. The id, the name and
    /// the linked dependencies are kept.
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.globals.clear();
        self.pointer_types.clear();
        self.function_types.clear();
    }

    pub fn id(&self) -> LibraryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&mut self, dependency: Arc<Library>) {
        if self.dependencies.iter().all(|d| d.id != dependency.id) {
            self.dependencies.push(dependency);
        }
    }

    pub fn dependencies(&self) -> &[Arc<Library>] {
        &self.dependencies
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn globals(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.globals.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Resolves an id owned by this library or any library it links.
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        if id.library == self.id {
            return self.symbols.get(id.index as usize);
        }
        self.dependencies.iter().find_map(|dep| dep.symbol(id))
    }

    /// Only symbols owned by this library can be edited.
    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.library != self.id {
            return None;
        }
        self.symbols.get_mut(id.index as usize)
    }

    pub fn global(&self, name: &str) -> Option<SymbolId> {
        self.globals.get(name).copied()
    }

    /// This library's globals first, then each dependency's in link order.
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.global(name)
            .or_else(|| self.dependencies.iter().find_map(|dep| dep.lookup_global(name)))
    }

    pub fn name_of(&self, id: SymbolId) -> String {
        self.symbol(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("<unknown {:?}>", id))
    }

    pub fn type_of(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.symbol(id).and_then(Symbol::as_type)
    }

    fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId {
            library: self.id,
            index: self.symbols.len() as u32,
        };
        self.symbols.push(symbol);
        id
    }

    pub fn register_global(&mut self, id: SymbolId) -> SemanticResult<()> {
        let Some(symbol) = self.symbol(id) else {
            return Err(SemanticError::not_found(format!("{:?}", id), Span::dummy()));
        };
        if self.globals.contains_key(&symbol.name) {
            return Err(SemanticError::same_name(symbol.name.clone(), symbol.span));
        }
        let name = symbol.name.clone();
        self.globals.insert(name, id);
        Ok(())
    }

    /// `Name` allocates a Class-mode type; `Name**` resolves `Name` among
    /// the visible globals and interns the pointer type.
    pub fn create_type(&mut self, name: &str, is_global: bool, span: Span) -> SemanticResult<SymbolId> {
        let base = name.trim_end_matches('*');
        let depth = name.len() - base.len();

        if depth > 0 {
            let pointee = self
                .lookup_global(base)
                .filter(|id| self.type_of(*id).is_some())
                .ok_or_else(|| SemanticError::not_found(base, span))?;
            return Ok(self.get_pointer_type(pointee, depth));
        }

        if is_global && self.globals.contains_key(name) {
            return Err(SemanticError::same_name(name, span));
        }
        let id = self.alloc(Symbol::new(
            name,
            self.id,
            SymbolKind::Type(TypeSymbol::new(TypeMode::Class)),
            span,
        ));
        if is_global {
            self.globals.insert(name.to_string(), id);
        }
        Ok(id)
    }

    pub fn get_pointer_type(&mut self, pointee: SymbolId, depth: usize) -> SymbolId {
        (0..depth).fold(pointee, |ty, _| self.pointer_to(ty))
    }

    fn cached_pointer(&self, pointee: SymbolId) -> Option<SymbolId> {
        self.pointer_types
            .get(&pointee)
            .copied()
            .or_else(|| self.dependencies.iter().find_map(|dep| dep.cached_pointer(pointee)))
    }

    pub fn pointer_to(&mut self, pointee: SymbolId) -> SymbolId {
        if let Some(id) = self.cached_pointer(pointee) {
            return id;
        }

        let name = format!("{}*", self.name_of(pointee));
        let id = self.alloc(Symbol::new(
            name.clone(),
            self.id,
            SymbolKind::Type(TypeSymbol::pointer(pointee)),
            Span::dummy(),
        ));
        self.pointer_types.insert(pointee, id);
        self.globals.entry(name).or_insert(id);
        id
    }

    fn cached_function(&self, key: &(Vec<SymbolId>, SymbolId)) -> Option<SymbolId> {
        self.function_types
            .get(key)
            .copied()
            .or_else(|| self.dependencies.iter().find_map(|dep| dep.cached_function(key)))
    }

    pub fn get_function_type(&mut self, parameters: &[SymbolId], return_type: SymbolId) -> SymbolId {
        let key = (parameters.to_vec(), return_type);
        if let Some(id) = self.cached_function(&key) {
            return id;
        }

        let params: Vec<String> = parameters.iter().map(|p| self.name_of(*p)).collect();
        let name = format!("function({}) : {}", params.join(", "), self.name_of(return_type));
        let id = self.alloc(Symbol::new(
            name.clone(),
            self.id,
            SymbolKind::Type(TypeSymbol::function(key.0.clone(), return_type)),
            Span::dummy(),
        ));
        self.function_types.insert(key, id);
        self.globals.entry(name).or_insert(id);
        id
    }

    pub fn create_variable(&mut self, name: &str, span: Span, is_parameter: bool) -> SymbolId {
        self.alloc(Symbol::new(name, self.id, SymbolKind::Variable { is_parameter }, span))
    }

    pub fn create_function(&mut self, name: &str, span: Span) -> SymbolId {
        self.alloc(Symbol::new(
            name,
            self.id,
            SymbolKind::Function(FunctionSymbol::default()),
            span,
        ))
    }

    pub fn create_label(&mut self, name: &str, span: Span) -> SymbolId {
        self.alloc(Symbol::new(name, self.id, SymbolKind::Label, span))
    }

    pub fn set_type(&mut self, id: SymbolId, ty: SymbolId) {
        if let Some(symbol) = self.symbol_mut(id) {
            symbol.ty = Some(ty);
        }
    }

    pub fn set_declaration(&mut self, id: SymbolId, node: NodeId) {
        if let Some(symbol) = self.symbol_mut(id) {
            symbol.declaration = Some(node);
        }
    }

    fn name_and_span(&self, id: SymbolId) -> SemanticResult<(String, Span)> {
        self.symbol(id)
            .map(|s| (s.name.clone(), s.span))
            .ok_or_else(|| SemanticError::not_found(format!("{:?}", id), Span::dummy()))
    }

    /// Adds `member` to a Class type's member set.
    pub fn add_member(&mut self, class: SymbolId, member: SymbolId) -> SemanticResult<()> {
        let (name, span) = self.name_and_span(member)?;
        let class_name = self.name_of(class);
        let members = self
            .symbol_mut(class)
            .and_then(Symbol::as_type_mut)
            .map(|t| &mut t.members)
            .ok_or_else(|| SemanticError::not_found(class_name, span))?;
        if members.contains_key(&name) {
            return Err(SemanticError::same_name(name, span));
        }
        members.insert(name, member);

        if let Some(symbol) = self.symbol_mut(member) {
            symbol.parent_type = Some(class);
        }
        Ok(())
    }

    /// Adds `local` to a Function's locals. Names are unique across the whole
    /// function, nested blocks included.
    pub fn add_local(&mut self, function: SymbolId, local: SymbolId) -> SemanticResult<()> {
        let (name, span) = self.name_and_span(local)?;
        let function_name = self.name_of(function);
        let locals = self
            .symbol(function)
            .and_then(Symbol::as_function)
            .map(|f| f.locals.clone())
            .ok_or_else(|| SemanticError::not_found(function_name, span))?;
        if locals.iter().any(|l| self.symbol(*l).is_some_and(|s| s.name == name)) {
            return Err(SemanticError::same_name(name, span));
        }

        if let Some(f) = self.symbol_mut(function).and_then(Symbol::as_function_mut) {
            f.locals.push(local);
        }
        if let Some(symbol) = self.symbol_mut(local) {
            symbol.parent_function = Some(function);
        }
        Ok(())
    }

    /// Records a label in its function's label map and among its locals.
    pub fn add_label(&mut self, function: SymbolId, label: SymbolId) -> SemanticResult<()> {
        let (name, span) = self.name_and_span(label)?;
        let function_name = self.name_of(function);
        let labels = self
            .symbol_mut(function)
            .and_then(Symbol::as_function_mut)
            .map(|f| &mut f.labels)
            .ok_or_else(|| SemanticError::not_found(function_name, span))?;
        if labels.contains_key(&name) {
            return Err(SemanticError::same_name(name, span));
        }
        labels.insert(name, label);
        self.add_local(function, label)
    }

    /// One line per owned symbol: kind, name and, when known, its type.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for symbol in &self.symbols {
            out.push_str(&format!("{} {}", symbol.kind_name(), symbol.name));
            if let Some(ty) = symbol.ty {
                out.push_str(&format!(" : {}", self.name_of(ty)));
            }
            if let Some(parent) = symbol.parent_type.or(symbol.parent_function) {
                out.push_str(&format!(" (in {})", self.name_of(parent)));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_core() -> (Arc<Library>, Library) {
        let core = Arc::new(Library::core());
        let mut lib = Library::new("test");
        lib.link(core.clone());
        (core, lib)
    }

    #[test]
    fn test_core_library() {
        let core = Library::core();
        for name in [VOID, BOOLEAN, INTEGER, FLOAT, BYTE, NULL, "Byte*", "Null*"] {
            assert!(core.global(name).is_some(), "missing {}", name);
        }
        let integer = core.global(INTEGER).unwrap();
        assert_eq!(core.type_of(integer).map(|t| t.mode), Some(TypeMode::Primitive));
    }

    #[test]
    fn test_pointer_interning() {
        let (core, mut lib) = with_core();
        let integer = core.global(INTEGER).unwrap();

        let first = lib.get_pointer_type(integer, 1);
        let second = lib.get_pointer_type(integer, 1);
        assert_eq!(first, second);
        assert_eq!(lib.name_of(first), "Integer*");

        let double = lib.get_pointer_type(integer, 2);
        assert_eq!(lib.name_of(double), "Integer**");
        assert_eq!(lib.type_of(double).and_then(|t| t.pointee), Some(first));
        assert_eq!(lib.get_pointer_type(integer, 0), integer);
    }

    #[test]
    fn test_pointer_interning_reuses_dependency_cache() {
        let (core, mut lib) = with_core();
        let byte = core.global(BYTE).unwrap();
        let byte_ptr = core.global("Byte*").unwrap();
        assert_eq!(lib.pointer_to(byte), byte_ptr);
        assert!(lib.symbols().is_empty());
    }

    #[test]
    fn test_function_interning() {
        let (core, mut lib) = with_core();
        let integer = core.global(INTEGER).unwrap();
        let boolean = core.global(BOOLEAN).unwrap();

        let first = lib.get_function_type(&[integer], boolean);
        let second = lib.get_function_type(&[integer], boolean);
        assert_eq!(first, second);
        assert_eq!(lib.name_of(first), "function(Integer) : Boolean");

        let other = lib.get_function_type(&[integer, integer], boolean);
        assert_ne!(first, other);
        assert_eq!(lib.name_of(other), "function(Integer, Integer) : Boolean");
    }

    #[test]
    fn test_create_type() {
        let (_core, mut lib) = with_core();
        let node = lib.create_type("Node", true, Span::dummy()).unwrap();
        assert_eq!(lib.type_of(node).map(|t| t.mode), Some(TypeMode::Class));

        let node_ptr = lib.create_type("Node**", false, Span::dummy()).unwrap();
        assert_eq!(lib.name_of(node_ptr), "Node**");
        assert_eq!(lib.create_type("Node**", false, Span::dummy()).unwrap(), node_ptr);

        assert!(matches!(
            lib.create_type("Node", true, Span::dummy()),
            Err(SemanticError::SameName { .. })
        ));
        assert!(matches!(
            lib.create_type("Missing*", false, Span::dummy()),
            Err(SemanticError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn test_register_global_same_name() {
        let mut lib = Library::new("test");
        let first = lib.create_variable("x", Span::dummy(), false);
        let second = lib.create_variable("x", Span::new(10, 11, 0), false);
        lib.register_global(first).unwrap();
        match lib.register_global(second) {
            Err(SemanticError::SameName { name, span }) => {
                assert_eq!(name, "x");
                assert_eq!(span, Span::new(10, 11, 0));
            }
            other => panic!("expected SameName, got {:?}", other),
        }
    }

    #[test]
    fn test_locals_and_labels() {
        let mut lib = Library::new("test");
        let func = lib.create_function("f", Span::dummy());
        let a = lib.create_variable("a", Span::dummy(), true);
        let top = lib.create_label("top", Span::dummy());
        let dup = lib.create_variable("top", Span::dummy(), false);

        lib.add_local(func, a).unwrap();
        lib.add_label(func, top).unwrap();
        assert!(matches!(lib.add_local(func, dup), Err(SemanticError::SameName { .. })));

        let f = lib.symbol(func).and_then(Symbol::as_function).unwrap();
        assert_eq!(f.locals, vec![a, top]);
        assert_eq!(f.labels.get("top"), Some(&top));
        assert_eq!(lib.symbol(a).unwrap().parent_function, Some(func));
    }

    #[test]
    fn test_class_members() {
        let mut lib = Library::new("test");
        let class = lib.create_type("Point", true, Span::dummy()).unwrap();
        let x = lib.create_variable("x", Span::dummy(), false);
        let x_again = lib.create_variable("x", Span::dummy(), false);

        lib.add_member(class, x).unwrap();
        assert!(matches!(lib.add_member(class, x_again), Err(SemanticError::SameName { .. })));
        assert_eq!(lib.type_of(class).unwrap().members.get("x"), Some(&x));
        assert_eq!(lib.symbol(x).unwrap().parent_type, Some(class));
    }

    #[test]
    fn test_describe() {
        let (core, mut lib) = with_core();
        let integer = core.global(INTEGER).unwrap();
        let x = lib.create_variable("x", Span::dummy(), false);
        lib.set_type(x, integer);
        assert_eq!(lib.describe(), "var x : Integer\n");
    }
}
