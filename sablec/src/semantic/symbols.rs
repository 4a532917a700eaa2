//!
//! Symbols
//!
//! A Symbol is a named entity owned by exactly one Library: a Type, a
//! Variable, a Function or a Label. Symbols refer to each other through
//! `SymbolId`, which names the owning library, so a symbol from a dependency
//! and one from the unit being analyzed can sit side by side in the same
//! type graph.
//!
//! Type identity is id identity: pointer and function types are interned by
//! their Library, so two structurally equal types share one `SymbolId`.
//!

use std::fmt;

use indexmap::IndexMap;

use crate::ast::NodeId;
use crate::source::Span;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryId(pub u32);

impl fmt::Debug for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lib{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    pub library: LibraryId,
    pub index: u32,
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.library, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeMode {
    Primitive,
    Class,
    Pointer,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub mode: TypeMode,
    /// Pointer mode only.
    pub pointee: Option<SymbolId>,
    /// Function mode only.
    pub parameter_types: Vec<SymbolId>,
    /// Function mode only.
    pub return_type: Option<SymbolId>,
    /// Class mode only, in declaration order.
    pub members: IndexMap<String, SymbolId>,
}

impl TypeSymbol {
    pub fn new(mode: TypeMode) -> Self {
        Self {
            mode,
            pointee: None,
            parameter_types: Vec::new(),
            return_type: None,
            members: IndexMap::new(),
        }
    }

    pub fn pointer(pointee: SymbolId) -> Self {
        Self {
            pointee: Some(pointee),
            ..Self::new(TypeMode::Pointer)
        }
    }

    pub fn function(parameter_types: Vec<SymbolId>, return_type: SymbolId) -> Self {
        Self {
            parameter_types,
            return_type: Some(return_type),
            ..Self::new(TypeMode::Function)
        }
    }

    /// Primitive and Class types hold values; pointers and signatures do not.
    pub fn is_value(&self) -> bool {
        matches!(self.mode, TypeMode::Primitive | TypeMode::Class)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionSymbol {
    /// Parameters, locals and labels, in registration order.
    pub locals: Vec<SymbolId>,
    pub labels: IndexMap<String, SymbolId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Type(TypeSymbol),
    Variable { is_parameter: bool },
    Function(FunctionSymbol),
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub library: LibraryId,
    pub kind: SymbolKind,
    /// A Variable's declared type, a Function's signature type.
    pub ty: Option<SymbolId>,
    pub parent_function: Option<SymbolId>,
    pub parent_type: Option<SymbolId>,
    pub declaration: Option<NodeId>,
    pub span: Span,
}

impl Symbol {
    pub fn new(name: impl Into<String>, library: LibraryId, kind: SymbolKind, span: Span) -> Self {
        Self {
            name: name.into(),
            library,
            kind,
            ty: None,
            parent_function: None,
            parent_type: None,
            declaration: None,
            span,
        }
    }

    pub fn as_type(&self) -> Option<&TypeSymbol> {
        match &self.kind {
            SymbolKind::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_type_mut(&mut self) -> Option<&mut TypeSymbol> {
        match &mut self.kind {
            SymbolKind::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match &self.kind {
            SymbolKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionSymbol> {
        match &mut self.kind {
            SymbolKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Type(_))
    }

    /// Variables and functions can appear as expression values.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { .. } | SymbolKind::Function(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SymbolKind::Type(_) => "type",
            SymbolKind::Variable { is_parameter: true } => "param",
            SymbolKind::Variable { is_parameter: false } => "var",
            SymbolKind::Function(_) => "fn",
            SymbolKind::Label => "label",
        }
    }
}
