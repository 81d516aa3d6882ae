// src/sema/symbol.rs

use crate::frontend::{Span, Symbol};
use crate::sema::scope::ScopeId;
use crate::sema::types::{ClassId, FunctionType, Type};
use smallvec::SmallVec;

/// Identity of a symbol in the analysis arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Abstract method names a class still has to override
pub type NotOverride = SmallVec<[Symbol; 4]>;

/// Captured variables of a lambda, in order of first reference
pub type CaptureList = SmallVec<[SymbolId; 4]>;

#[derive(Debug)]
pub struct SymbolEntry {
    pub name: Symbol,
    pub pos: Span,
    /// Scope this symbol was declared in
    pub domain: ScopeId,
    pub kind: SymbolKind,
}

#[derive(Debug)]
pub enum SymbolKind {
    Class(ClassSymbol),
    Method(MethodSymbol),
    Var(VarSymbol),
    Lambda(LambdaSymbol),
}

#[derive(Debug)]
pub struct ClassSymbol {
    pub class: ClassId,
    pub scope: ScopeId,
    pub base: Option<SymbolId>,
    pub is_abstract: bool,
    pub not_override: NotOverride,
    pub is_main: bool,
}

#[derive(Debug)]
pub struct MethodSymbol {
    pub ty: FunctionType,
    pub owner: ClassId,
    pub is_static: bool,
    pub is_abstract: bool,
    pub scope: ScopeId,
    pub is_main: bool,
}

/// `ty` is None for a `var` local until its initializer has been typed
#[derive(Debug)]
pub struct VarSymbol {
    pub ty: Option<Type>,
}

/// Synthetic symbol for a lambda, named `lambda@(line,col)`. The return
/// type stays pending until the typer infers it.
#[derive(Debug)]
pub struct LambdaSymbol {
    pub params: Vec<Type>,
    pub ret: Option<Type>,
    pub scope: ScopeId,
    /// Expression-bodied lambdas get an extra nested local scope
    pub local_scope: Option<ScopeId>,
    pub captures: CaptureList,
}

impl SymbolEntry {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method(_))
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, SymbolKind::Var(_))
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match &self.kind {
            SymbolKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match &self.kind {
            SymbolKind::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&VarSymbol> {
        match &self.kind {
            SymbolKind::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaSymbol> {
        match &self.kind {
            SymbolKind::Lambda(l) => Some(l),
            _ => None,
        }
    }
}
