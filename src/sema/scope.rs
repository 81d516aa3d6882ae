// src/sema/scope.rs

use crate::frontend::{Span, Symbol};
use crate::sema::symbol::{SymbolEntry, SymbolId, SymbolKind};
use crate::sema::types::ClassId;
use rustc_hash::FxHashMap;

/// Identity of a scope in the analysis arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Class(ClassId),
    /// Method parameter frame (owns `this` for non-static methods)
    Formal,
    Local,
    /// Lambda parameter frame; its body block nests inside
    Lambda,
}

impl ScopeKind {
    /// Frames searched by conflict detection inside a method body
    pub fn is_function_like(&self) -> bool {
        matches!(self, ScopeKind::Formal | ScopeKind::Local | ScopeKind::Lambda)
    }

    pub fn is_class(&self) -> bool {
        matches!(self, ScopeKind::Class(_))
    }
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// For class scopes: the superclass scope. Otherwise the lexical parent.
    pub parent: Option<ScopeId>,
    /// Class symbol for class scopes, method symbol for formal scopes,
    /// lambda symbol for lambda scopes
    pub owner: Option<SymbolId>,
    entries: FxHashMap<Symbol, SymbolId>,
    order: Vec<SymbolId>,
    /// Nested scopes in creation order, for the scope dump
    pub children: Vec<ScopeId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            owner: None,
            entries: FxHashMap::default(),
            order: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn get(&self, name: Symbol) -> Option<SymbolId> {
        self.entries.get(&name).copied()
    }

    /// Declared symbols in declaration order
    pub fn symbols(&self) -> &[SymbolId] {
        &self.order
    }
}

/// The shared scope structure of both analysis passes: an arena of scopes
/// and symbols plus the stack of currently open scopes.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    symbols: Vec<SymbolEntry>,
    stack: Vec<ScopeId>,
    class_symbols: FxHashMap<ClassId, SymbolId>,
    pub global: ScopeId,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        let global = Scope::new(ScopeKind::Global, None);
        Self {
            scopes: vec![global],
            symbols: Vec::new(),
            stack: vec![ScopeId(0)],
            class_symbols: FxHashMap::default(),
            global: ScopeId(0),
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolEntry {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.symbols[id.0 as usize]
    }

    /// Create a class scope whose parent is the superclass scope. Class
    /// scopes are not `children` of anything; the dump lists them flat.
    pub fn new_class_scope(&mut self, class: ClassId, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(ScopeKind::Class(class), parent));
        id
    }

    /// Create a formal/local/lambda scope nested inside `parent`
    pub fn new_nested_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(parent)));
        self.scope_mut(parent).children.push(id);
        id
    }

    pub fn set_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.scope_mut(scope).owner = Some(owner);
    }

    /// Open a scope. Opening a class scope opens its ancestor class
    /// scopes underneath it, so inherited members resolve by plain
    /// stack search.
    pub fn open(&mut self, id: ScopeId) {
        if self.scope(id).kind.is_class() {
            if let Some(parent) = self.scope(id).parent {
                self.open(parent);
            }
        }
        self.stack.push(id);
    }

    /// Close the innermost scope; a class scope takes its ancestor class
    /// scopes with it.
    pub fn close(&mut self) {
        let popped = self.stack.pop().expect("scope stack underflow");
        if self.scope(popped).kind.is_class() {
            while let Some(&top) = self.stack.last() {
                if top != self.global && self.scope(top).kind.is_class() {
                    self.stack.pop();
                } else {
                    break;
                }
            }
        }
    }

    pub fn current(&self) -> ScopeId {
        *self.stack.last().expect("scope stack is never empty")
    }

    /// Open scopes, bottom of stack first
    pub fn frames(&self) -> &[ScopeId] {
        &self.stack
    }

    pub fn stack_position(&self, id: ScopeId) -> Option<usize> {
        self.stack.iter().position(|&s| s == id)
    }

    /// Declare a symbol in the current scope
    pub fn declare(&mut self, name: Symbol, pos: Span, kind: SymbolKind) -> SymbolId {
        let domain = self.current();
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolEntry {
            name,
            pos,
            domain,
            kind,
        });
        if let SymbolKind::Class(class_symbol) = &self.symbols[id.0 as usize].kind {
            self.class_symbols.insert(class_symbol.class, id);
        }
        let scope = self.scope_mut(domain);
        scope.entries.insert(name, id);
        scope.order.push(id);
        id
    }

    /// Search for a declaration the new name would clash with. Inside a
    /// function-like frame the search stops at the class boundary; inside
    /// a class scope it walks the inheritance chain, which is what makes
    /// inherited members visible as conflicts.
    pub fn find_conflict(&self, name: Symbol) -> Option<SymbolId> {
        let current = self.current();
        if self.scope(current).kind.is_function_like() {
            for &s in self.stack.iter().rev() {
                let scope = self.scope(s);
                if !scope.kind.is_function_like() {
                    break;
                }
                if let Some(id) = scope.get(name) {
                    return Some(id);
                }
            }
            None
        } else {
            self.lookup_in_chain(current, name)
        }
    }

    fn lookup_in_chain(&self, mut scope: ScopeId, name: Symbol) -> Option<SymbolId> {
        loop {
            if let Some(id) = self.scope(scope).get(name) {
                return Some(id);
            }
            scope = self.scope(scope).parent?;
        }
    }

    pub fn lookup(&self, name: Symbol) -> Option<SymbolId> {
        for &s in self.stack.iter().rev() {
            if let Some(id) = self.scope(s).get(name) {
                return Some(id);
            }
        }
        None
    }

    /// `lookup`, but in local scopes a symbol declared at or after `pos`
    /// is invisible. Catches `var x = x + 1`.
    pub fn lookup_before(&self, name: Symbol, pos: Span) -> Option<SymbolId> {
        for &s in self.stack.iter().rev() {
            let scope = self.scope(s);
            if let Some(id) = scope.get(name) {
                if scope.kind == ScopeKind::Local && self.symbol(id).pos.start >= pos.start {
                    continue;
                }
                return Some(id);
            }
        }
        None
    }

    /// Look up a member in a class scope and its ancestors
    pub fn lookup_member(&self, class_scope: ScopeId, name: Symbol) -> Option<SymbolId> {
        self.lookup_in_chain(class_scope, name)
    }

    pub fn lookup_class(&self, name: Symbol) -> Option<SymbolId> {
        let id = self.scope(self.global).get(name)?;
        self.symbol(id).is_class().then_some(id)
    }

    pub fn class_symbol(&self, class: ClassId) -> SymbolId {
        self.class_symbols[&class]
    }

    /// Symbol of the innermost enclosing class
    pub fn current_class(&self) -> Option<SymbolId> {
        for &s in self.stack.iter().rev() {
            let scope = self.scope(s);
            if scope.kind.is_class() {
                return scope.owner;
            }
        }
        None
    }

    /// Symbol of the innermost enclosing method
    pub fn current_method(&self) -> Option<SymbolId> {
        for &s in self.stack.iter().rev() {
            let scope = self.scope(s);
            if scope.kind == ScopeKind::Formal {
                return scope.owner;
            }
        }
        None
    }

    /// Innermost function-like frame: a formal or lambda scope
    pub fn formal_or_lambda_scope(&self) -> Option<ScopeId> {
        for &s in self.stack.iter().rev() {
            let kind = self.scope(s).kind;
            if kind == ScopeKind::Formal || kind == ScopeKind::Lambda {
                return Some(s);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Interner, Span};
    use crate::sema::symbol::{SymbolKind, VarSymbol};
    use crate::sema::types::Type;

    fn var(ty: Type) -> SymbolKind {
        SymbolKind::Var(VarSymbol { ty: Some(ty) })
    }

    fn at(offset: usize) -> Span {
        Span::new(offset, offset + 1, 1, offset as u32 + 1)
    }

    #[test]
    fn declare_and_lookup_through_stack() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");

        let formal = scopes.new_nested_scope(ScopeKind::Formal, scopes.global);
        scopes.open(formal);
        let sid = scopes.declare(x, at(0), var(Type::Int));

        let local = scopes.new_nested_scope(ScopeKind::Local, formal);
        scopes.open(local);
        assert_eq!(scopes.lookup(x), Some(sid));

        // inner declaration shadows the outer one
        let inner = scopes.declare(x, at(5), var(Type::Bool));
        assert_eq!(scopes.lookup(x), Some(inner));

        scopes.close();
        assert_eq!(scopes.lookup(x), Some(sid));
    }

    #[test]
    fn lookup_before_skips_later_locals() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");

        let formal = scopes.new_nested_scope(ScopeKind::Formal, scopes.global);
        scopes.open(formal);
        let param = scopes.declare(x, at(0), var(Type::Int));

        let local = scopes.new_nested_scope(ScopeKind::Local, formal);
        scopes.open(local);
        let shadow = scopes.declare(x, at(10), var(Type::Bool));

        // before the local declaration the param is visible
        assert_eq!(scopes.lookup_before(x, at(10)), Some(param));
        // after it, the local wins
        assert_eq!(scopes.lookup_before(x, at(20)), Some(shadow));
    }

    #[test]
    fn find_conflict_stops_at_class_boundary() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");

        // member variable in a class scope
        let class_scope = scopes.new_class_scope(crate::sema::types::ClassId(0), None);
        scopes.open(class_scope);
        scopes.declare(x, at(0), var(Type::Int));

        let formal = scopes.new_nested_scope(ScopeKind::Formal, class_scope);
        scopes.open(formal);
        let local = scopes.new_nested_scope(ScopeKind::Local, formal);
        scopes.open(local);

        // a local may silently shadow the member variable
        assert_eq!(scopes.find_conflict(x), None);

        // but a second local in the same method conflicts
        let first = scopes.declare(x, at(3), var(Type::Int));
        let nested = scopes.new_nested_scope(ScopeKind::Local, local);
        scopes.open(nested);
        assert_eq!(scopes.find_conflict(x), Some(first));
    }

    #[test]
    fn class_scope_chain_sees_inherited_members() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = interner.intern("x");

        let base_scope = scopes.new_class_scope(crate::sema::types::ClassId(0), None);
        scopes.open(base_scope);
        let inherited = scopes.declare(x, at(0), var(Type::Int));
        scopes.close();

        let sub_scope = scopes.new_class_scope(crate::sema::types::ClassId(1), Some(base_scope));
        scopes.open(sub_scope);
        // conflict search from the subclass scope walks the chain
        assert_eq!(scopes.find_conflict(x), Some(inherited));
        // opening the subclass scope also opened the base scope
        assert_eq!(scopes.lookup(x), Some(inherited));
        scopes.close();
        assert_eq!(scopes.current(), scopes.global);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let names: Vec<_> = ["c", "a", "b"]
            .iter()
            .map(|n| interner.intern(n))
            .collect();
        for (i, &n) in names.iter().enumerate() {
            scopes.declare(n, at(i), var(Type::Int));
        }
        let order: Vec<_> = scopes
            .scope(scopes.global)
            .symbols()
            .iter()
            .map(|&id| scopes.symbol(id).name)
            .collect();
        assert_eq!(order, names);
    }
}
