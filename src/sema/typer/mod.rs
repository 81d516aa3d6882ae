// src/sema/typer/mod.rs
//! The typing pass.
//!
//! Consumes the scope tree the namer built and annotates every
//! expression with a type. Carries the per-pass state the checks need:
//! the loop depth, the position of the local definition currently being
//! initialized, the return-type collection of each open lambda, and the
//! stack of lambdas for capture analysis.

mod expr;
mod lambda;
mod stmt;

use crate::errors::SemanticError;
use crate::frontend::ast::*;
use crate::frontend::{Interner, Span, Symbol};
use crate::sema::TypeError;
use crate::sema::scope::{ScopeKind, ScopeStack};
use crate::sema::symbol::{SymbolId, SymbolKind};
use crate::sema::types::{ClassGraph, Type};

pub struct Typer<'a> {
    scopes: ScopeStack,
    classes: ClassGraph,
    errors: Vec<TypeError>,
    interner: &'a Interner,
    loop_level: u32,
    /// Position of the local `var`/typed definition whose initializer is
    /// being typed; makes `var x = x + 1` fail resolution
    local_var_def_pos: Option<Span>,
    /// Return types collected per open block-bodied lambda
    type_list_stack: Vec<Vec<Type>>,
    /// Names of locals whose initializers are being typed
    var_list_stack: Vec<Symbol>,
    /// Open lambdas, innermost last, for capture recording
    lambda_stack: Vec<SymbolId>,
}

impl<'a> Typer<'a> {
    pub fn run(
        program: &mut Program,
        scopes: ScopeStack,
        classes: ClassGraph,
        interner: &'a Interner,
    ) -> (ScopeStack, ClassGraph, Vec<TypeError>) {
        let mut typer = Typer {
            scopes,
            classes,
            errors: Vec::new(),
            interner,
            loop_level: 0,
            local_var_def_pos: None,
            type_list_stack: Vec::new(),
            var_list_stack: Vec::new(),
            lambda_stack: Vec::new(),
        };
        for class in &mut program.classes {
            typer.visit_class(class);
        }
        (typer.scopes, typer.classes, typer.errors)
    }

    fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    fn display(&self, ty: &Type) -> String {
        self.classes.display(ty, self.interner)
    }

    fn name(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    fn visit_class(&mut self, class: &mut ClassDef) {
        let Some(symbol) = class.symbol else {
            return;
        };
        let scope = self.scopes.symbol(symbol).as_class().unwrap().scope;
        self.scopes.open(scope);
        for field in &mut class.fields {
            if let FieldDef::Method(method) = field {
                self.visit_method(method);
            }
        }
        self.scopes.close();
    }

    fn visit_method(&mut self, method: &mut MethodDef) {
        let Some(symbol) = method.symbol else {
            return;
        };
        let info = self.scopes.symbol(symbol).as_method().unwrap();
        let (scope, ret) = (info.scope, (*info.ty.return_type).clone());
        self.scopes.open(scope);
        if let Some(body) = &mut method.body {
            self.visit_block(body);
            if !ret.is_void() && !body.returns {
                self.add_error(
                    SemanticError::MissingReturn {
                        span: body.span.into(),
                    },
                    body.span,
                );
            }
        }
        self.scopes.close();
    }

    /// True when the innermost function-like frame is a lambda
    fn in_lambda_frame(&self) -> bool {
        self.scopes
            .formal_or_lambda_scope()
            .map(|s| self.scopes.scope(s).kind == ScopeKind::Lambda)
            .unwrap_or(false)
    }

    fn current_method_is_static(&self) -> bool {
        self.scopes
            .current_method()
            .and_then(|m| self.scopes.symbol(m).as_method().map(|m| m.is_static))
            .unwrap_or(false)
    }

    fn current_method_name(&self) -> String {
        self.scopes
            .current_method()
            .map(|m| self.name(self.scopes.symbol(m).name))
            .unwrap_or_default()
    }

    fn current_class_type(&self) -> Type {
        self.scopes
            .current_class()
            .and_then(|c| self.scopes.symbol(c).as_class().map(|c| Type::Class(c.class)))
            .unwrap_or(Type::Error)
    }

    /// A variable resolved inside one or more lambdas whose frames sit
    /// above its defining scope is captured by each of them. Class and
    /// global scopes never capture.
    fn record_capture(&mut self, var: SymbolId) {
        if self.lambda_stack.is_empty() {
            return;
        }
        let domain = self.scopes.symbol(var).domain;
        let domain_kind = self.scopes.scope(domain).kind;
        if domain_kind.is_class() || domain == self.scopes.global {
            return;
        }
        let Some(domain_pos) = self.scopes.stack_position(domain) else {
            return;
        };
        for i in 0..self.lambda_stack.len() {
            let lambda = self.lambda_stack[i];
            let lambda_scope = self.scopes.symbol(lambda).as_lambda().unwrap().scope;
            let Some(lambda_pos) = self.scopes.stack_position(lambda_scope) else {
                continue;
            };
            if domain_pos < lambda_pos {
                if let SymbolKind::Lambda(l) = &mut self.scopes.symbol_mut(lambda).kind {
                    if !l.captures.contains(&var) {
                        l.captures.push(var);
                    }
                }
            }
        }
    }
}
