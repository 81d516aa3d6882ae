// src/sema/namer.rs
//! The name-resolution pass.
//!
//! Builds the class graph, checks inheritance, constructs class symbols
//! in topological order, resolves members (including overrides and the
//! abstract-method bookkeeping), and opens every method body once so all
//! local, lambda and parameter scopes exist before typing starts.

use crate::errors::SemanticError;
use crate::frontend::ast::*;
use crate::frontend::{Interner, Span};
use crate::sema::TypeError;
use crate::sema::resolve::resolve_type_lit;
use crate::sema::scope::{ScopeId, ScopeKind, ScopeStack};
use crate::sema::symbol::{
    ClassSymbol, LambdaSymbol, MethodSymbol, SymbolKind, VarSymbol,
};
use crate::sema::types::{ClassGraph, ClassId, FunctionType, Type};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub struct Namer<'a> {
    scopes: ScopeStack,
    classes: ClassGraph,
    errors: Vec<TypeError>,
    interner: &'a mut Interner,
}

impl<'a> Namer<'a> {
    pub fn run(
        program: &mut Program,
        interner: &'a mut Interner,
    ) -> (ScopeStack, ClassGraph, Vec<TypeError>) {
        let mut namer = Namer {
            scopes: ScopeStack::new(),
            classes: ClassGraph::new(),
            errors: Vec::new(),
            interner,
        };
        namer.visit_top_level(program);
        (namer.scopes, namer.classes, namer.errors)
    }

    fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    fn resolve_lit(&mut self, lit: &mut TypeLit) -> Type {
        resolve_type_lit(lit, &self.scopes, &mut self.errors, self.interner)
    }

    fn visit_top_level(&mut self, program: &mut Program) {
        program.global_scope = Some(self.scopes.global);
        let count = program.classes.len();

        // Conflicting class definitions: keep the first, drop the rest.
        let mut by_name: FxHashMap<crate::frontend::Symbol, usize> = FxHashMap::default();
        let mut kept = Vec::with_capacity(count);
        for (i, class) in program.classes.iter().enumerate() {
            if let Some(&earlier) = by_name.get(&class.id.name) {
                let earlier_span = program.classes[earlier].id.span;
                self.add_error(
                    SemanticError::DeclConflict {
                        name: self.interner.resolve(class.id.name).to_string(),
                        earlier: earlier_span.pos(),
                        span: class.id.span.into(),
                    },
                    class.id.span,
                );
            } else {
                by_name.insert(class.id.name, i);
                kept.push(i);
            }
        }

        // Resolve `extends`; an unknown parent degrades to no parent.
        let mut parent_idx: Vec<Option<usize>> = vec![None; count];
        for &i in &kept {
            let class = &program.classes[i];
            if let Some(parent) = class.parent {
                match by_name.get(&parent.name) {
                    Some(&p) => parent_idx[i] = Some(p),
                    None => {
                        self.add_error(
                            SemanticError::ClassNotFound {
                                name: self.interner.resolve(parent.name).to_string(),
                                span: class.id.span.into(),
                            },
                            class.id.span,
                        );
                        program.classes[i].parent = None;
                    }
                }
            }
        }

        self.check_cycles(program, &kept, &parent_idx);

        // Inheritance-phase errors stop everything downstream.
        if !self.errors.is_empty() {
            return;
        }

        // Class symbols, supers first, so each scope can chain to its base.
        let mut created: Vec<Option<ClassId>> = vec![None; count];
        for &i in &kept {
            self.create_class_symbol(program, i, &parent_idx, &mut created);
        }

        // Member resolution, supers first again.
        let mut resolved = vec![false; count];
        for &i in &kept {
            self.resolve_class(program, i, &parent_idx, &mut resolved);
        }

        self.locate_main(program);
    }

    /// Timestamp-based walk along parent pointers: nodes stamped with the
    /// current generation were reached in this very chain, so meeting one
    /// again means a cycle.
    fn check_cycles(&mut self, program: &Program, kept: &[usize], parent: &[Option<usize>]) {
        let mut visited: FxHashMap<usize, u32> =
            kept.iter().map(|&i| (i, 0)).collect();

        let mut time = 1u32;
        for &start in kept {
            if visited[&start] != 0 {
                continue;
            }
            let mut node = start;
            let mut from = None;
            loop {
                let stamp = visited[&node];
                if stamp == 0 {
                    visited.insert(node, time);
                    match parent[node] {
                        Some(p) => {
                            from = Some(node);
                            node = p;
                        }
                        None => break,
                    }
                } else if stamp == time {
                    let span = program.classes[from.expect("cycle needs an edge")].id.span;
                    self.add_error(
                        SemanticError::BadInheritance { span: span.into() },
                        span,
                    );
                    break;
                } else {
                    // reached an earlier chain, already known acyclic
                    break;
                }
            }
            time += 1;
        }
    }

    fn create_class_symbol(
        &mut self,
        program: &mut Program,
        i: usize,
        parent: &[Option<usize>],
        created: &mut Vec<Option<ClassId>>,
    ) {
        if created[i].is_some() {
            return;
        }
        if let Some(p) = parent[i] {
            self.create_class_symbol(program, p, parent, created);
        }

        let (base_class, base_symbol, base_scope) = match parent[i] {
            Some(p) => {
                let class = created[p].expect("super resolved first");
                let symbol = self.scopes.class_symbol(class);
                let scope = self.scopes.symbol(symbol).as_class().unwrap().scope;
                (Some(class), Some(symbol), Some(scope))
            }
            None => (None, None, None),
        };

        let def = &program.classes[i];
        let class = self.classes.add(def.id.name, base_class, def.is_abstract);
        let scope = self.scopes.new_class_scope(class, base_scope);
        let symbol = self.scopes.declare(
            def.id.name,
            def.id.span,
            SymbolKind::Class(ClassSymbol {
                class,
                scope,
                base: base_symbol,
                is_abstract: def.is_abstract,
                not_override: SmallVec::new(),
                is_main: false,
            }),
        );
        self.scopes.set_owner(scope, symbol);
        created[i] = Some(class);
        program.classes[i].symbol = Some(symbol);
    }

    fn resolve_class(
        &mut self,
        program: &mut Program,
        i: usize,
        parent: &[Option<usize>],
        resolved: &mut Vec<bool>,
    ) {
        if resolved[i] {
            return;
        }
        resolved[i] = true;
        if let Some(p) = parent[i] {
            self.resolve_class(program, p, parent, resolved);
        }

        let symbol = program.classes[i].symbol.expect("class symbol created");

        // Inherit the still-unimplemented abstract methods from the base.
        if let Some(p) = parent[i] {
            let base_symbol = program.classes[p].symbol.expect("base resolved");
            let inherited = self
                .scopes
                .symbol(base_symbol)
                .as_class()
                .unwrap()
                .not_override
                .clone();
            if let SymbolKind::Class(c) = &mut self.scopes.symbol_mut(symbol).kind {
                c.not_override = inherited;
            }
        }

        let info = self.scopes.symbol(symbol).as_class().unwrap();
        let (scope, class) = (info.scope, info.class);
        self.scopes.open(scope);
        let def = &mut program.classes[i];
        for field in &mut def.fields {
            match field {
                FieldDef::Var(var) => self.visit_member_var(var),
                FieldDef::Method(method) => self.visit_method(method, class),
            }
        }

        let not_override_left = !self
            .scopes
            .symbol(symbol)
            .as_class()
            .unwrap()
            .not_override
            .is_empty();
        if !def.is_abstract && not_override_left {
            self.add_error(
                SemanticError::NoAbstract {
                    name: self.interner.resolve(def.id.name).to_string(),
                    span: def.id.span.into(),
                },
                def.id.span,
            );
        }
        self.scopes.close();
    }

    fn visit_member_var(&mut self, def: &mut VarDef) {
        let ty = self.resolve_lit(def.type_lit.as_mut().expect("member vars are typed"));

        if let Some(earlier) = self.scopes.find_conflict(def.id.name) {
            let entry = self.scopes.symbol(earlier);
            if entry.is_var() && entry.domain != self.scopes.current() {
                self.add_error(
                    SemanticError::OverridingVar {
                        name: self.interner.resolve(def.id.name).to_string(),
                        span: def.id.span.into(),
                    },
                    def.id.span,
                );
            } else {
                let earlier_pos = entry.pos.pos();
                self.add_error(
                    SemanticError::DeclConflict {
                        name: self.interner.resolve(def.id.name).to_string(),
                        earlier: earlier_pos,
                        span: def.id.span.into(),
                    },
                    def.id.span,
                );
            }
            return;
        }

        if ty.is_void() {
            self.add_error(
                SemanticError::BadVarType {
                    name: self.interner.resolve(def.id.name).to_string(),
                    span: def.id.span.into(),
                },
                def.id.span,
            );
            return;
        }

        if ty.no_error() {
            let symbol = self.scopes.declare(
                def.id.name,
                def.id.span,
                SymbolKind::Var(VarSymbol { ty: Some(ty) }),
            );
            def.symbol = Some(symbol);
        }
    }

    fn visit_method(&mut self, method: &mut MethodDef, owner: ClassId) {
        if let Some(earlier) = self.scopes.find_conflict(method.id.name) {
            let entry = self.scopes.symbol(earlier);
            let earlier_pos = entry.pos.pos();
            if let Some(suspect) = entry.as_method() {
                if entry.domain != self.scopes.current()
                    && !suspect.is_static
                    && !method.is_static
                {
                    // Override candidate: only non-static over non-static,
                    // and an abstract method never overrides a concrete one.
                    if method.is_abstract && !suspect.is_abstract {
                        self.add_error(
                            SemanticError::DeclConflict {
                                name: self.interner.resolve(method.id.name).to_string(),
                                earlier: earlier_pos,
                                span: method.id.span.into(),
                            },
                            method.id.span,
                        );
                        return;
                    }

                    let suspect_ty = suspect.ty.clone();
                    let suspect_owner = suspect.owner;
                    let (fun_ty, formal) = self.type_method(method, owner);
                    if self.classes.subtype(
                        &Type::Function(fun_ty.clone()),
                        &Type::Function(suspect_ty),
                    ) {
                        self.declare_method(method, owner, fun_ty, formal);
                        if !method.is_abstract {
                            self.clear_not_override(method.id.name);
                        }
                    } else {
                        let parent_name = self.classes.info(suspect_owner).name;
                        self.add_error(
                            SemanticError::BadOverride {
                                name: self.interner.resolve(method.id.name).to_string(),
                                parent: self.interner.resolve(parent_name).to_string(),
                                span: method.id.span.into(),
                            },
                            method.id.span,
                        );
                    }
                    return;
                }
            }

            self.add_error(
                SemanticError::DeclConflict {
                    name: self.interner.resolve(method.id.name).to_string(),
                    earlier: earlier_pos,
                    span: method.id.span.into(),
                },
                method.id.span,
            );
            return;
        }

        let (fun_ty, formal) = self.type_method(method, owner);
        self.declare_method(method, owner, fun_ty, formal);
        if method.is_abstract {
            let current = self.scopes.current_class().expect("inside a class");
            if let SymbolKind::Class(c) = &mut self.scopes.symbol_mut(current).kind {
                c.not_override.push(method.id.name);
            }
        }
    }

    /// Resolve the signature and populate the formal scope (`this` plus
    /// the parameters). The body is not entered here.
    fn type_method(&mut self, method: &mut MethodDef, owner: ClassId) -> (FunctionType, ScopeId) {
        let ret = self.resolve_lit(&mut method.return_type);
        let formal = self
            .scopes
            .new_nested_scope(ScopeKind::Formal, self.scopes.current());
        self.scopes.open(formal);
        if !method.is_static {
            let this_name = self.interner.intern("this");
            self.scopes.declare(
                this_name,
                method.id.span,
                SymbolKind::Var(VarSymbol {
                    ty: Some(Type::Class(owner)),
                }),
            );
        }
        let mut params = Vec::with_capacity(method.params.len());
        for param in &mut method.params {
            self.visit_local_var_def(param);
            params.push(
                param
                    .type_lit
                    .as_ref()
                    .and_then(|lit| lit.ty.clone())
                    .unwrap_or(Type::Error),
            );
        }
        self.scopes.close();
        (
            FunctionType {
                params,
                return_type: Box::new(ret),
            },
            formal,
        )
    }

    fn declare_method(
        &mut self,
        method: &mut MethodDef,
        owner: ClassId,
        fun_ty: FunctionType,
        formal: ScopeId,
    ) {
        let symbol = self.scopes.declare(
            method.id.name,
            method.id.span,
            SymbolKind::Method(MethodSymbol {
                ty: fun_ty,
                owner,
                is_static: method.is_static,
                is_abstract: method.is_abstract,
                scope: formal,
                is_main: false,
            }),
        );
        self.scopes.set_owner(formal, symbol);
        method.symbol = Some(symbol);
        self.scopes.open(formal);
        if let Some(body) = &mut method.body {
            self.visit_block(body);
        }
        self.scopes.close();
    }

    fn clear_not_override(&mut self, name: crate::frontend::Symbol) {
        let current = self.scopes.current_class().expect("inside a class");
        if let SymbolKind::Class(c) = &mut self.scopes.symbol_mut(current).kind {
            c.not_override.retain(|n| *n != name);
        }
    }

    // Statements: only scope construction and declarations happen here.

    fn visit_block(&mut self, block: &mut Block) {
        let scope = self
            .scopes
            .new_nested_scope(ScopeKind::Local, self.scopes.current());
        block.scope = Some(scope);
        self.scopes.open(scope);
        for stmt in &mut block.stmts {
            self.visit_stmt(stmt);
        }
        self.scopes.close();
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::LocalVarDef(def) => self.visit_local_var_def(def),
            StmtKind::Block(block) => self.visit_block(block),
            StmtKind::Assign(assign) => {
                self.visit_expr(&mut assign.lhs);
                self.visit_expr(&mut assign.rhs);
            }
            StmtKind::ExprEval(expr) => self.visit_expr(expr),
            StmtKind::If(if_stmt) => {
                self.visit_expr(&mut if_stmt.cond);
                self.visit_block(&mut if_stmt.then_branch);
                if let Some(else_branch) = &mut if_stmt.else_branch {
                    self.visit_block(else_branch);
                }
            }
            StmtKind::While(while_stmt) => {
                self.visit_expr(&mut while_stmt.cond);
                self.visit_block(&mut while_stmt.body);
            }
            StmtKind::For(for_stmt) => {
                // init, condition, update and body all share one scope
                let scope = self
                    .scopes
                    .new_nested_scope(ScopeKind::Local, self.scopes.current());
                for_stmt.scope = Some(scope);
                for_stmt.body.scope = Some(scope);
                self.scopes.open(scope);
                self.visit_stmt(&mut for_stmt.init);
                self.visit_expr(&mut for_stmt.cond);
                self.visit_stmt(&mut for_stmt.update);
                for s in &mut for_stmt.body.stmts {
                    self.visit_stmt(s);
                }
                self.scopes.close();
            }
            StmtKind::Return(Some(expr)) => self.visit_expr(expr),
            StmtKind::Return(None) => {}
            StmtKind::Print(args) => {
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            StmtKind::Break | StmtKind::Skip => {}
        }
    }

    fn visit_local_var_def(&mut self, def: &mut VarDef) {
        if let Some(lit) = &mut def.type_lit {
            self.resolve_lit(lit);
        }

        if let Some(earlier) = self.scopes.find_conflict(def.id.name) {
            let earlier_pos = self.scopes.symbol(earlier).pos.pos();
            self.add_error(
                SemanticError::DeclConflict {
                    name: self.interner.resolve(def.id.name).to_string(),
                    earlier: earlier_pos,
                    span: def.id.span.into(),
                },
                def.id.span,
            );
        }

        match &def.type_lit {
            Some(lit) => {
                let ty = lit.ty.clone().expect("resolved above");
                if ty.is_void() {
                    self.add_error(
                        SemanticError::BadVarType {
                            name: self.interner.resolve(def.id.name).to_string(),
                            span: def.id.span.into(),
                        },
                        def.id.span,
                    );
                }
                if ty.no_error() {
                    let symbol = self.scopes.declare(
                        def.id.name,
                        def.id.span,
                        SymbolKind::Var(VarSymbol { ty: Some(ty) }),
                    );
                    def.symbol = Some(symbol);
                }
            }
            None => {
                // `var` local: the type is pending until its initializer
                // is typed in the second pass
                let symbol = self.scopes.declare(
                    def.id.name,
                    def.id.span,
                    SymbolKind::Var(VarSymbol { ty: None }),
                );
                def.symbol = Some(symbol);
            }
        }

        if let Some(init) = &mut def.init {
            self.visit_expr(init);
        }
    }

    // Expressions: the only interesting node is the lambda, which gets
    // its scopes and its symbol here; everything else is a plain walk.

    fn visit_expr(&mut self, expr: &mut Expr) {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Lambda(lambda) => self.visit_lambda(lambda, span),
            ExprKind::Unary(unary) => self.visit_expr(&mut unary.operand),
            ExprKind::Binary(binary) => {
                self.visit_expr(&mut binary.lhs);
                self.visit_expr(&mut binary.rhs);
            }
            ExprKind::NewArray(new_array) => self.visit_expr(&mut new_array.length),
            ExprKind::VarSel(sel) => {
                if let Some(receiver) = &mut sel.receiver {
                    self.visit_expr(receiver);
                }
            }
            ExprKind::IndexSel(index_sel) => {
                self.visit_expr(&mut index_sel.array);
                self.visit_expr(&mut index_sel.index);
            }
            ExprKind::Call(call) => {
                self.visit_expr(&mut call.func);
                for arg in &mut call.args {
                    self.visit_expr(arg);
                }
            }
            ExprKind::ClassTest(test) => self.visit_expr(&mut test.obj),
            ExprKind::ClassCast(cast) => self.visit_expr(&mut cast.obj),
            ExprKind::IntLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::NullLit
            | ExprKind::ReadInt
            | ExprKind::ReadLine
            | ExprKind::This
            | ExprKind::NewClass(_) => {}
        }
    }

    fn visit_lambda(&mut self, lambda: &mut Lambda, span: Span) {
        let lambda_scope = self
            .scopes
            .new_nested_scope(ScopeKind::Lambda, self.scopes.current());

        // Parameters live in the lambda frame; the return type is pending.
        self.scopes.open(lambda_scope);
        let mut params = Vec::with_capacity(lambda.params.len());
        for param in &mut lambda.params {
            self.visit_local_var_def(param);
            params.push(
                param
                    .type_lit
                    .as_ref()
                    .and_then(|lit| lit.ty.clone())
                    .unwrap_or(Type::Error),
            );
        }
        self.scopes.close();

        let name = self.interner.intern(&format!("lambda@{}", span.pos()));

        let local_scope = match &mut lambda.body {
            LambdaBody::Expr(expr) => {
                let local = self.scopes.new_nested_scope(ScopeKind::Local, lambda_scope);
                self.scopes.open(lambda_scope);
                self.scopes.open(local);
                self.visit_expr(expr);
                self.scopes.close();
                self.scopes.close();
                Some(local)
            }
            LambdaBody::Block(block) => {
                self.scopes.open(lambda_scope);
                self.visit_block(block);
                self.scopes.close();
                None
            }
        };

        let symbol = self.scopes.declare(
            name,
            span,
            SymbolKind::Lambda(LambdaSymbol {
                params,
                ret: None,
                scope: lambda_scope,
                local_scope,
                captures: SmallVec::new(),
            }),
        );
        self.scopes.set_owner(lambda_scope, symbol);
        lambda.symbol = Some(symbol);
    }

    /// The entry point must be a non-abstract class literally named
    /// `Main` with a `static void main()`.
    fn locate_main(&mut self, program: &mut Program) {
        let main_class = self.interner.intern("Main");
        let main_method = self.interner.intern("main");

        let mut found = false;
        for def in &program.classes {
            if def.id.name != main_class {
                continue;
            }
            let Some(symbol) = def.symbol else {
                continue; // a dropped duplicate
            };
            if def.is_abstract {
                self.add_error(SemanticError::NoMainClass, Span::default());
            }
            let scope = self.scopes.symbol(symbol).as_class().unwrap().scope;
            if let Some(method) = self.scopes.scope(scope).get(main_method) {
                let qualifies = self
                    .scopes
                    .symbol(method)
                    .as_method()
                    .map(|m| m.is_static && m.ty.return_type.is_void() && m.ty.params.is_empty())
                    .unwrap_or(false);
                if qualifies {
                    if let SymbolKind::Method(m) = &mut self.scopes.symbol_mut(method).kind {
                        m.is_main = true;
                    }
                    if let SymbolKind::Class(c) = &mut self.scopes.symbol_mut(symbol).kind {
                        c.is_main = true;
                    }
                    program.main_class = Some(symbol);
                    found = true;
                }
            }
        }
        if !found {
            self.add_error(SemanticError::NoMainClass, Span::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;

    fn resolve(source: &str) -> (Program, Vec<TypeError>, ScopeStack, ClassGraph, Interner) {
        let mut parser = Parser::new(source);
        let mut program = parser.parse_program().expect("parse failed");
        let mut interner = parser.into_interner();
        let (scopes, classes, errors) = Namer::run(&mut program, &mut interner);
        (program, errors, scopes, classes, interner)
    }

    fn errors_of(source: &str) -> Vec<TypeError> {
        resolve(source).1
    }

    #[test]
    fn well_formed_hierarchy_resolves() {
        let (program, errors, scopes, classes, _) = resolve(
            "class A {} class B extends A {} class C extends B {} \
             class Main { static void main() {} }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(program.main_class.is_some());
        // C <= B <= A in the graph
        let a = scopes.symbol(program.classes[0].symbol.unwrap()).as_class().unwrap().class;
        let c = scopes.symbol(program.classes[2].symbol.unwrap()).as_class().unwrap().class;
        assert!(classes.is_subclass(c, a));
        assert!(!classes.is_subclass(a, c));
    }

    #[test]
    fn duplicate_class_reports_conflict() {
        let errors = errors_of("class A {} class A {} class Main { static void main() {} }");
        assert!(matches!(
            errors[0].error,
            SemanticError::DeclConflict { .. }
        ));
    }

    #[test]
    fn unknown_parent_reports_class_not_found() {
        let errors = errors_of("class A extends Zap {} class Main { static void main() {} }");
        assert!(matches!(
            errors[0].error,
            SemanticError::ClassNotFound { .. }
        ));
    }

    #[test]
    fn inheritance_cycle_reported_once() {
        let errors = errors_of("class A extends B {} class B extends A {}");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error,
            SemanticError::BadInheritance { .. }
        ));
    }

    #[test]
    fn self_inheritance_is_a_cycle() {
        let errors = errors_of("class A extends A {}");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error,
            SemanticError::BadInheritance { .. }
        ));
    }

    #[test]
    fn missing_abstract_override_flagged() {
        let errors = errors_of(
            "abstract class A { abstract int f(); } class B extends A { } \
             class Main { static void main() {} }",
        );
        assert_eq!(errors.len(), 1);
        assert!(
            matches!(&errors[0].error, SemanticError::NoAbstract { name, .. } if name == "B")
        );
    }

    #[test]
    fn concrete_override_satisfies_abstract() {
        let errors = errors_of(
            "abstract class A { abstract int f(); } \
             class B extends A { int f() { return 0; } } \
             class Main { static void main() {} }",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn abstract_chain_accumulates_not_override() {
        // B stays abstract and only implements one of two; C implements none
        let errors = errors_of(
            "abstract class A { abstract int f(); abstract int g(); } \
             abstract class B extends A { int f() { return 1; } } \
             class C extends B { } \
             class Main { static void main() {} }",
        );
        assert_eq!(errors.len(), 1);
        assert!(
            matches!(&errors[0].error, SemanticError::NoAbstract { name, .. } if name == "C")
        );
    }

    #[test]
    fn bad_override_signature() {
        let errors = errors_of(
            "class A { int f(int x) { return x; } } \
             class B extends A { bool f(int x) { return true; } } \
             class Main { static void main() {} }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::BadOverride { .. }
        ));
    }

    #[test]
    fn contravariant_override_is_legal() {
        // B.f takes the base class and returns the subclass: a subtype signature
        let errors = errors_of(
            "class A { class B f(class B x) { return x; } } \
             class B extends A { class B f(class A x) { return null; } } \
             class Main { static void main() {} }",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn abstract_cannot_override_concrete() {
        let errors = errors_of(
            "class A { int f() { return 0; } } \
             abstract class B extends A { abstract int f(); } \
             class Main { static void main() {} }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::DeclConflict { .. }
        ));
    }

    #[test]
    fn static_methods_do_not_override() {
        let errors = errors_of(
            "class A { static int f() { return 0; } } \
             class B extends A { static int f() { return 1; } } \
             class Main { static void main() {} }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::DeclConflict { .. }
        ));
    }

    #[test]
    fn local_shadowing_inherited_field_is_silent_but_member_is_not() {
        let errors = errors_of(
            "class A { int x; } \
             class B extends A { int x; } \
             class Main { static void main() {} }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::OverridingVar { .. }
        ));
    }

    #[test]
    fn void_member_var_rejected() {
        let errors = errors_of("class A { void x; } class Main { static void main() {} }");
        assert!(matches!(errors[0].error, SemanticError::BadVarType { .. }));
    }

    #[test]
    fn void_array_element_rejected() {
        let errors = errors_of(
            "class Main { static void main() { void[] xs; } }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::BadArrElement { .. }
        ));
    }

    #[test]
    fn void_lambda_type_argument_rejected() {
        let errors = errors_of(
            "class Main { static void main() { int(void) f; } }",
        );
        assert!(matches!(errors[0].error, SemanticError::VoidArgs { .. }));
    }

    #[test]
    fn main_must_exist_and_qualify() {
        assert!(matches!(
            errors_of("class A {}")[0].error,
            SemanticError::NoMainClass
        ));
        assert!(matches!(
            errors_of("class Main { void main() {} }")[0].error,
            SemanticError::NoMainClass
        ));
        assert!(matches!(
            errors_of("class Main { static int main() { return 0; } }")[0].error,
            SemanticError::NoMainClass
        ));
        assert!(matches!(
            errors_of("class Main { static void main(int x) {} }")[0].error,
            SemanticError::NoMainClass
        ));
        assert!(
            errors_of("class Main { static void main() {} }").is_empty()
        );
    }

    #[test]
    fn abstract_main_is_illegal() {
        let errors = errors_of("abstract class Main { static void main() {} }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].error, SemanticError::NoMainClass));
    }

    #[test]
    fn duplicate_locals_conflict() {
        let errors = errors_of(
            "class Main { static void main() { int x; bool x; } }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::DeclConflict { .. }
        ));
    }

    #[test]
    fn lambda_param_conflicts_with_enclosing_local() {
        let errors = errors_of(
            "class Main { static void main() { int x; var f = fun(int x) => x; } }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::DeclConflict { .. }
        ));
    }

    #[test]
    fn lambda_symbols_created_in_call_arguments() {
        let (program, errors, scopes, _, _) = resolve(
            "class Main { static void main() { f(fun(int x) => x); } static void f(int(int) g) {} }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        let FieldDef::Method(m) = &program.classes[0].fields[0] else {
            panic!()
        };
        let StmtKind::ExprEval(call) = &m.body.as_ref().unwrap().stmts[0].kind else {
            panic!()
        };
        let ExprKind::Call(call) = &call.kind else { panic!() };
        let ExprKind::Lambda(lambda) = &call.args[0].kind else {
            panic!()
        };
        let symbol = lambda.symbol.expect("lambda symbol exists");
        assert!(scopes.symbol(symbol).as_lambda().is_some());
    }
}
