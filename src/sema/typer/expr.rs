// src/sema/typer/expr.rs

use super::*;
use crate::sema::resolve::resolve_type_lit;
use crate::sema::types::FunctionType;

impl Typer<'_> {
    pub(super) fn check_expr(&mut self, expr: &mut Expr) -> Type {
        self.check_expr_with(expr, false)
    }

    /// `allow_class_name` is the one-step context a receiver gets: only
    /// there may a bare name resolve to a class.
    fn check_expr_with(&mut self, expr: &mut Expr, allow_class_name: bool) -> Type {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::IntLit(_) => Type::Int,
            ExprKind::BoolLit(_) => Type::Bool,
            ExprKind::StringLit(_) => Type::String,
            ExprKind::NullLit => Type::Null,
            ExprKind::ReadInt => Type::Int,
            ExprKind::ReadLine => Type::String,
            ExprKind::This => self.check_this(span),
            ExprKind::Unary(unary) => self.check_unary(unary, span),
            ExprKind::Binary(binary) => self.check_binary(binary, span),
            ExprKind::NewArray(new_array) => self.check_new_array(new_array),
            ExprKind::NewClass(new_class) => self.check_new_class(new_class, span),
            ExprKind::VarSel(sel) => self.check_var_sel(sel, span, allow_class_name),
            ExprKind::IndexSel(index_sel) => self.check_index_sel(index_sel, span),
            ExprKind::Call(call) => self.check_call(call, span),
            ExprKind::ClassTest(test) => self.check_class_test(test, span),
            ExprKind::ClassCast(cast) => self.check_class_cast(cast, span),
            ExprKind::Lambda(lambda) => self.check_lambda(lambda, span),
        };
        expr.ty = Some(ty.clone());
        ty
    }

    fn check_this(&mut self, span: Span) -> Type {
        if self.current_method_is_static() {
            self.add_error(
                SemanticError::ThisInStaticFunc { span: span.into() },
                span,
            );
        }
        self.current_class_type()
    }

    fn check_unary(&mut self, unary: &mut UnaryExpr, span: Span) -> Type {
        let operand = self.check_expr(&mut unary.operand);
        let ok = match unary.op {
            UnaryOp::Neg => operand == Type::Int,
            UnaryOp::Not => operand == Type::Bool,
        };
        if operand.no_error() && !ok {
            self.add_error(
                SemanticError::IncompatUnOp {
                    op: unary.op.as_str().to_string(),
                    found: self.display(&operand),
                    span: span.into(),
                },
                span,
            );
        }
        // Guess from the operator even when the operand is wrong, so the
        // surrounding expression doesn't cascade.
        match unary.op {
            UnaryOp::Neg => Type::Int,
            UnaryOp::Not => Type::Bool,
        }
    }

    fn check_binary(&mut self, binary: &mut BinaryExpr, span: Span) -> Type {
        let lhs = self.check_expr(&mut binary.lhs);
        let rhs = self.check_expr(&mut binary.rhs);
        let op = binary.op;

        let ok = if op.is_arith() {
            lhs == Type::Int && rhs == Type::Int
        } else if op.is_logic() {
            lhs == Type::Bool && rhs == Type::Bool
        } else if op.is_equality() {
            self.classes.subtype(&lhs, &rhs) || self.classes.subtype(&rhs, &lhs)
        } else {
            // comparisons
            lhs == Type::Int && rhs == Type::Int
        };

        if lhs.no_error() && rhs.no_error() && !ok {
            self.add_error(
                SemanticError::IncompatBinOp {
                    left: self.display(&lhs),
                    op: op.as_str().to_string(),
                    right: self.display(&rhs),
                    span: span.into(),
                },
                span,
            );
        }

        if op.is_arith() { Type::Int } else { Type::Bool }
    }

    fn check_new_array(&mut self, new_array: &mut NewArray) -> Type {
        let elem = resolve_type_lit(
            &mut new_array.elem_type,
            &self.scopes,
            &mut self.errors,
            self.interner,
        );
        let len = self.check_expr(&mut new_array.length);

        let ty = if elem.is_void() {
            self.add_error(
                SemanticError::BadArrElement {
                    span: new_array.elem_type.span.into(),
                },
                new_array.elem_type.span,
            );
            Type::Error
        } else {
            Type::Array(Box::new(elem))
        };

        if len.no_error() && len != Type::Int {
            self.add_error(
                SemanticError::BadNewArrayLength {
                    span: new_array.length.span.into(),
                },
                new_array.length.span,
            );
        }
        ty
    }

    fn check_new_class(&mut self, new_class: &mut NewClass, span: Span) -> Type {
        match self.scopes.lookup_class(new_class.class.name) {
            Some(symbol) => {
                let info = self.scopes.symbol(symbol).as_class().unwrap();
                let (class, is_abstract) = (info.class, info.is_abstract);
                if is_abstract {
                    self.add_error(
                        SemanticError::BadInstantiate {
                            name: self.name(new_class.class.name),
                            span: span.into(),
                        },
                        span,
                    );
                }
                new_class.symbol = Some(symbol);
                Type::Class(class)
            }
            None => {
                self.add_error(
                    SemanticError::ClassNotFound {
                        name: self.name(new_class.class.name),
                        span: span.into(),
                    },
                    span,
                );
                Type::Error
            }
        }
    }

    fn check_var_sel(&mut self, sel: &mut VarSel, span: Span, allow_class_name: bool) -> Type {
        if sel.receiver.is_none() {
            return self.check_bare_var_sel(sel, span, allow_class_name);
        }

        let receiver = sel.receiver.as_mut().unwrap();
        let receiver_ty = self.check_expr_with(receiver, true);
        if receiver_ty.is_error() {
            return Type::Error;
        }

        if receiver_ty.is_array() && self.interner.resolve(sel.id.name) == "length" {
            sel.is_array_length = true;
            return Type::Function(FunctionType {
                params: Vec::new(),
                return_type: Box::new(Type::Int),
            });
        }

        let Type::Class(class) = &receiver_ty else {
            self.add_error(
                SemanticError::NotClassField {
                    name: self.name(sel.id.name),
                    owner: self.display(&receiver_ty),
                    span: span.into(),
                },
                span,
            );
            return Type::Error;
        };
        let class = *class;

        let class_scope = {
            let symbol = self.scopes.class_symbol(class);
            self.scopes.symbol(symbol).as_class().unwrap().scope
        };
        let field = self.scopes.lookup_member(class_scope, sel.id.name);

        // Through a class name only static members are reachable.
        if let ExprKind::VarSel(receiver_sel) = &receiver.kind {
            if receiver_sel.is_class_name {
                if let Some(f) = field {
                    let entry = self.scopes.symbol(f);
                    let instance_member = entry.is_var()
                        || entry.as_method().map(|m| !m.is_static).unwrap_or(false);
                    if instance_member {
                        self.add_error(
                            SemanticError::NotClassField {
                                name: self.name(sel.id.name),
                                owner: self.display(&receiver_ty),
                                span: span.into(),
                            },
                            span,
                        );
                        return Type::Error;
                    }
                }
            }
        }

        let Some(field) = field else {
            self.add_error(
                SemanticError::FieldNotFound {
                    name: self.name(sel.id.name),
                    owner: self.display(&receiver_ty),
                    span: span.into(),
                },
                span,
            );
            return Type::Error;
        };

        match &self.scopes.symbol(field).kind {
            SymbolKind::Var(v) => {
                sel.symbol = Some(field);
                let ty = v.ty.clone().unwrap_or(Type::Error);
                // Member vars are protected: only the declaring class and
                // its subclasses may read them.
                let owner_scope = self.scopes.symbol(field).domain;
                if let ScopeKind::Class(owner) = self.scopes.scope(owner_scope).kind {
                    let current = self.current_class_type();
                    if !self.classes.subtype(&current, &Type::Class(owner)) {
                        self.add_error(
                            SemanticError::FieldNotAccess {
                                name: self.name(sel.id.name),
                                owner: self.display(&receiver_ty),
                                span: span.into(),
                            },
                            span,
                        );
                    }
                }
                ty
            }
            SymbolKind::Method(m) => {
                sel.is_member_method_name = true;
                Type::Function(m.ty.clone())
            }
            _ => {
                self.add_error(
                    SemanticError::NotClassField {
                        name: self.name(sel.id.name),
                        owner: self.display(&receiver_ty),
                        span: span.into(),
                    },
                    span,
                );
                Type::Error
            }
        }
    }

    fn check_bare_var_sel(
        &mut self,
        sel: &mut VarSel,
        span: Span,
        allow_class_name: bool,
    ) -> Type {
        let lookup_pos = self.local_var_def_pos.unwrap_or(span);
        let symbol = self.scopes.lookup_before(sel.id.name, lookup_pos);

        if let Some(id) = symbol {
            if !self.var_list_stack.contains(&sel.id.name) {
                match &self.scopes.symbol(id).kind {
                    SymbolKind::Var(v) => {
                        let ty = v.ty.clone().unwrap_or(Type::Error);
                        sel.symbol = Some(id);
                        let domain = self.scopes.symbol(id).domain;
                        if self.scopes.scope(domain).kind.is_class() {
                            if self.current_method_is_static() {
                                self.add_error(
                                    SemanticError::RefNonStatic {
                                        field: self.name(sel.id.name),
                                        method: self.current_method_name(),
                                        span: span.into(),
                                    },
                                    span,
                                );
                            } else {
                                self.set_this_receiver(sel, span);
                            }
                        } else {
                            self.record_capture(id);
                        }
                        return ty;
                    }
                    SymbolKind::Class(c) if allow_class_name => {
                        let ty = Type::Class(c.class);
                        sel.is_class_name = true;
                        return ty;
                    }
                    SymbolKind::Method(m) => {
                        let ty = Type::Function(m.ty.clone());
                        let is_static = m.is_static;
                        sel.is_member_method_name = true;
                        if self.current_method_is_static() && !is_static {
                            self.add_error(
                                SemanticError::RefNonStatic {
                                    field: self.name(sel.id.name),
                                    method: self.current_method_name(),
                                    span: span.into(),
                                },
                                span,
                            );
                        } else {
                            self.set_this_receiver(sel, span);
                        }
                        return ty;
                    }
                    _ => {}
                }
            }
        }

        self.add_error(
            SemanticError::UndeclVar {
                name: self.name(sel.id.name),
                span: span.into(),
            },
            span,
        );
        Type::Error
    }

    /// Rewrite a bare member reference into `this.name`
    fn set_this_receiver(&mut self, sel: &mut VarSel, span: Span) {
        let mut this_expr = Expr::new(ExprKind::This, span);
        this_expr.ty = Some(self.current_class_type());
        sel.receiver = Some(Box::new(this_expr));
    }

    fn check_index_sel(&mut self, index_sel: &mut IndexSel, span: Span) -> Type {
        let array_ty = self.check_expr(&mut index_sel.array);
        let index_ty = self.check_expr(&mut index_sel.index);

        if array_ty.is_error() {
            return Type::Error;
        }
        let Type::Array(elem) = array_ty else {
            self.add_error(
                SemanticError::NotArray {
                    span: index_sel.array.span.into(),
                },
                index_sel.array.span,
            );
            return Type::Error;
        };
        if index_ty != Type::Int {
            self.add_error(SemanticError::SubNotInt { span: span.into() }, span);
        }
        *elem
    }

    fn check_call(&mut self, call: &mut Call, span: Span) -> Type {
        let func_ty = self.check_expr(&mut call.func);
        if func_ty.is_error() {
            return Type::Error;
        }

        if let ExprKind::VarSel(sel) = &call.func.kind {
            if sel.is_array_length {
                call.is_array_length = true;
                if !call.args.is_empty() {
                    self.add_error(
                        SemanticError::BadLengthArg {
                            found: call.args.len(),
                            span: span.into(),
                        },
                        span,
                    );
                }
                return Type::Int;
            }
        }

        let Type::Function(fun) = &func_ty else {
            self.add_error(
                SemanticError::NotCallable {
                    found: self.display(&func_ty),
                    span: span.into(),
                },
                span,
            );
            return Type::Error;
        };
        let fun = fun.clone();

        let ret = (*fun.return_type).clone();
        for arg in &mut call.args {
            self.check_expr(arg);
        }

        if fun.params.len() != call.args.len() {
            let callee = match &call.func.kind {
                ExprKind::VarSel(sel) => format!("function '{}'", self.name(sel.id.name)),
                _ => "lambda expression".to_string(),
            };
            self.add_error(
                SemanticError::BadArgCount {
                    callee,
                    expected: fun.params.len(),
                    found: call.args.len(),
                    span: span.into(),
                },
                span,
            );
        }

        for (i, (param, arg)) in fun.params.iter().zip(call.args.iter()).enumerate() {
            let arg_ty = arg.ty.clone().unwrap_or(Type::Error);
            if arg_ty.no_error() && !self.classes.subtype(&arg_ty, param) {
                self.add_error(
                    SemanticError::BadArgType {
                        index: i + 1,
                        found: self.classes.display(&arg_ty, self.interner),
                        expected: self.classes.display(param, self.interner),
                        span: arg.span.into(),
                    },
                    arg.span,
                );
            }
        }

        ret
    }

    fn check_class_test(&mut self, test: &mut ClassTest, span: Span) -> Type {
        let obj_ty = self.check_expr(&mut test.obj);
        if !obj_ty.is_class() {
            self.add_error(
                SemanticError::NotClass {
                    found: self.display(&obj_ty),
                    span: span.into(),
                },
                span,
            );
        }
        match self.scopes.lookup_class(test.class.name) {
            Some(symbol) => test.symbol = Some(symbol),
            None => {
                self.add_error(
                    SemanticError::ClassNotFound {
                        name: self.name(test.class.name),
                        span: span.into(),
                    },
                    span,
                );
            }
        }
        Type::Bool
    }

    fn check_class_cast(&mut self, cast: &mut ClassCast, span: Span) -> Type {
        let obj_ty = self.check_expr(&mut cast.obj);
        if !obj_ty.is_class() {
            self.add_error(
                SemanticError::NotClass {
                    found: self.display(&obj_ty),
                    span: span.into(),
                },
                span,
            );
        }
        match self.scopes.lookup_class(cast.class.name) {
            Some(symbol) => {
                cast.symbol = Some(symbol);
                let class = self.scopes.symbol(symbol).as_class().unwrap().class;
                Type::Class(class)
            }
            None => {
                self.add_error(
                    SemanticError::ClassNotFound {
                        name: self.name(cast.class.name),
                        span: span.into(),
                    },
                    span,
                );
                Type::Error
            }
        }
    }
}
