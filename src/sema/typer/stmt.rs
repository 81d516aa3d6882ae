// src/sema/typer/stmt.rs

use super::*;
use crate::sema::scope::ScopeKind;

impl Typer<'_> {
    pub(super) fn visit_block(&mut self, block: &mut Block) {
        if let Some(scope) = block.scope {
            self.scopes.open(scope);
        }
        for stmt in &mut block.stmts {
            self.visit_stmt(stmt);
        }
        if block.scope.is_some() {
            self.scopes.close();
        }
        block.returns = block.stmts.last().map(|s| s.returns).unwrap_or(false);
        block.is_close = block.stmts.iter().any(|s| s.is_close);
    }

    pub(super) fn visit_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::LocalVarDef(def) => self.visit_local_var_def(def),
            StmtKind::Assign(assign) => self.visit_assign(assign, span),
            StmtKind::ExprEval(expr) => {
                self.check_expr(expr);
            }
            StmtKind::Skip => {}
            StmtKind::If(if_stmt) => {
                self.check_test_expr(&mut if_stmt.cond);
                self.visit_block(&mut if_stmt.then_branch);
                if let Some(else_branch) = &mut if_stmt.else_branch {
                    self.visit_block(else_branch);
                }
                stmt.returns = if_stmt.then_branch.returns
                    && if_stmt
                        .else_branch
                        .as_ref()
                        .map(|b| b.returns)
                        .unwrap_or(false);
                if self.in_lambda_frame() {
                    stmt.is_close = if_stmt.then_branch.is_close
                        && if_stmt
                            .else_branch
                            .as_ref()
                            .map(|b| b.is_close)
                            .unwrap_or(false);
                }
            }
            StmtKind::While(while_stmt) => {
                self.check_test_expr(&mut while_stmt.cond);
                self.loop_level += 1;
                self.visit_block(&mut while_stmt.body);
                self.loop_level -= 1;
                if self.in_lambda_frame() {
                    stmt.is_close = while_stmt.body.is_close;
                }
            }
            StmtKind::For(for_stmt) => {
                if let Some(scope) = for_stmt.scope {
                    self.scopes.open(scope);
                }
                self.visit_stmt(&mut for_stmt.init);
                self.check_test_expr(&mut for_stmt.cond);
                self.visit_stmt(&mut for_stmt.update);
                self.loop_level += 1;
                for s in &mut for_stmt.body.stmts {
                    self.visit_stmt(s);
                }
                self.loop_level -= 1;
                if self.in_lambda_frame() {
                    stmt.is_close = for_stmt.body.is_close;
                }
                if for_stmt.scope.is_some() {
                    self.scopes.close();
                }
            }
            StmtKind::Break => {
                if self.loop_level == 0 {
                    self.add_error(
                        SemanticError::BreakOutOfLoop { span: span.into() },
                        span,
                    );
                }
            }
            StmtKind::Return(expr) => {
                let frame = self.scopes.formal_or_lambda_scope();
                if let Some(e) = expr.as_mut() {
                    self.check_expr(e);
                }
                let actual = expr
                    .as_ref()
                    .and_then(|e| e.ty.clone())
                    .unwrap_or(Type::Void);
                match frame.map(|f| self.scopes.scope(f).kind) {
                    Some(ScopeKind::Formal) => {
                        if let Some(method) = self.scopes.current_method() {
                            let expected =
                                (*self.scopes.symbol(method).as_method().unwrap().ty.return_type)
                                    .clone();
                            if actual.no_error() && !self.classes.subtype(&actual, &expected) {
                                self.add_error(
                                    SemanticError::BadReturnType {
                                        expected: self.display(&expected),
                                        found: self.display(&actual),
                                        span: span.into(),
                                    },
                                    span,
                                );
                            }
                        }
                    }
                    Some(ScopeKind::Lambda) => {
                        stmt.is_close = true;
                        self.type_list_stack
                            .last_mut()
                            .expect("lambda pushes a return list")
                            .push(actual);
                    }
                    _ => {}
                }
                stmt.returns = expr.is_some();
            }
            StmtKind::Print(args) => {
                for (i, arg) in args.iter_mut().enumerate() {
                    self.check_expr(arg);
                    let ty = arg.ty.clone().unwrap_or(Type::Error);
                    if ty.no_error() && !ty.is_base_type() {
                        self.add_error(
                            SemanticError::BadPrintArg {
                                index: i + 1,
                                found: self.display(&ty),
                                span: arg.span.into(),
                            },
                            arg.span,
                        );
                    }
                }
            }
            StmtKind::Block(block) => {
                self.visit_block(block);
                stmt.returns = block.returns;
                stmt.is_close = block.is_close;
            }
        }
    }

    fn check_test_expr(&mut self, expr: &mut Expr) {
        let ty = self.check_expr(expr);
        if ty.no_error() && ty != Type::Bool {
            self.add_error(
                SemanticError::BadTestExpr {
                    span: expr.span.into(),
                },
                expr.span,
            );
        }
    }

    fn visit_local_var_def(&mut self, def: &mut VarDef) {
        let Some(init) = &mut def.init else {
            return;
        };

        // The initializer must not see the name it is defining.
        self.var_list_stack.push(def.id.name);
        self.local_var_def_pos = Some(def.id.span);
        self.check_expr(init);
        self.local_var_def_pos = None;
        self.var_list_stack.pop();

        let rhs_ty = init.ty.clone().unwrap_or(Type::Error);
        let Some(symbol) = def.symbol else {
            return;
        };
        let declared = self.scopes.symbol(symbol).as_var().unwrap().ty.clone();
        match declared {
            None => {
                // `var` local: adopt the initializer's type
                if rhs_ty.is_void() {
                    self.add_error(
                        SemanticError::BadVarType {
                            name: self.name(def.id.name),
                            span: def.id.span.into(),
                        },
                        def.id.span,
                    );
                    self.set_var_type(symbol, Type::Error);
                } else {
                    self.set_var_type(symbol, rhs_ty);
                }
            }
            Some(lhs_ty) => {
                if lhs_ty.no_error() && !self.classes.subtype(&rhs_ty, &lhs_ty) {
                    let span = def.assign_span.unwrap_or(def.span);
                    self.add_error(
                        SemanticError::IncompatBinOp {
                            left: self.display(&lhs_ty),
                            op: "=".to_string(),
                            right: self.display(&rhs_ty),
                            span: span.into(),
                        },
                        span,
                    );
                }
            }
        }
    }

    fn set_var_type(&mut self, symbol: crate::sema::symbol::SymbolId, ty: Type) {
        if let SymbolKind::Var(v) = &mut self.scopes.symbol_mut(symbol).kind {
            v.ty = Some(ty);
        }
    }

    fn visit_assign(&mut self, assign: &mut Assign, span: Span) {
        self.check_expr(&mut assign.lhs);
        self.check_expr(&mut assign.rhs);
        let lhs_ty = assign.lhs.ty.clone().unwrap_or(Type::Error);
        let rhs_ty = assign.rhs.ty.clone().unwrap_or(Type::Error);

        if let ExprKind::VarSel(sel) = &assign.lhs.kind {
            if sel.is_member_method_name {
                self.add_error(
                    SemanticError::AssignToMemberMethod {
                        name: self.name(sel.id.name),
                        span: span.into(),
                    },
                    span,
                );
            }
        }

        if lhs_ty.no_error() && !self.classes.subtype(&rhs_ty, &lhs_ty) {
            self.add_error(
                SemanticError::IncompatBinOp {
                    left: self.display(&lhs_ty),
                    op: "=".to_string(),
                    right: self.display(&rhs_ty),
                    span: span.into(),
                },
                span,
            );
        }

        // A bare name defined outside the innermost lambda frame (and not
        // a class member) is a captured local: assigning to it is illegal.
        // Assignment through a captured object or array stays legal.
        if lhs_ty.no_error() {
            self.check_captured_assign(assign, span);
        }
    }

    fn check_captured_assign(&mut self, assign: &Assign, span: Span) {
        let Some(frame) = self.scopes.formal_or_lambda_scope() else {
            return;
        };
        if self.scopes.scope(frame).kind != ScopeKind::Lambda {
            return;
        }
        let ExprKind::VarSel(sel) = &assign.lhs.kind else {
            return;
        };
        if sel.receiver.is_some() {
            return;
        }
        let Some(symbol) = sel.symbol else {
            return;
        };
        let domain = self.scopes.symbol(symbol).domain;
        let Some(frame_pos) = self.scopes.stack_position(frame) else {
            return;
        };
        let frames: Vec<_> = self.scopes.frames()[..frame_pos].to_vec();
        for s in frames.into_iter().rev() {
            if !self.scopes.scope(s).kind.is_class() && domain == s {
                self.add_error(
                    SemanticError::AssignToCapturedVar { span: span.into() },
                    span,
                );
                break;
            }
        }
    }
}
