// src/sema/typer/lambda.rs

use super::*;
use crate::sema::types::FunctionType;

impl Typer<'_> {
    /// Type a lambda body and settle its return type. An expression body
    /// returns whatever the expression is; a block body collects the
    /// types of its `return` statements and joins them.
    pub(super) fn check_lambda(&mut self, lambda: &mut Lambda, _span: Span) -> Type {
        let Some(symbol) = lambda.symbol else {
            return Type::Error;
        };
        let (lambda_scope, local_scope, params) = {
            let info = self.scopes.symbol(symbol).as_lambda().unwrap();
            (info.scope, info.local_scope, info.params.clone())
        };

        self.lambda_stack.push(symbol);
        let ret = match &mut lambda.body {
            LambdaBody::Expr(expr) => {
                self.scopes.open(lambda_scope);
                if let Some(local) = local_scope {
                    self.scopes.open(local);
                }
                self.check_expr(expr);
                if local_scope.is_some() {
                    self.scopes.close();
                }
                self.scopes.close();
                expr.ty.clone().unwrap_or(Type::Error)
            }
            LambdaBody::Block(block) => {
                self.scopes.open(lambda_scope);
                self.type_list_stack.push(Vec::new());
                self.visit_block(block);
                let ret = self.infer_lambda_return(block);
                self.type_list_stack.pop();
                self.scopes.close();
                ret
            }
        };
        self.lambda_stack.pop();

        if let SymbolKind::Lambda(l) = &mut self.scopes.symbol_mut(symbol).kind {
            l.ret = Some(ret.clone());
        }
        lambda.captures = self
            .scopes
            .symbol(symbol)
            .as_lambda()
            .unwrap()
            .captures
            .to_vec();

        Type::Function(FunctionType {
            params,
            return_type: Box::new(ret),
        })
    }

    /// Join the collected return types. No returns means void; a
    /// non-closed block with a value-returning path is missing a return;
    /// a failed join means the returns disagree.
    fn infer_lambda_return(&mut self, block: &Block) -> Type {
        let returns = self
            .type_list_stack
            .last()
            .expect("return list pushed by caller")
            .clone();
        if returns.is_empty() {
            return Type::Void;
        }

        if !block.is_close && returns.iter().any(|t| !t.is_void()) {
            self.add_error(
                SemanticError::MissingReturn {
                    span: block.span.into(),
                },
                block.span,
            );
        }

        let ret = self.classes.upper_bound(&returns);
        if ret.is_error() {
            self.add_error(
                SemanticError::IncompatRetType {
                    span: block.span.into(),
                },
                block.span,
            );
        }
        ret
    }
}
