// src/sema/resolve.rs
//! Type-literal resolution, shared by the namer and the typer.

use crate::errors::SemanticError;
use crate::frontend::Interner;
use crate::frontend::ast::{TypeLit, TypeLitKind};
use crate::sema::TypeError;
use crate::sema::scope::ScopeStack;
use crate::sema::types::{FunctionType, Type};

/// Resolve a written type to a semantic type, annotating the literal.
/// Unknown classes and void misuses are reported here; the resulting
/// `Error` type silences downstream checks.
pub fn resolve_type_lit(
    lit: &mut TypeLit,
    scopes: &ScopeStack,
    errors: &mut Vec<TypeError>,
    interner: &Interner,
) -> Type {
    let ty = match &mut lit.kind {
        TypeLitKind::Int => Type::Int,
        TypeLitKind::Bool => Type::Bool,
        TypeLitKind::String => Type::String,
        TypeLitKind::Void => Type::Void,
        TypeLitKind::Class(name) => match scopes.lookup_class(*name) {
            Some(symbol) => {
                let class = scopes.symbol(symbol).as_class().unwrap().class;
                Type::Class(class)
            }
            None => {
                errors.push(TypeError::new(
                    SemanticError::ClassNotFound {
                        name: interner.resolve(*name).to_string(),
                        span: lit.span.into(),
                    },
                    lit.span,
                ));
                Type::Error
            }
        },
        TypeLitKind::Array(elem) => {
            let elem_ty = resolve_type_lit(elem, scopes, errors, interner);
            if elem_ty.is_error() {
                Type::Error
            } else if elem_ty.is_void() {
                errors.push(TypeError::new(
                    SemanticError::BadArrElement {
                        span: lit.span.into(),
                    },
                    lit.span,
                ));
                Type::Error
            } else {
                Type::Array(Box::new(elem_ty))
            }
        }
        TypeLitKind::Fun { ret, params } => {
            let ret_ty = resolve_type_lit(ret, scopes, errors, interner);
            let mut has_error = false;
            let mut param_tys = Vec::with_capacity(params.len());
            for param in params.iter_mut() {
                let param_ty = resolve_type_lit(param, scopes, errors, interner);
                if param_ty.is_error() {
                    has_error = true;
                } else if param_ty.is_void() {
                    errors.push(TypeError::new(
                        SemanticError::VoidArgs {
                            span: param.span.into(),
                        },
                        param.span,
                    ));
                    has_error = true;
                } else {
                    param_tys.push(param_ty);
                }
            }
            if has_error {
                Type::Error
            } else {
                Type::Function(FunctionType {
                    params: param_tys,
                    return_type: Box::new(ret_ty),
                })
            }
        }
    };
    lit.ty = Some(ty.clone());
    ty
}
