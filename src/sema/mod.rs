// src/sema/mod.rs
//! Semantic analysis: two passes over the parsed tree.
//!
//! The namer builds the scope tree, resolves classes, members and
//! overrides; the typer walks the same tree again and annotates every
//! expression with a type. Both passes share the `ScopeStack` and append
//! to one diagnostic list — errors never abort a subtree, they just turn
//! into the `Error` type.

pub mod namer;
pub mod pretty;
pub mod resolve;
pub mod scope;
pub mod symbol;
pub mod typer;
pub mod types;

use crate::errors::SemanticError;
use crate::frontend::{Interner, Program, Span};

pub use scope::{ScopeId, ScopeKind, ScopeStack};
pub use symbol::{SymbolId, SymbolKind};
pub use types::{ClassGraph, ClassId, FunctionType, Type};

/// A type error wrapping a miette-enabled SemanticError
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// Result of a successful analysis: the populated scope tree and the
/// class graph, reachable alongside the annotated AST.
#[derive(Debug)]
pub struct Analysis {
    pub scopes: ScopeStack,
    pub classes: ClassGraph,
}

/// Run both passes. Name-resolution errors skip the typing pass
/// entirely; any error means no `Analysis` is produced.
pub fn analyze(
    program: &mut Program,
    interner: &mut Interner,
) -> Result<Analysis, Vec<TypeError>> {
    tracing::debug!("running namer pass");
    let (scopes, classes, errors) = namer::Namer::run(program, interner);
    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!("running typer pass");
    let (scopes, classes, errors) = typer::Typer::run(program, scopes, classes, interner);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Analysis { scopes, classes })
}
