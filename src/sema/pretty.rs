// src/sema/pretty.rs
//! Indented dump of the scope tree, for the `scopes` command and the
//! golden tests.

use crate::frontend::Interner;
use crate::sema::scope::{ScopeId, ScopeKind};
use crate::sema::symbol::{SymbolEntry, SymbolId, SymbolKind};
use crate::sema::types::{FunctionType, Type};
use crate::sema::Analysis;

pub fn pretty_scopes(analysis: &Analysis, interner: &Interner) -> String {
    let mut out = String::new();
    print_scope(&mut out, analysis, interner, analysis.scopes.global, 0);
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("    ");
    }
}

fn print_scope(
    out: &mut String,
    analysis: &Analysis,
    interner: &Interner,
    id: ScopeId,
    level: usize,
) {
    let scopes = &analysis.scopes;
    let scope = scopes.scope(id);

    indent(out, level);
    match scope.kind {
        ScopeKind::Global => out.push_str("GLOBAL SCOPE:\n"),
        ScopeKind::Class(_) => {
            let name = owner_name(analysis, interner, scope.owner);
            out.push_str(&format!("CLASS SCOPE OF '{name}':\n"));
        }
        ScopeKind::Formal => {
            let name = owner_name(analysis, interner, scope.owner);
            out.push_str(&format!("FORMAL SCOPE OF '{name}':\n"));
        }
        ScopeKind::Lambda => {
            let name = owner_name(analysis, interner, scope.owner);
            out.push_str(&format!("LAMBDA SCOPE OF '{name}':\n"));
        }
        ScopeKind::Local => out.push_str("LOCAL SCOPE:\n"),
    }

    for &symbol in scope.symbols() {
        indent(out, level + 1);
        out.push_str(&symbol_line(analysis, interner, symbol));
        out.push('\n');
    }

    // Class scopes hang off the class symbols of the global scope rather
    // than off a children list; everything else nests naturally.
    if scope.kind == ScopeKind::Global {
        for &symbol in scope.symbols() {
            if let SymbolKind::Class(c) = &scopes.symbol(symbol).kind {
                print_scope(out, analysis, interner, c.scope, level + 1);
            }
        }
    }
    for &child in &scope.children {
        print_scope(out, analysis, interner, child, level + 1);
    }
}

fn owner_name(analysis: &Analysis, interner: &Interner, owner: Option<SymbolId>) -> String {
    owner
        .map(|id| interner.resolve(analysis.scopes.symbol(id).name).to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn symbol_line(analysis: &Analysis, interner: &Interner, id: SymbolId) -> String {
    let entry = analysis.scopes.symbol(id);
    format!("{} -> {}", entry.pos.pos(), describe(analysis, interner, entry))
}

fn describe(analysis: &Analysis, interner: &Interner, entry: &SymbolEntry) -> String {
    let name = interner.resolve(entry.name);
    match &entry.kind {
        SymbolKind::Class(c) => {
            let mut s = String::new();
            if c.is_abstract {
                s.push_str("ABSTRACT ");
            }
            s.push_str(&format!("class {name}"));
            if let Some(base) = c.base {
                s.push_str(&format!(
                    " : {}",
                    interner.resolve(analysis.scopes.symbol(base).name)
                ));
            }
            s
        }
        SymbolKind::Method(m) => {
            let mut s = String::new();
            if m.is_static {
                s.push_str("STATIC ");
            }
            if m.is_abstract {
                s.push_str("ABSTRACT ");
            }
            s.push_str(&format!(
                "function {name} : {}",
                analysis
                    .classes
                    .display(&Type::Function(m.ty.clone()), interner)
            ));
            s
        }
        SymbolKind::Var(v) => match &v.ty {
            Some(ty) => format!(
                "variable {name} : {}",
                analysis.classes.display(ty, interner)
            ),
            None => format!("variable {name} : ?"),
        },
        SymbolKind::Lambda(l) => {
            let ty = Type::Function(FunctionType {
                params: l.params.clone(),
                return_type: Box::new(l.ret.clone().unwrap_or(Type::Error)),
            });
            format!("function {name} : {}", analysis.classes.display(&ty, interner))
        }
    }
}
