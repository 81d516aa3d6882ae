// src/sema/types.rs

use crate::frontend::{Interner, Symbol};

/// Identity of a class in the class graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// Resolved types in the type system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    String,
    /// No value (function returns only)
    Void,
    /// The type of the `null` literal; subtype of every class
    Null,
    /// Error sentinel: both sub- and super-type of everything, so one
    /// diagnosis doesn't cascade into follow-up noise
    Error,
    /// Array type; invariant in its element
    Array(Box<Type>),
    /// Nominal class type
    Class(ClassId),
    /// Function type; contravariant in params, covariant in return
    Function(FunctionType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub return_type: Box<Type>,
}

impl Type {
    /// int, bool, string — the printable types
    pub fn is_base_type(&self) -> bool {
        matches!(self, Type::Int | Type::Bool | Type::String)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn no_error(&self) -> bool {
        !self.is_error()
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Type::Function(_))
    }
}

/// Per-class facts the lattice needs: name, base class, abstractness.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: Symbol,
    pub super_class: Option<ClassId>,
    pub is_abstract: bool,
}

/// The class inheritance graph. Subtyping, join and meet all live here
/// because the class cases need the super chain.
#[derive(Debug, Default)]
pub struct ClassGraph {
    classes: Vec<ClassInfo>,
}

impl ClassGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: Symbol, super_class: Option<ClassId>, is_abstract: bool) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassInfo {
            name,
            super_class,
            is_abstract,
        });
        id
    }

    pub fn info(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.0 as usize]
    }

    pub fn is_subclass(&self, mut a: ClassId, b: ClassId) -> bool {
        loop {
            if a == b {
                return true;
            }
            match self.info(a).super_class {
                Some(s) => a = s,
                None => return false,
            }
        }
    }

    /// `t <= u` in the subtype lattice
    pub fn subtype(&self, t: &Type, u: &Type) -> bool {
        if t.is_error() || u.is_error() {
            return true;
        }
        match (t, u) {
            (Type::Null, Type::Class(_)) => true,
            (Type::Class(a), Type::Class(b)) => self.is_subclass(*a, *b),
            (Type::Function(f), Type::Function(g)) => {
                f.params.len() == g.params.len()
                    && self.subtype(&f.return_type, &g.return_type)
                    && f.params
                        .iter()
                        .zip(g.params.iter())
                        .all(|(fp, gp)| self.subtype(gp, fp))
            }
            _ => t == u,
        }
    }

    /// Least upper bound of a non-empty type list; `Error` when none exists.
    /// The pivot is the first non-null entry; an all-null list joins to null.
    pub fn upper_bound(&self, types: &[Type]) -> Type {
        let Some(pivot) = types.iter().find(|t| !matches!(t, Type::Null)) else {
            return Type::Null;
        };

        match pivot {
            Type::Int | Type::Bool | Type::String | Type::Void | Type::Array(_) => {
                if types.iter().all(|t| t == pivot) {
                    pivot.clone()
                } else {
                    Type::Error
                }
            }
            Type::Class(_) => {
                let mut bound = pivot.clone();
                for t in types {
                    loop {
                        if self.subtype(t, &bound) {
                            break;
                        }
                        let Type::Class(c) = bound else {
                            return Type::Error;
                        };
                        match self.info(c).super_class {
                            Some(s) => bound = Type::Class(s),
                            None => return Type::Error,
                        }
                    }
                }
                bound
            }
            Type::Function(f) => self.bound_functions(types, f.params.len(), true),
            _ => Type::Error,
        }
    }

    /// Greatest lower bound, dual to `upper_bound`
    pub fn lower_bound(&self, types: &[Type]) -> Type {
        let Some(pivot) = types.iter().find(|t| !matches!(t, Type::Null)) else {
            return Type::Null;
        };

        match pivot {
            Type::Int | Type::Bool | Type::String | Type::Void | Type::Array(_) => {
                if types.iter().all(|t| t == pivot) {
                    pivot.clone()
                } else {
                    Type::Error
                }
            }
            Type::Class(_) => {
                let mut bound = pivot.clone();
                for t in types {
                    if self.subtype(t, &bound) {
                        bound = t.clone();
                    } else if !self.subtype(&bound, t) {
                        return Type::Error;
                    }
                }
                bound
            }
            Type::Function(f) => self.bound_functions(types, f.params.len(), false),
            _ => Type::Error,
        }
    }

    /// Join/meet over function types: the recursion flips direction for
    /// the parameter lists (contravariance).
    fn bound_functions(&self, types: &[Type], arity: usize, upper: bool) -> Type {
        let mut rets = Vec::with_capacity(types.len());
        let mut args: Vec<Vec<Type>> = vec![Vec::with_capacity(types.len()); arity];
        for t in types {
            let Type::Function(f) = t else {
                return Type::Error;
            };
            if f.params.len() != arity {
                return Type::Error;
            }
            rets.push((*f.return_type).clone());
            for (slot, p) in args.iter_mut().zip(f.params.iter()) {
                slot.push(p.clone());
            }
        }

        let ret = if upper {
            self.upper_bound(&rets)
        } else {
            self.lower_bound(&rets)
        };
        if ret.is_error() {
            return Type::Error;
        }

        let mut params = Vec::with_capacity(arity);
        for slot in &args {
            let p = if upper {
                self.lower_bound(slot)
            } else {
                self.upper_bound(slot)
            };
            if p.is_error() {
                return Type::Error;
            }
            params.push(p);
        }

        Type::Function(FunctionType {
            params,
            return_type: Box::new(ret),
        })
    }

    /// Render a type for diagnostics and scope dumps
    pub fn display(&self, ty: &Type, interner: &Interner) -> String {
        match ty {
            Type::Int => "int".to_string(),
            Type::Bool => "bool".to_string(),
            Type::String => "string".to_string(),
            Type::Void => "void".to_string(),
            Type::Null => "null".to_string(),
            Type::Error => "Error".to_string(),
            Type::Array(elem) => format!("{}[]", self.display(elem, interner)),
            Type::Class(c) => format!("class {}", interner.resolve(self.info(*c).name)),
            Type::Function(f) => {
                let params: Vec<String> =
                    f.params.iter().map(|p| self.display(p, interner)).collect();
                format!(
                    "({}) => {}",
                    params.join(", "),
                    self.display(&f.return_type, interner)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Interner;

    fn fun(params: Vec<Type>, ret: Type) -> Type {
        Type::Function(FunctionType {
            params,
            return_type: Box::new(ret),
        })
    }

    /// A <- B <- C chain
    fn chain() -> (ClassGraph, ClassId, ClassId, ClassId) {
        let mut interner = Interner::new();
        let mut graph = ClassGraph::new();
        let a = graph.add(interner.intern("A"), None, false);
        let b = graph.add(interner.intern("B"), Some(a), false);
        let c = graph.add(interner.intern("C"), Some(b), false);
        (graph, a, b, c)
    }

    #[test]
    fn subtype_is_reflexive() {
        let (graph, a, _, _) = chain();
        for t in [
            Type::Int,
            Type::Bool,
            Type::String,
            Type::Void,
            Type::Null,
            Type::Class(a),
            Type::Array(Box::new(Type::Int)),
            fun(vec![Type::Int], Type::Bool),
        ] {
            assert!(graph.subtype(&t, &t), "{t:?} not reflexive");
        }
    }

    #[test]
    fn subtype_walks_super_chain() {
        let (graph, a, b, c) = chain();
        assert!(graph.subtype(&Type::Class(c), &Type::Class(a)));
        assert!(graph.subtype(&Type::Class(b), &Type::Class(a)));
        assert!(!graph.subtype(&Type::Class(a), &Type::Class(c)));
    }

    #[test]
    fn null_is_subtype_of_classes_only() {
        let (graph, a, _, _) = chain();
        assert!(graph.subtype(&Type::Null, &Type::Class(a)));
        assert!(graph.subtype(&Type::Null, &Type::Null));
        assert!(!graph.subtype(&Type::Null, &Type::Int));
        assert!(!graph.subtype(&Type::Int, &Type::Null));
    }

    #[test]
    fn error_absorbs_both_directions() {
        let (graph, a, _, _) = chain();
        assert!(graph.subtype(&Type::Error, &Type::Class(a)));
        assert!(graph.subtype(&Type::Class(a), &Type::Error));
        assert!(graph.subtype(&Type::Error, &Type::Void));
    }

    #[test]
    fn base_types_incomparable() {
        let (graph, _, _, _) = chain();
        assert!(!graph.subtype(&Type::Int, &Type::Bool));
        assert!(!graph.subtype(&Type::Bool, &Type::String));
        assert!(!graph.subtype(&Type::Void, &Type::Int));
    }

    #[test]
    fn arrays_are_invariant() {
        let (graph, a, b, _) = chain();
        let arr_a = Type::Array(Box::new(Type::Class(a)));
        let arr_b = Type::Array(Box::new(Type::Class(b)));
        assert!(graph.subtype(&arr_a, &arr_a));
        assert!(!graph.subtype(&arr_b, &arr_a));
        assert!(!graph.subtype(&arr_a, &arr_b));
    }

    #[test]
    fn functions_contravariant_in_params() {
        let (graph, a, b, _) = chain();
        // (A) => B  <=  (B) => A
        let f = fun(vec![Type::Class(a)], Type::Class(b));
        let g = fun(vec![Type::Class(b)], Type::Class(a));
        assert!(graph.subtype(&f, &g));
        assert!(!graph.subtype(&g, &f));
        // arity mismatch
        let h = fun(vec![], Type::Class(a));
        assert!(!graph.subtype(&f, &h));
    }

    #[test]
    fn subtype_transitive_on_samples() {
        let (graph, a, b, c) = chain();
        let ts = [Type::Class(a), Type::Class(b), Type::Class(c), Type::Null];
        for x in &ts {
            for y in &ts {
                for z in &ts {
                    if graph.subtype(x, y) && graph.subtype(y, z) {
                        assert!(graph.subtype(x, z), "{x:?} <= {y:?} <= {z:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn join_of_class_chain() {
        let (graph, a, b, c) = chain();
        assert_eq!(
            graph.upper_bound(&[Type::Class(b), Type::Class(c)]),
            Type::Class(b)
        );
        assert_eq!(
            graph.upper_bound(&[Type::Class(a), Type::Class(c)]),
            Type::Class(a)
        );
        assert_eq!(
            graph.upper_bound(&[Type::Null, Type::Class(c)]),
            Type::Class(c)
        );
    }

    #[test]
    fn join_of_unrelated_classes_is_error() {
        let mut interner = Interner::new();
        let mut graph = ClassGraph::new();
        let a = graph.add(interner.intern("A"), None, false);
        let d = graph.add(interner.intern("D"), None, false);
        assert_eq!(
            graph.upper_bound(&[Type::Class(a), Type::Class(d)]),
            Type::Error
        );
    }

    #[test]
    fn join_is_upper_bound_of_inputs() {
        let (graph, a, b, c) = chain();
        let inputs = [Type::Class(b), Type::Class(c), Type::Class(a)];
        let j = graph.upper_bound(&inputs);
        assert!(j.no_error());
        for t in &inputs {
            assert!(graph.subtype(t, &j));
        }
    }

    #[test]
    fn meet_is_lower_bound_of_inputs() {
        let (graph, a, b, c) = chain();
        let inputs = [Type::Class(b), Type::Class(c), Type::Class(a)];
        let m = graph.lower_bound(&inputs);
        assert_eq!(m, Type::Class(c));
        for t in &inputs {
            assert!(graph.subtype(&m, t));
        }
    }

    #[test]
    fn all_null_bounds_are_null() {
        let (graph, _, _, _) = chain();
        assert_eq!(graph.upper_bound(&[Type::Null, Type::Null]), Type::Null);
        assert_eq!(graph.lower_bound(&[Type::Null]), Type::Null);
    }

    #[test]
    fn meet_with_null_picks_null() {
        let (graph, a, _, _) = chain();
        assert_eq!(
            graph.lower_bound(&[Type::Class(a), Type::Null]),
            Type::Null
        );
    }

    #[test]
    fn base_bound_requires_equality() {
        let (graph, _, _, _) = chain();
        assert_eq!(graph.upper_bound(&[Type::Int, Type::Int]), Type::Int);
        assert_eq!(graph.upper_bound(&[Type::Int, Type::Bool]), Type::Error);
        assert_eq!(graph.upper_bound(&[Type::Int, Type::Null]), Type::Error);
    }

    #[test]
    fn function_join_flips_to_meet_on_params() {
        let (graph, _, b, c) = chain();
        // join of (B)=>B and (C)=>C is (meet(B,C)) => join(B,C) = (C) => B
        let f = fun(vec![Type::Class(b)], Type::Class(b));
        let g = fun(vec![Type::Class(c)], Type::Class(c));
        assert_eq!(
            graph.upper_bound(&[f.clone(), g.clone()]),
            fun(vec![Type::Class(c)], Type::Class(b))
        );
        // meet goes the other way: (B) => C
        assert_eq!(
            graph.lower_bound(&[f, g]),
            fun(vec![Type::Class(b)], Type::Class(c))
        );
    }

    #[test]
    fn function_bound_arity_mismatch_is_error() {
        let (graph, _, _, _) = chain();
        let f = fun(vec![Type::Int], Type::Int);
        let g = fun(vec![], Type::Int);
        assert_eq!(graph.upper_bound(&[f.clone(), g]), Type::Error);
        assert_eq!(graph.upper_bound(&[f, Type::Null]), Type::Error);
    }

    #[test]
    fn display_formats() {
        let mut interner = Interner::new();
        let mut graph = ClassGraph::new();
        let a = graph.add(interner.intern("A"), None, false);
        assert_eq!(graph.display(&Type::Int, &interner), "int");
        assert_eq!(graph.display(&Type::Class(a), &interner), "class A");
        assert_eq!(
            graph.display(&Type::Array(Box::new(Type::Int)), &interner),
            "int[]"
        );
        assert_eq!(
            graph.display(&fun(vec![Type::Int, Type::Bool], Type::Void), &interner),
            "(int, bool) => void"
        );
    }
}
