// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).
//!
//! Message texts follow the Decaf reference wording; several of them are
//! pinned verbatim by golden tests downstream.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("declaration of '{name}' here conflicts with earlier declaration at {earlier}")]
    #[diagnostic(code(E2001))]
    DeclConflict {
        name: String,
        /// Rendered position of the earlier declaration, e.g. "(3,5)"
        earlier: String,
        #[label("conflicting declaration")]
        span: SourceSpan,
    },

    #[error("class '{name}' not found")]
    #[diagnostic(code(E2002))]
    ClassNotFound {
        name: String,
        #[label("unknown class")]
        span: SourceSpan,
    },

    #[error("illegal class inheritance (should be acyclic)")]
    #[diagnostic(code(E2003))]
    BadInheritance {
        #[label("part of an inheritance cycle")]
        span: SourceSpan,
    },

    #[error("overriding method '{name}' doesn't match the type signature in class '{parent}'")]
    #[diagnostic(code(E2004))]
    BadOverride {
        name: String,
        parent: String,
        #[label("incompatible override")]
        span: SourceSpan,
    },

    #[error("overriding variable is not allowed for var '{name}'")]
    #[diagnostic(code(E2005))]
    OverridingVar {
        name: String,
        #[label("shadows an inherited member variable")]
        span: SourceSpan,
    },

    #[error("'{name}' is not abstract and does not override all abstract methods")]
    #[diagnostic(code(E2006))]
    NoAbstract {
        name: String,
        #[label("missing overrides")]
        span: SourceSpan,
    },

    #[error("cannot declare identifier '{name}' as void type")]
    #[diagnostic(code(E2007))]
    BadVarType {
        name: String,
        #[label("void variable")]
        span: SourceSpan,
    },

    #[error("array element type must be non-void known type")]
    #[diagnostic(code(E2008))]
    BadArrElement {
        #[label("bad element type")]
        span: SourceSpan,
    },

    #[error("arguments in function type must be non-void known type")]
    #[diagnostic(code(E2009))]
    VoidArgs {
        #[label("void argument type")]
        span: SourceSpan,
    },

    #[error("no legal Main class named 'Main' was found")]
    #[diagnostic(code(E2010))]
    NoMainClass,

    #[error("missing return statement: control reaches end of non-void block")]
    #[diagnostic(code(E2011))]
    MissingReturn {
        #[label("control may reach here without returning")]
        span: SourceSpan,
    },

    #[error("test expression must have bool type")]
    #[diagnostic(code(E2012))]
    BadTestExpr {
        #[label("expected bool")]
        span: SourceSpan,
    },

    #[error("'break' is only allowed inside a loop")]
    #[diagnostic(code(E2013))]
    BreakOutOfLoop {
        #[label("not inside a loop")]
        span: SourceSpan,
    },

    #[error("incompatible argument {index}: {found} given, int/bool/string expected")]
    #[diagnostic(code(E2014))]
    BadPrintArg {
        index: usize,
        found: String,
        #[label("not printable")]
        span: SourceSpan,
    },

    #[error("incompatible return: {found} given, {expected} expected")]
    #[diagnostic(code(E2015))]
    BadReturnType {
        expected: String,
        found: String,
        #[label("wrong return type")]
        span: SourceSpan,
    },

    #[error("incompatible operand: {op} {found}")]
    #[diagnostic(code(E2016))]
    IncompatUnOp {
        op: String,
        found: String,
        #[label("bad operand")]
        span: SourceSpan,
    },

    #[error("incompatible operands: {left} {op} {right}")]
    #[diagnostic(code(E2017))]
    IncompatBinOp {
        left: String,
        op: String,
        right: String,
        #[label("bad operands")]
        span: SourceSpan,
    },

    #[error("[] can only be applied to arrays")]
    #[diagnostic(code(E2018))]
    NotArray {
        #[label("not an array")]
        span: SourceSpan,
    },

    #[error("array subscript must be an integer")]
    #[diagnostic(code(E2019))]
    SubNotInt {
        #[label("expected int subscript")]
        span: SourceSpan,
    },

    #[error("new array length must be an integer")]
    #[diagnostic(code(E2020))]
    BadNewArrayLength {
        #[label("expected int length")]
        span: SourceSpan,
    },

    #[error("can not use this in static function")]
    #[diagnostic(code(E2021))]
    ThisInStaticFunc {
        #[label("'this' in static context")]
        span: SourceSpan,
    },

    #[error("undeclared variable '{name}'")]
    #[diagnostic(code(E2022))]
    UndeclVar {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("{found} is not a class")]
    #[diagnostic(code(E2023))]
    NotClass {
        found: String,
        #[label("expected class type")]
        span: SourceSpan,
    },

    #[error("field '{name}' not found in '{owner}'")]
    #[diagnostic(code(E2024))]
    FieldNotFound {
        name: String,
        owner: String,
        #[label("no such field")]
        span: SourceSpan,
    },

    #[error("field '{name}' of '{owner}' not accessible here")]
    #[diagnostic(code(E2025))]
    FieldNotAccess {
        name: String,
        owner: String,
        #[label("member variable is protected")]
        span: SourceSpan,
    },

    #[error("cannot access field '{name}' from '{owner}'")]
    #[diagnostic(code(E2026))]
    NotClassField {
        name: String,
        owner: String,
        #[label("invalid access")]
        span: SourceSpan,
    },

    #[error("can not reference a non-static field '{field}' from static method '{method}'")]
    #[diagnostic(code(E2027))]
    RefNonStatic {
        field: String,
        method: String,
        #[label("non-static reference")]
        span: SourceSpan,
    },

    #[error("'{found}' is not a callable type")]
    #[diagnostic(code(E2028))]
    NotCallable {
        found: String,
        #[label("not a function")]
        span: SourceSpan,
    },

    #[error("{callee} expects {expected} argument(s) but {found} given")]
    #[diagnostic(code(E2029))]
    BadArgCount {
        /// "function 'f'" or "lambda expression"
        callee: String,
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("incompatible argument {index}: {found} given, {expected} expected")]
    #[diagnostic(code(E2030))]
    BadArgType {
        index: usize,
        found: String,
        expected: String,
        #[label("wrong argument type")]
        span: SourceSpan,
    },

    #[error("function 'length' expects 0 argument(s) but {found} given")]
    #[diagnostic(code(E2031))]
    BadLengthArg {
        found: usize,
        #[label("'length' takes no arguments")]
        span: SourceSpan,
    },

    #[error("cannot instantiate abstract class '{name}'")]
    #[diagnostic(code(E2032))]
    BadInstantiate {
        name: String,
        #[label("abstract class")]
        span: SourceSpan,
    },

    #[error("cannot assign value to class member method '{name}'")]
    #[diagnostic(code(E2033))]
    AssignToMemberMethod {
        name: String,
        #[label("methods are not assignable")]
        span: SourceSpan,
    },

    #[error("cannot assign value to captured variables in lambda expression")]
    #[diagnostic(code(E2034))]
    AssignToCapturedVar {
        #[label("captured variable")]
        span: SourceSpan,
    },

    #[error("incompatible return types in blocked expression")]
    #[diagnostic(code(E2035))]
    IncompatRetType {
        #[label("returns disagree")]
        span: SourceSpan,
    },
}
