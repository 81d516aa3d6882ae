// src/commands/mod.rs

pub mod check;
pub mod scopes;

use crate::frontend::{Interner, ParseError, Parser, Program, Span};
use crate::sema::{Analysis, TypeError, analyze};

/// Parse and analyze one source buffer. On failure every diagnostic is
/// already rendered, one line each, in source order.
pub fn analyze_source(source: &str) -> Result<(Program, Analysis, Interner), Vec<String>> {
    let mut parser = Parser::new(source);
    let mut program = match parser.parse_program() {
        Ok(program) => program,
        Err(err) => return Err(vec![render_parse_error(&err)]),
    };
    let mut interner = parser.into_interner();
    match analyze(&mut program, &mut interner) {
        Ok(analysis) => Ok((program, analysis, interner)),
        Err(errors) => Err(errors.iter().map(render_type_error).collect()),
    }
}

fn render_parse_error(err: &ParseError) -> String {
    format!("*** Error at {}: {}", err.span.pos(), err.error)
}

fn render_type_error(err: &TypeError) -> String {
    if err.span == Span::default() {
        // errors without a position, e.g. the missing Main class
        format!("*** Error: {}", err.error)
    } else {
        format!("*** Error at {}: {}", err.span.pos(), err.error)
    }
}
