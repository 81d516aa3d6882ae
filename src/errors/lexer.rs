// src/errors/lexer.rs
//! Lexer errors (E0xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LexerError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(code(E0001))]
    UnexpectedCharacter {
        ch: char,
        #[label("unrecognized")]
        span: SourceSpan,
    },

    #[error("unterminated string literal")]
    #[diagnostic(code(E0002))]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("integer literal too large")]
    #[diagnostic(code(E0003))]
    IntegerTooLarge {
        #[label("does not fit in int")]
        span: SourceSpan,
    },
}
