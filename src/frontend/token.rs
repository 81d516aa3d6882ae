// src/frontend/token.rs

/// All token types in the Decaf language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwAbstract,
    KwBool,
    KwBreak,
    KwClass,
    KwElse,
    KwExtends,
    KwFalse,
    KwFor,
    KwFun,
    KwIf,
    KwInstanceof,
    KwInt,
    KwNew,
    KwNull,
    KwPrint,
    KwReadInteger,
    KwReadLine,
    KwReturn,
    KwStatic,
    KwString,
    KwThis,
    KwTrue,
    KwVar,
    KwVoid,
    KwWhile,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    BangEq,
    Bang,
    AmpAmp,
    PipePipe,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    Arrow, // =>

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,

    Eof,
    Error,
}

impl TokenType {
    /// Human-readable token name for parser error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::IntLiteral => "integer literal",
            TokenType::StringLiteral => "string literal",
            TokenType::Identifier => "identifier",
            TokenType::KwAbstract => "abstract",
            TokenType::KwBool => "bool",
            TokenType::KwBreak => "break",
            TokenType::KwClass => "class",
            TokenType::KwElse => "else",
            TokenType::KwExtends => "extends",
            TokenType::KwFalse => "false",
            TokenType::KwFor => "for",
            TokenType::KwFun => "fun",
            TokenType::KwIf => "if",
            TokenType::KwInstanceof => "instanceof",
            TokenType::KwInt => "int",
            TokenType::KwNew => "new",
            TokenType::KwNull => "null",
            TokenType::KwPrint => "Print",
            TokenType::KwReadInteger => "ReadInteger",
            TokenType::KwReadLine => "ReadLine",
            TokenType::KwReturn => "return",
            TokenType::KwStatic => "static",
            TokenType::KwString => "string",
            TokenType::KwThis => "this",
            TokenType::KwTrue => "true",
            TokenType::KwVar => "var",
            TokenType::KwVoid => "void",
            TokenType::KwWhile => "while",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Percent => "%",
            TokenType::EqEq => "==",
            TokenType::BangEq => "!=",
            TokenType::Bang => "!",
            TokenType::AmpAmp => "&&",
            TokenType::PipePipe => "||",
            TokenType::Lt => "<",
            TokenType::Gt => ">",
            TokenType::LtEq => "<=",
            TokenType::GtEq => ">=",
            TokenType::Eq => "=",
            TokenType::Arrow => "=>",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Dot => ".",
            TokenType::Eof => "end of file",
            TokenType::Error => "error",
        }
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // 1-indexed
    pub column: u32,  // 1-indexed
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }

    /// "(line,col)" as it appears in rendered diagnostics
    pub fn pos(&self) -> String {
        format!("({},{})", self.line, self.column)
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

impl From<&Span> for miette::SourceSpan {
    fn from(span: &Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }
}
