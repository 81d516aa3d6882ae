// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '.' => self.make_token(TokenType::Dot),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),
            '=' => {
                if self.matches('=') {
                    self.make_token(TokenType::EqEq)
                } else if self.matches('>') {
                    self.make_token(TokenType::Arrow)
                } else {
                    self.make_token(TokenType::Eq)
                }
            }
            '!' => {
                if self.matches('=') {
                    self.make_token(TokenType::BangEq)
                } else {
                    self.make_token(TokenType::Bang)
                }
            }
            '<' => {
                if self.matches('=') {
                    self.make_token(TokenType::LtEq)
                } else {
                    self.make_token(TokenType::Lt)
                }
            }
            '>' => {
                if self.matches('=') {
                    self.make_token(TokenType::GtEq)
                } else {
                    self.make_token(TokenType::Gt)
                }
            }
            '&' => {
                if self.matches('&') {
                    self.make_token(TokenType::AmpAmp)
                } else {
                    self.error_token(c)
                }
            }
            '|' => {
                if self.matches('|') {
                    self.make_token(TokenType::PipePipe)
                } else {
                    self.error_token(c)
                }
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            c => self.error_token(c),
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\r') | Some('\t') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    match self.peek_second() {
                        Some('/') => {
                            while let Some(c) = self.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.advance();
                            }
                        }
                        Some('*') => {
                            self.advance();
                            self.advance();
                            loop {
                                match self.advance() {
                                    Some('*') if self.peek() == Some('/') => {
                                        self.advance();
                                        break;
                                    }
                                    Some(_) => {}
                                    None => break,
                                }
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
    }

    fn string(&mut self) -> Token {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(c) => value.push(c),
                    None => {
                        self.errors.push(LexerError::UnterminatedString {
                            span: self.current_span().into(),
                        });
                        return self.make_token(TokenType::Error);
                    }
                },
                Some('\n') | None => {
                    self.errors.push(LexerError::UnterminatedString {
                        span: self.current_span().into(),
                    });
                    return self.make_token(TokenType::Error);
                }
                Some(c) => value.push(c),
            }
        }
        Token::new(TokenType::StringLiteral, value, self.current_span())
    }

    fn number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }
        let lexeme = &self.source[self.start..self.current];
        if lexeme.parse::<i32>().is_err() {
            self.errors.push(LexerError::IntegerTooLarge {
                span: self.current_span().into(),
            });
            return self.make_token(TokenType::Error);
        }
        self.make_token(TokenType::IntLiteral)
    }

    fn identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.advance();
        }
        let ty = match &self.source[self.start..self.current] {
            "abstract" => TokenType::KwAbstract,
            "bool" => TokenType::KwBool,
            "break" => TokenType::KwBreak,
            "class" => TokenType::KwClass,
            "else" => TokenType::KwElse,
            "extends" => TokenType::KwExtends,
            "false" => TokenType::KwFalse,
            "for" => TokenType::KwFor,
            "fun" => TokenType::KwFun,
            "if" => TokenType::KwIf,
            "instanceof" => TokenType::KwInstanceof,
            "int" => TokenType::KwInt,
            "new" => TokenType::KwNew,
            "null" => TokenType::KwNull,
            "Print" => TokenType::KwPrint,
            "ReadInteger" => TokenType::KwReadInteger,
            "ReadLine" => TokenType::KwReadLine,
            "return" => TokenType::KwReturn,
            "static" => TokenType::KwStatic,
            "string" => TokenType::KwString,
            "this" => TokenType::KwThis,
            "true" => TokenType::KwTrue,
            "var" => TokenType::KwVar,
            "void" => TokenType::KwVoid,
            "while" => TokenType::KwWhile,
            _ => TokenType::Identifier,
        };
        self.make_token(ty)
    }

    fn error_token(&mut self, c: char) -> Token {
        self.errors.push(LexerError::UnexpectedCharacter {
            ch: c,
            span: self.current_span().into(),
        });
        self.make_token(TokenType::Error)
    }

    fn advance(&mut self) -> Option<char> {
        let (i, c) = self.chars.next()?;
        self.current = i + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&mut self) -> Option<char> {
        let mut clone = self.chars.clone();
        clone.next();
        clone.next().map(|(_, c)| c)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::new(self.start, self.current, self.start_line, self.start_column)
    }

    fn make_token(&self, ty: TokenType) -> Token {
        Token::new(
            ty,
            &self.source[self.start..self.current],
            self.current_span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_types(source: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.ty == TokenType::Eof {
                break;
            }
            out.push(tok.ty);
        }
        out
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        assert_eq!(
            lex_types("class Main extends Base"),
            vec![
                TokenType::KwClass,
                TokenType::Identifier,
                TokenType::KwExtends,
                TokenType::Identifier,
            ]
        );
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            lex_types("== != <= >= && || =>"),
            vec![
                TokenType::EqEq,
                TokenType::BangEq,
                TokenType::LtEq,
                TokenType::GtEq,
                TokenType::AmpAmp,
                TokenType::PipePipe,
                TokenType::Arrow,
            ]
        );
    }

    #[test]
    fn lex_comments() {
        assert_eq!(
            lex_types("1 // comment\n2 /* block */ 3"),
            vec![
                TokenType::IntLiteral,
                TokenType::IntLiteral,
                TokenType::IntLiteral,
            ]
        );
    }

    #[test]
    fn lex_string_escapes() {
        let mut lexer = Lexer::new(r#""a\nb""#);
        let tok = lexer.next_token();
        assert_eq!(tok.ty, TokenType::StringLiteral);
        assert_eq!(tok.lexeme, "a\nb");
    }

    #[test]
    fn lex_tracks_positions() {
        let mut lexer = Lexer::new("a\n  b");
        let a = lexer.next_token();
        let b = lexer.next_token();
        assert_eq!((a.span.line, a.span.column), (1, 1));
        assert_eq!((b.span.line, b.span.column), (2, 3));
    }

    #[test]
    fn lex_huge_integer_reports_error() {
        let mut lexer = Lexer::new("99999999999999999999");
        let tok = lexer.next_token();
        assert_eq!(tok.ty, TokenType::Error);
        assert!(lexer.has_errors());
    }
}
