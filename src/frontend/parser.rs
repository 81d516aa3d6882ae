// src/frontend/parser.rs

use crate::errors::ParserError;
use crate::frontend::{Interner, Lexer, Span, Token, TokenType, ast::*};

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    peek: Token,
    previous: Token,
    interner: Interner,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            previous: Token::new(TokenType::Eof, "", Span::default()),
            interner: Interner::new(),
        }
    }

    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut classes = Vec::new();
        while !self.check(TokenType::Eof) {
            classes.push(self.class_def()?);
        }
        Ok(Program {
            classes,
            global_scope: None,
            main_class: None,
        })
    }

    fn class_def(&mut self) -> Result<ClassDef, ParseError> {
        let start = self.current.span;
        let is_abstract = self.matches(TokenType::KwAbstract);
        self.expect(TokenType::KwClass)?;
        let id = self.identifier()?;
        let parent = if self.matches(TokenType::KwExtends) {
            Some(self.identifier()?)
        } else {
            None
        };
        self.expect(TokenType::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            fields.push(self.field_def()?);
        }
        self.expect(TokenType::RBrace)?;
        Ok(ClassDef {
            id,
            parent,
            is_abstract,
            fields,
            span: start.merge(self.previous.span),
            symbol: None,
        })
    }

    fn field_def(&mut self) -> Result<FieldDef, ParseError> {
        let start = self.current.span;
        let mut is_static = false;
        let mut is_abstract = false;
        loop {
            if self.matches(TokenType::KwStatic) {
                is_static = true;
            } else if self.matches(TokenType::KwAbstract) {
                is_abstract = true;
            } else {
                break;
            }
        }
        let ty = self.type_lit()?;
        let id = self.identifier()?;

        if self.check(TokenType::LParen) {
            self.advance();
            let params = self.param_list()?;
            self.expect(TokenType::RParen)?;
            let body = if is_abstract {
                self.expect(TokenType::Semicolon)?;
                None
            } else {
                Some(self.block()?)
            };
            Ok(FieldDef::Method(MethodDef {
                id,
                is_static,
                is_abstract,
                return_type: ty,
                params,
                body,
                span: start.merge(self.previous.span),
                symbol: None,
            }))
        } else {
            self.expect(TokenType::Semicolon)?;
            Ok(FieldDef::Var(VarDef {
                id,
                type_lit: Some(ty),
                init: None,
                assign_span: None,
                span: start.merge(self.previous.span),
                symbol: None,
            }))
        }
    }

    fn param_list(&mut self) -> Result<Vec<VarDef>, ParseError> {
        let mut params = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                let start = self.current.span;
                let ty = self.type_lit()?;
                let id = self.identifier()?;
                params.push(VarDef {
                    id,
                    type_lit: Some(ty),
                    init: None,
                    assign_span: None,
                    span: start.merge(self.previous.span),
                    symbol: None,
                });
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }
        Ok(params)
    }

    // Types

    fn starts_type(&self) -> bool {
        matches!(
            self.current.ty,
            TokenType::KwInt
                | TokenType::KwBool
                | TokenType::KwString
                | TokenType::KwVoid
                | TokenType::KwClass
        )
    }

    fn type_lit(&mut self) -> Result<TypeLit, ParseError> {
        let mut ty = self.base_type()?;
        loop {
            if self.check(TokenType::LBracket) && self.peek.ty == TokenType::RBracket {
                self.advance();
                self.advance();
                let span = ty.span.merge(self.previous.span);
                ty = TypeLit::new(TypeLitKind::Array(Box::new(ty)), span);
            } else if self.check(TokenType::LParen) {
                // Function type: ret(param, ...)
                self.advance();
                let mut params = Vec::new();
                if !self.check(TokenType::RParen) {
                    loop {
                        params.push(self.type_lit()?);
                        if !self.matches(TokenType::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenType::RParen)?;
                let span = ty.span.merge(self.previous.span);
                ty = TypeLit::new(
                    TypeLitKind::Fun {
                        ret: Box::new(ty),
                        params,
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn base_type(&mut self) -> Result<TypeLit, ParseError> {
        let span = self.current.span;
        let kind = match self.current.ty {
            TokenType::KwInt => TypeLitKind::Int,
            TokenType::KwBool => TypeLitKind::Bool,
            TokenType::KwString => TypeLitKind::String,
            TokenType::KwVoid => TypeLitKind::Void,
            TokenType::KwClass => {
                self.advance();
                let id = self.identifier()?;
                return Ok(TypeLit::new(
                    TypeLitKind::Class(id.name),
                    span.merge(id.span),
                ));
            }
            _ => {
                return Err(ParseError::new(
                    ParserError::ExpectedType {
                        span: self.current.span.into(),
                    },
                    self.current.span,
                ));
            }
        };
        self.advance();
        Ok(TypeLit::new(kind, span))
    }

    // Statements

    fn block(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(TokenType::LBrace)?.span;
        let mut stmts = Vec::new();
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            stmts.push(self.stmt()?);
        }
        self.expect(TokenType::RBrace)?;
        Ok(Block::new(stmts, start.merge(self.previous.span)))
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span;
        match self.current.ty {
            TokenType::LBrace => {
                let block = self.block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Block(block), span))
            }
            TokenType::KwIf => {
                self.advance();
                self.expect(TokenType::LParen)?;
                let cond = self.expr()?;
                self.expect(TokenType::RParen)?;
                let then_branch = self.stmt_as_block()?;
                let else_branch = if self.matches(TokenType::KwElse) {
                    Some(self.stmt_as_block()?)
                } else {
                    None
                };
                Ok(Stmt::new(
                    StmtKind::If(If {
                        cond,
                        then_branch,
                        else_branch,
                    }),
                    start.merge(self.previous.span),
                ))
            }
            TokenType::KwWhile => {
                self.advance();
                self.expect(TokenType::LParen)?;
                let cond = self.expr()?;
                self.expect(TokenType::RParen)?;
                let body = self.stmt_as_block()?;
                Ok(Stmt::new(
                    StmtKind::While(While { cond, body }),
                    start.merge(self.previous.span),
                ))
            }
            TokenType::KwFor => {
                self.advance();
                self.expect(TokenType::LParen)?;
                let init = self.simple_stmt()?;
                self.expect(TokenType::Semicolon)?;
                let cond = self.expr()?;
                self.expect(TokenType::Semicolon)?;
                let update = self.simple_stmt()?;
                self.expect(TokenType::RParen)?;
                let body = self.stmt_as_block()?;
                Ok(Stmt::new(
                    StmtKind::For(For {
                        init: Box::new(init),
                        cond,
                        update: Box::new(update),
                        body,
                        scope: None,
                    }),
                    start.merge(self.previous.span),
                ))
            }
            TokenType::KwBreak => {
                self.advance();
                self.expect(TokenType::Semicolon)?;
                Ok(Stmt::new(StmtKind::Break, start))
            }
            TokenType::KwReturn => {
                self.advance();
                let expr = if self.check(TokenType::Semicolon) {
                    None
                } else {
                    Some(self.expr()?)
                };
                self.expect(TokenType::Semicolon)?;
                Ok(Stmt::new(
                    StmtKind::Return(expr),
                    start.merge(self.previous.span),
                ))
            }
            TokenType::KwPrint => {
                self.advance();
                self.expect(TokenType::LParen)?;
                let mut args = Vec::new();
                if !self.check(TokenType::RParen) {
                    loop {
                        args.push(self.expr()?);
                        if !self.matches(TokenType::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenType::RParen)?;
                self.expect(TokenType::Semicolon)?;
                Ok(Stmt::new(
                    StmtKind::Print(args),
                    start.merge(self.previous.span),
                ))
            }
            _ => {
                let stmt = self.simple_stmt()?;
                self.expect(TokenType::Semicolon)?;
                Ok(stmt)
            }
        }
    }

    /// Wrap a single-statement body in a block so every control-flow arm
    /// is uniformly a Block downstream.
    fn stmt_as_block(&mut self) -> Result<Block, ParseError> {
        let stmt = self.stmt()?;
        if let StmtKind::Block(block) = stmt.kind {
            Ok(block)
        } else {
            let span = stmt.span;
            Ok(Block::new(vec![stmt], span))
        }
    }

    /// Local definition, assignment, bare expression, or nothing
    fn simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span;

        if self.check(TokenType::Semicolon) || self.check(TokenType::RParen) {
            return Ok(Stmt::new(StmtKind::Skip, start));
        }

        if self.check(TokenType::KwVar) {
            self.advance();
            let id = self.identifier()?;
            let assign_span = self.current.span;
            self.expect(TokenType::Eq)?;
            let init = self.expr()?;
            return Ok(Stmt::new(
                StmtKind::LocalVarDef(VarDef {
                    id,
                    type_lit: None,
                    init: Some(init),
                    assign_span: Some(assign_span),
                    span: start.merge(self.previous.span),
                    symbol: None,
                }),
                start.merge(self.previous.span),
            ));
        }

        if self.starts_type() {
            let ty = self.type_lit()?;
            let id = self.identifier()?;
            let (init, assign_span) = if self.check(TokenType::Eq) {
                let assign_span = self.current.span;
                self.advance();
                (Some(self.expr()?), Some(assign_span))
            } else {
                (None, None)
            };
            return Ok(Stmt::new(
                StmtKind::LocalVarDef(VarDef {
                    id,
                    type_lit: Some(ty),
                    init,
                    assign_span,
                    span: start.merge(self.previous.span),
                    symbol: None,
                }),
                start.merge(self.previous.span),
            ));
        }

        let lhs = self.expr()?;
        if self.matches(TokenType::Eq) {
            if !matches!(lhs.kind, ExprKind::VarSel(_) | ExprKind::IndexSel(_)) {
                return Err(ParseError::new(
                    ParserError::InvalidAssignmentTarget {
                        span: lhs.span.into(),
                    },
                    lhs.span,
                ));
            }
            let rhs = self.expr()?;
            return Ok(Stmt::new(
                StmtKind::Assign(Assign { lhs, rhs }),
                start.merge(self.previous.span),
            ));
        }
        let span = lhs.span;
        Ok(Stmt::new(StmtKind::ExprEval(lhs), span))
    }

    // Expressions, precedence climbing

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.matches(TokenType::PipePipe) {
            let rhs = self.and_expr()?;
            lhs = Self::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.equality_expr()?;
        while self.matches(TokenType::AmpAmp) {
            let rhs = self.equality_expr()?;
            lhs = Self::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn equality_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.relational_expr()?;
        loop {
            let op = match self.current.ty {
                TokenType::EqEq => BinaryOp::Eq,
                TokenType::BangEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.relational_expr()?;
            lhs = Self::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn relational_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.additive_expr()?;
        loop {
            if self.matches(TokenType::KwInstanceof) {
                let class = self.identifier()?;
                let span = lhs.span.merge(self.previous.span);
                lhs = Expr::new(
                    ExprKind::ClassTest(ClassTest {
                        obj: Box::new(lhs),
                        class,
                        symbol: None,
                    }),
                    span,
                );
                continue;
            }
            let op = match self.current.ty {
                TokenType::Lt => BinaryOp::Lt,
                TokenType::LtEq => BinaryOp::Le,
                TokenType::Gt => BinaryOp::Gt,
                TokenType::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.additive_expr()?;
            lhs = Self::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn additive_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative_expr()?;
        loop {
            let op = match self.current.ty {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.multiplicative_expr()?;
            lhs = Self::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn multiplicative_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary_expr()?;
        loop {
            let op = match self.current.ty {
                TokenType::Star => BinaryOp::Mul,
                TokenType::Slash => BinaryOp::Div,
                TokenType::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.unary_expr()?;
            lhs = Self::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let op = match self.current.ty {
            TokenType::Minus => Some(UnaryOp::Neg),
            TokenType::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.unary_expr()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary(UnaryExpr {
                    op,
                    operand: Box::new(operand),
                }),
                span,
            ));
        }
        // Class cast: (class A) expr
        if self.check(TokenType::LParen) && self.peek.ty == TokenType::KwClass {
            self.advance();
            self.advance();
            let class = self.identifier()?;
            self.expect(TokenType::RParen)?;
            let obj = self.unary_expr()?;
            let span = start.merge(obj.span);
            return Ok(Expr::new(
                ExprKind::ClassCast(ClassCast {
                    obj: Box::new(obj),
                    class,
                    symbol: None,
                }),
                span,
            ));
        }
        self.postfix_expr()
    }

    fn postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary_expr()?;
        loop {
            match self.current.ty {
                TokenType::Dot => {
                    self.advance();
                    let id = self.identifier()?;
                    let span = expr.span.merge(id.span);
                    expr = Expr::new(
                        ExprKind::VarSel(VarSel::new(Some(Box::new(expr)), id)),
                        span,
                    );
                }
                TokenType::LBracket => {
                    self.advance();
                    let index = self.expr()?;
                    self.expect(TokenType::RBracket)?;
                    let span = expr.span.merge(self.previous.span);
                    expr = Expr::new(
                        ExprKind::IndexSel(IndexSel {
                            array: Box::new(expr),
                            index: Box::new(index),
                        }),
                        span,
                    );
                }
                TokenType::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenType::RParen) {
                        loop {
                            args.push(self.expr()?);
                            if !self.matches(TokenType::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenType::RParen)?;
                    let span = expr.span.merge(self.previous.span);
                    expr = Expr::new(
                        ExprKind::Call(Call {
                            func: Box::new(expr),
                            args,
                            is_array_length: false,
                        }),
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn primary_expr(&mut self) -> Result<Expr, ParseError> {
        let span = self.current.span;
        match self.current.ty {
            TokenType::IntLiteral => {
                let value: i32 = self.current.lexeme.parse().unwrap_or_default();
                self.advance();
                Ok(Expr::new(ExprKind::IntLit(value), span))
            }
            TokenType::StringLiteral => {
                let value = self.current.lexeme.clone();
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(value), span))
            }
            TokenType::KwTrue => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true), span))
            }
            TokenType::KwFalse => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false), span))
            }
            TokenType::KwNull => {
                self.advance();
                Ok(Expr::new(ExprKind::NullLit, span))
            }
            TokenType::KwThis => {
                self.advance();
                Ok(Expr::new(ExprKind::This, span))
            }
            TokenType::KwReadInteger => {
                self.advance();
                self.expect(TokenType::LParen)?;
                self.expect(TokenType::RParen)?;
                Ok(Expr::new(ExprKind::ReadInt, span.merge(self.previous.span)))
            }
            TokenType::KwReadLine => {
                self.advance();
                self.expect(TokenType::LParen)?;
                self.expect(TokenType::RParen)?;
                Ok(Expr::new(
                    ExprKind::ReadLine,
                    span.merge(self.previous.span),
                ))
            }
            TokenType::KwNew => self.new_expr(),
            TokenType::KwFun => self.lambda_expr(),
            TokenType::Identifier => {
                let id = self.identifier()?;
                Ok(Expr::new(ExprKind::VarSel(VarSel::new(None, id)), id.span))
            }
            TokenType::LParen => {
                self.advance();
                let expr = self.expr()?;
                self.expect(TokenType::RParen)?;
                Ok(expr)
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedExpression {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    fn new_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(TokenType::KwNew)?.span;
        // new C()
        if self.check(TokenType::Identifier) && self.peek.ty == TokenType::LParen {
            let class = self.identifier()?;
            self.advance();
            self.expect(TokenType::RParen)?;
            return Ok(Expr::new(
                ExprKind::NewClass(NewClass {
                    class,
                    symbol: None,
                }),
                start.merge(self.previous.span),
            ));
        }
        // new T[len], where T may itself be an array type: new int[][len]
        let mut elem = self.base_type()?;
        while self.check(TokenType::LBracket) && self.peek.ty == TokenType::RBracket {
            self.advance();
            self.advance();
            let span = elem.span.merge(self.previous.span);
            elem = TypeLit::new(TypeLitKind::Array(Box::new(elem)), span);
        }
        self.expect(TokenType::LBracket)?;
        let length = self.expr()?;
        self.expect(TokenType::RBracket)?;
        Ok(Expr::new(
            ExprKind::NewArray(NewArray {
                elem_type: elem,
                length: Box::new(length),
            }),
            start.merge(self.previous.span),
        ))
    }

    fn lambda_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(TokenType::KwFun)?.span;
        self.expect(TokenType::LParen)?;
        let params = self.param_list()?;
        self.expect(TokenType::RParen)?;
        let body = if self.matches(TokenType::Arrow) {
            LambdaBody::Expr(Box::new(self.expr()?))
        } else {
            LambdaBody::Block(self.block()?)
        };
        Ok(Expr::new(
            ExprKind::Lambda(Lambda {
                params,
                body,
                symbol: None,
                captures: Vec::new(),
            }),
            start.merge(self.previous.span),
        ))
    }

    // Helpers

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let span = lhs.span.merge(rhs.span);
        Expr::new(
            ExprKind::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            span,
        )
    }

    fn identifier(&mut self) -> Result<Id, ParseError> {
        if self.current.ty != TokenType::Identifier {
            return Err(ParseError::new(
                ParserError::ExpectedIdentifier {
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        let name = self.interner.intern(&self.current.lexeme);
        let span = self.current.span;
        self.advance();
        Ok(Id { name, span })
    }

    fn advance(&mut self) -> Token {
        self.previous = std::mem::replace(
            &mut self.current,
            std::mem::replace(&mut self.peek, self.lexer.next_token()),
        );
        self.previous.clone()
    }

    fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    fn matches(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ty: TokenType) -> Result<Token, ParseError> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ParserError::ExpectedToken {
                    expected: ty.as_str().to_string(),
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source);
        parser.parse_program().expect("parse failed")
    }

    #[test]
    fn parse_empty_class() {
        let program = parse("class A { }");
        assert_eq!(program.classes.len(), 1);
        assert!(!program.classes[0].is_abstract);
        assert!(program.classes[0].parent.is_none());
    }

    #[test]
    fn parse_inheritance_and_abstract() {
        let program = parse("abstract class A { } class B extends A { }");
        assert!(program.classes[0].is_abstract);
        assert!(program.classes[1].parent.is_some());
    }

    #[test]
    fn parse_fields_and_methods() {
        let program = parse(
            "class A { int x; static void main() { } abstract int f(int y); }",
        );
        let fields = &program.classes[0].fields;
        assert_eq!(fields.len(), 3);
        assert!(matches!(fields[0], FieldDef::Var(_)));
        match &fields[1] {
            FieldDef::Method(m) => {
                assert!(m.is_static);
                assert!(m.body.is_some());
            }
            _ => panic!("expected method"),
        }
        match &fields[2] {
            FieldDef::Method(m) => {
                assert!(m.is_abstract);
                assert!(m.body.is_none());
                assert_eq!(m.params.len(), 1);
            }
            _ => panic!("expected method"),
        }
    }

    #[test]
    fn parse_array_and_function_types() {
        let program = parse("class A { int[] xs; int(int, bool) f; class A next; }");
        let fields = &program.classes[0].fields;
        match &fields[0] {
            FieldDef::Var(v) => assert!(matches!(
                v.type_lit.as_ref().unwrap().kind,
                TypeLitKind::Array(_)
            )),
            _ => panic!(),
        }
        match &fields[1] {
            FieldDef::Var(v) => match &v.type_lit.as_ref().unwrap().kind {
                TypeLitKind::Fun { params, .. } => assert_eq!(params.len(), 2),
                _ => panic!("expected function type"),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn parse_statements() {
        let program = parse(
            r#"class Main {
                static void main() {
                    int x = 0;
                    var y = x + 1;
                    if (x < y) { x = y; } else x = 0;
                    while (true) break;
                    for (x = 0; x < 10; x = x + 1) Print(x);
                    return;
                }
            }"#,
        );
        let FieldDef::Method(m) = &program.classes[0].fields[0] else {
            panic!()
        };
        assert_eq!(m.body.as_ref().unwrap().stmts.len(), 6);
    }

    #[test]
    fn parse_var_def_has_no_type_lit() {
        let program = parse("class Main { static void main() { var y = 1; } }");
        let FieldDef::Method(m) = &program.classes[0].fields[0] else {
            panic!()
        };
        let StmtKind::LocalVarDef(def) = &m.body.as_ref().unwrap().stmts[0].kind else {
            panic!()
        };
        assert!(def.type_lit.is_none());
        assert!(def.init.is_some());
    }

    #[test]
    fn parse_expressions() {
        let program = parse(
            r#"class Main {
                static void main() {
                    var a = new A();
                    var b = new int[10];
                    var c = a.x[0] + f(1, 2) * -3;
                    var d = a instanceof A;
                    var e = (class A) a;
                    var g = this;
                }
            }"#,
        );
        assert_eq!(program.classes.len(), 1);
    }

    #[test]
    fn parse_lambdas() {
        let program = parse(
            r#"class Main {
                static void main() {
                    var f = fun(int x) => x + 1;
                    var g = fun(int x) { return x; };
                }
            }"#,
        );
        let FieldDef::Method(m) = &program.classes[0].fields[0] else {
            panic!()
        };
        let body = m.body.as_ref().unwrap();
        let StmtKind::LocalVarDef(def) = &body.stmts[0].kind else {
            panic!()
        };
        let ExprKind::Lambda(lam) = &def.init.as_ref().unwrap().kind else {
            panic!("expected lambda")
        };
        assert!(matches!(lam.body, LambdaBody::Expr(_)));
        let StmtKind::LocalVarDef(def) = &body.stmts[1].kind else {
            panic!()
        };
        let ExprKind::Lambda(lam) = &def.init.as_ref().unwrap().kind else {
            panic!("expected lambda")
        };
        assert!(matches!(lam.body, LambdaBody::Block(_)));
    }

    #[test]
    fn parse_assignment_target_checked() {
        let mut parser = Parser::new("class Main { static void main() { 1 = 2; } }");
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn parse_call_chain() {
        let program = parse("class Main { static void main() { a.b(1)[2].c(); } }");
        assert_eq!(program.classes.len(), 1);
    }
}
