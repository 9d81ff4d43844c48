// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent for statements, Pratt
//! binding powers for expressions.
//!
//! Parsing is a single left-to-right pass and never touches the value
//! environment; the one semantic check it performs is resolving type names
//! in `DECLARE` statements and procedure headers against the builtin set,
//! which fails immediately rather than deferring to evaluation.

use slate_ast::expr::{BinOp, Expr, ExprKind};
use slate_ast::stmt::{ProcDecl, Stmt, StmtKind};
use slate_ast::token::{Token, TokenKind};
use slate_ast::ty::{TypeDef, TypeTag};
use slate_ast::Span;

/// The parser for Slate source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the whole token stream into the program's statement list.
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    // =========================================================================
    // Token navigation
    // =========================================================================

    fn current(&self) -> &Token {
        // The token stream always ends with Eof, so last() exists
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind, or fail with the uniform
    /// unexpected-token error.
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.current().span;
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// The single uniform syntax error: the offending token's textual form,
    /// kind name, and position — or "unexpected end of program" at Eof.
    fn unexpected(&self) -> ParseError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::UnexpectedEnd { span: token.span }
        } else {
            ParseError::UnexpectedToken {
                lexeme: token.kind.lexeme(),
                kind: token.kind.name(),
                span: token.span,
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse statements until the current token is one of `terminators`.
    ///
    /// The terminator itself is left for the caller. Nested blocks always
    /// come back as one flat list.
    fn parse_block(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.unexpected());
            }
            if terminators.iter().any(|t| self.check(t)) {
                return Ok(stmts);
            }
            stmts.push(self.parse_stmt()?);
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_kind() {
            TokenKind::Output => self.parse_output(),
            TokenKind::Declare => self.parse_declare(),
            TokenKind::Constant => self.parse_constant(),
            TokenKind::Input => self.parse_input(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::Procedure => self.parse_procedure(),
            TokenKind::Call => self.parse_call(),
            TokenKind::Ident(_) => self.parse_assign(),
            _ => Err(self.unexpected()),
        }
    }

    /// `OUTPUT expr`
    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let value = self.parse_expr()?;
        let span = start.to(value.span);
        Ok(Stmt { kind: StmtKind::Output(value), span })
    }

    /// `DECLARE name : TYPE`
    fn parse_declare(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (name, name_span) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let typedef = self.parse_type_tag(name, name_span)?;
        let span = start.to(typedef.span);
        Ok(Stmt { kind: StmtKind::Declare(typedef), span })
    }

    /// The `: TYPE` tail of a declaration or header parameter. Unknown type
    /// names fail here, at parse time.
    fn parse_type_tag(&mut self, name: String, name_span: Span) -> Result<TypeDef, ParseError> {
        let (type_name, type_span) = self.expect_ident()?;
        match TypeTag::from_name(&type_name) {
            Some(tag) => Ok(TypeDef { name, tag, span: name_span.to(type_span) }),
            None => Err(ParseError::UnknownType { name: type_name, span: type_span }),
        }
    }

    /// `name <- expr` (also `name = expr`)
    fn parse_assign(&mut self) -> Result<Stmt, ParseError> {
        let (name, name_span) = self.expect_ident()?;
        if !self.match_token(&TokenKind::Assign) {
            self.expect(&TokenKind::Eq)?;
        }
        let value = self.parse_expr()?;
        let span = name_span.to(value.span);
        Ok(Stmt { kind: StmtKind::Assign { name, value, constant: false }, span })
    }

    /// `CONSTANT name = expr`
    fn parse_constant(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (name, _) = self.expect_ident()?;
        if !self.match_token(&TokenKind::Eq) {
            self.expect(&TokenKind::Assign)?;
        }
        let value = self.parse_expr()?;
        let span = start.to(value.span);
        Ok(Stmt { kind: StmtKind::Assign { name, value, constant: true }, span })
    }

    /// `INPUT name` or `INPUT "prompt", name`
    fn parse_input(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let prompt = match self.current_kind().clone() {
            TokenKind::Str(text) => {
                self.advance();
                self.expect(&TokenKind::Comma)?;
                Some(text)
            }
            _ => None,
        };
        let (name, name_span) = self.expect_ident()?;
        let span = start.to(name_span);
        Ok(Stmt { kind: StmtKind::Input { prompt, name }, span })
    }

    /// `IF cond THEN ... [ELSE ...] ENDIF`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Then)?;
        let then_body = self.parse_block(&[TokenKind::Else, TokenKind::EndIf])?;
        let else_body = if self.match_token(&TokenKind::Else) {
            Some(self.parse_block(&[TokenKind::EndIf])?)
        } else {
            None
        };
        let end = self.expect(&TokenKind::EndIf)?.span;
        Ok(Stmt {
            kind: StmtKind::If { cond, then_body, else_body },
            span: start.to(end),
        })
    }

    /// `FOR var <- start TO end [STEP step] ... ENDFOR`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let for_span = self.advance().span;
        let (var, _) = self.expect_ident()?;
        if !self.match_token(&TokenKind::Assign) {
            self.expect(&TokenKind::Eq)?;
        }
        let start = self.parse_expr()?;
        self.expect(&TokenKind::To)?;
        let end = self.parse_expr()?;
        let step = if self.match_token(&TokenKind::Step) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let body = self.parse_block(&[TokenKind::EndFor])?;
        let end_span = self.expect(&TokenKind::EndFor)?.span;
        Ok(Stmt {
            kind: StmtKind::For { var, start, end, step, body },
            span: for_span.to(end_span),
        })
    }

    /// `WHILE cond DO ... ENDWHILE`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::EndWhile])?;
        let end = self.expect(&TokenKind::EndWhile)?.span;
        Ok(Stmt { kind: StmtKind::While { cond, body }, span: start.to(end) })
    }

    /// `REPEAT ... UNTIL cond`
    fn parse_repeat(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let body = self.parse_block(&[TokenKind::Until])?;
        self.expect(&TokenKind::Until)?;
        let until = self.parse_expr()?;
        let span = start.to(until.span);
        Ok(Stmt { kind: StmtKind::Repeat { body, until }, span })
    }

    /// `PROCEDURE name [(params)] ... ENDPROCEDURE`
    fn parse_procedure(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (name, _) = self.expect_ident()?;
        let params = if self.match_token(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        let body = self.parse_block(&[TokenKind::EndProcedure])?;
        let end = self.expect(&TokenKind::EndProcedure)?.span;
        Ok(Stmt {
            kind: StmtKind::Procedure(ProcDecl { name, params, body }),
            span: start.to(end),
        })
    }

    /// Header parameter list: `name : TYPE {, name : TYPE}` up to `)`.
    fn parse_params(&mut self) -> Result<Vec<TypeDef>, ParseError> {
        let mut params = Vec::new();
        loop {
            let (name, name_span) = self.expect_ident()?;
            self.expect(&TokenKind::Colon)?;
            params.push(self.parse_type_tag(name, name_span)?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `CALL name [(args)]`
    fn parse_call(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (target, name_span) = self.expect_ident()?;
        let mut span = start.to(name_span);
        let args = if self.match_token(&TokenKind::LParen) {
            let mut args = Vec::new();
            if !self.check(&TokenKind::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            span = span.to(self.expect(&TokenKind::RParen)?.span);
            args
        } else {
            Vec::new()
        };
        Ok(Stmt { kind: StmtKind::Call { target, args }, span })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Pratt loop: all tiers left-associative, loosest to tightest
    /// comparison < additive < multiplicative.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some((l_bp, r_bp)) = self.infix_bp() {
            if l_bp < min_bp {
                break;
            }
            let op = self.parse_binop()?;
            let right = self.parse_expr_bp(r_bp)?;
            let span = left.span.to(right.span);
            left = Expr {
                kind: ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            };
        }

        Ok(left)
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Gt
            | TokenKind::Lt
            | TokenKind::GtEq
            | TokenKind::LtEq => Some((1, 2)),
            TokenKind::Plus | TokenKind::Minus => Some((3, 4)),
            TokenKind::Star | TokenKind::Slash => Some((5, 6)),
            _ => None,
        }
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::NotEq => BinOp::NotEq,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::GtEq => BinOp::GtEq,
            TokenKind::LtEq => BinOp::LtEq,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(op)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current().span;
        let kind = match self.current_kind().clone() {
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Float(n) => ExprKind::Float(n),
            TokenKind::Bool(b) => ExprKind::Bool(b),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(Expr { kind, span })
    }
}

/// A parse error. Every unexpected token maps to the same uniform report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected token {lexeme} ({kind})")]
    UnexpectedToken {
        lexeme: String,
        kind: &'static str,
        span: Span,
    },

    #[error("Unexpected end of program")]
    UnexpectedEnd { span: Span },

    #[error("Type '{name}' is invalid")]
    UnknownType { name: String, span: Span },
}

impl ParseError {
    /// The error-kind name used in console reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEnd { .. } => "SyntaxError",
            ParseError::UnknownType { .. } => "UnknownType",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEnd { span }
            | ParseError::UnknownType { span, .. } => *span,
        }
    }
}
