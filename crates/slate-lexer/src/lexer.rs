//! The lexer implementation using logos.

use logos::Logos;
use slate_ast::token::{Token, TokenKind};
use slate_ast::Span;

/// Raw token type for logos - literal values are decoded in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Whitespace is matched but never emitted
enum RawToken {
    // === Statement keywords ===
    #[token("OUTPUT")]
    Output,
    #[token("DECLARE")]
    Declare,
    #[token("CONSTANT")]
    Constant,
    #[token("INPUT")]
    Input,
    #[token("IF")]
    If,
    #[token("THEN")]
    Then,
    #[token("ELSE")]
    Else,
    #[token("ENDIF")]
    EndIf,
    #[token("FOR")]
    For,
    #[token("TO")]
    To,
    #[token("STEP")]
    Step,
    #[token("ENDFOR")]
    EndFor,
    #[token("WHILE")]
    While,
    #[token("DO")]
    Do,
    #[token("ENDWHILE")]
    EndWhile,
    #[token("REPEAT")]
    Repeat,
    #[token("UNTIL")]
    Until,
    #[token("PROCEDURE")]
    Procedure,
    #[token("ENDPROCEDURE")]
    EndProcedure,
    #[token("CALL")]
    Call,

    // === Boolean literals (before the identifier rule) ===
    #[token("TRUE")]
    True,
    #[token("FALSE")]
    False,

    // === Operators (order matters - longer first) ===
    #[token("<-")]
    Assign,
    #[token("<>")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,

    // === Symbols ===
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // === Literals ===
    // Floats must come before decimal ints to match properly
    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    // Strings: single- or double-quoted, backslash escapes, empty allowed
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    Str,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// The lexer for Slate source code.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source.
    ///
    /// Stops at the first unrecognized character: the token sequence is
    /// consumed in a single pass and a lexical failure aborts the run, so
    /// there is nothing useful to collect past it.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            let span = Span::new(raw.span().start, raw.span().end);
            let kind = match result {
                Ok(token) => convert_token(token, raw.slice(), span)?,
                Err(()) => return Err(LexError { span }),
            };
            tokens.push(Token { kind, span });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        Ok(tokens)
    }
}

/// Convert a raw logos token to our TokenKind, decoding literal values.
fn convert_token(raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::Output => TokenKind::Output,
        RawToken::Declare => TokenKind::Declare,
        RawToken::Constant => TokenKind::Constant,
        RawToken::Input => TokenKind::Input,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::EndIf => TokenKind::EndIf,
        RawToken::For => TokenKind::For,
        RawToken::To => TokenKind::To,
        RawToken::Step => TokenKind::Step,
        RawToken::EndFor => TokenKind::EndFor,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::EndWhile => TokenKind::EndWhile,
        RawToken::Repeat => TokenKind::Repeat,
        RawToken::Until => TokenKind::Until,
        RawToken::Procedure => TokenKind::Procedure,
        RawToken::EndProcedure => TokenKind::EndProcedure,
        RawToken::Call => TokenKind::Call,

        RawToken::True => TokenKind::Bool(true),
        RawToken::False => TokenKind::Bool(false),

        RawToken::Assign => TokenKind::Assign,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Lt => TokenKind::Lt,

        RawToken::Colon => TokenKind::Colon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,

        RawToken::Int => {
            let value = slice.parse::<i64>().map_err(|_| LexError { span })?;
            TokenKind::Int(value)
        }
        RawToken::Float => {
            let value = slice.parse::<f64>().map_err(|_| LexError { span })?;
            TokenKind::Float(value)
        }
        RawToken::Str => {
            let inner = &slice[1..slice.len() - 1]; // Remove quotes
            TokenKind::Str(unescape(inner))
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
    })
}

/// Decode backslash escapes in a quote-stripped string literal.
///
/// Unrecognized escapes keep the backslash.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// A lexical failure: the first unrecognized character range.
///
/// Reported as a generic syntax error with no further detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid syntax")]
pub struct LexError {
    pub span: Span,
}
