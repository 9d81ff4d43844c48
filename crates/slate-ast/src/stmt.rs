// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::expr::Expr;
use crate::ty::TypeDef;
use crate::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
///
/// Blocks are flat `Vec<Stmt>` sequences: nested list productions are
/// spliced by the parser, never wrapped in block-of-block trees.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `OUTPUT expr`
    Output(Expr),
    /// `DECLARE name : TYPE`
    Declare(TypeDef),
    /// `name <- expr`, or `CONSTANT name = expr`
    Assign {
        name: String,
        value: Expr,
        constant: bool,
    },
    /// `INPUT name` or `INPUT "prompt", name`
    Input {
        prompt: Option<String>,
        name: String,
    },
    /// `IF cond THEN ... [ELSE ...] ENDIF`
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    /// `FOR var <- start TO end [STEP step] ... ENDFOR`
    ///
    /// The end bound is inclusive; step defaults to 1.
    For {
        var: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// `WHILE cond DO ... ENDWHILE` (pre-test)
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    /// `REPEAT ... UNTIL cond` (post-test; the body runs at least once)
    Repeat {
        body: Vec<Stmt>,
        until: Expr,
    },
    /// `PROCEDURE name [(params)] ... ENDPROCEDURE`
    Procedure(ProcDecl),
    /// `CALL name [(args)]`
    Call {
        target: String,
        args: Vec<Expr>,
    },
}

/// A procedure declaration.
///
/// Parameters are always explicitly typed. Procedures are runtime values:
/// evaluating the declaration statement registers the procedure under its
/// name in the current scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcDecl {
    pub name: String,
    pub params: Vec<TypeDef>,
    pub body: Vec<Stmt>,
}
