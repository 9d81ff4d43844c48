// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Slate language.
//!
//! Transforms a token stream into the program's statement list.

mod parser;

pub use parser::{ParseError, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use slate_ast::expr::{BinOp, ExprKind};
    use slate_ast::stmt::{Stmt, StmtKind};
    use slate_ast::ty::TypeTag;

    fn parse(src: &str) -> Result<Vec<Stmt>, ParseError> {
        let tokens = slate_lexer::Lexer::new(src).tokenize().expect("lex failed");
        Parser::new(tokens).parse()
    }

    fn parse_ok(src: &str) -> Vec<Stmt> {
        parse(src).expect("parse failed")
    }

    #[test]
    fn output_statement() {
        let stmts = parse_ok("OUTPUT \"hello\"");
        assert_eq!(stmts.len(), 1);
        match &stmts[0].kind {
            StmtKind::Output(expr) => assert_eq!(expr.kind, ExprKind::Str("hello".into())),
            other => panic!("expected Output, got {:?}", other),
        }
    }

    #[test]
    fn declare_resolves_type_at_parse_time() {
        let stmts = parse_ok("DECLARE age: INTEGER");
        match &stmts[0].kind {
            StmtKind::Declare(td) => {
                assert_eq!(td.name, "age");
                assert_eq!(td.tag, TypeTag::Integer);
            }
            other => panic!("expected Declare, got {:?}", other),
        }
    }

    #[test]
    fn declare_unknown_type_fails_at_parse_time() {
        let err = parse("DECLARE age: NUMBER").unwrap_err();
        assert!(matches!(err, ParseError::UnknownType { ref name, .. } if name == "NUMBER"));
        assert_eq!(err.kind(), "UnknownType");
        assert_eq!(err.to_string(), "Type 'NUMBER' is invalid");
    }

    #[test]
    fn assignment_both_spellings() {
        for src in ["x <- 5", "x = 5"] {
            let stmts = parse_ok(src);
            match &stmts[0].kind {
                StmtKind::Assign { name, constant, .. } => {
                    assert_eq!(name, "x");
                    assert!(!constant);
                }
                other => panic!("expected Assign, got {:?}", other),
            }
        }
    }

    #[test]
    fn constant_assignment() {
        let stmts = parse_ok("CONSTANT pi = 3.14");
        match &stmts[0].kind {
            StmtKind::Assign { name, constant, .. } => {
                assert_eq!(name, "pi");
                assert!(constant);
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let stmts = parse_ok("x <- 1 + 2 * 3");
        let StmtKind::Assign { value, .. } = &stmts[0].kind else { panic!() };
        let ExprKind::Binary { op, right, .. } = &value.kind else { panic!() };
        assert_eq!(*op, BinOp::Add);
        let ExprKind::Binary { op: inner, .. } = &right.kind else { panic!() };
        assert_eq!(*inner, BinOp::Mul);
    }

    #[test]
    fn comparison_binds_loosest() {
        let stmts = parse_ok("x <- 1 + 2 > 2 * 1");
        let StmtKind::Assign { value, .. } = &stmts[0].kind else { panic!() };
        let ExprKind::Binary { op, .. } = &value.kind else { panic!() };
        assert_eq!(*op, BinOp::Gt);
    }

    #[test]
    fn additive_is_left_associative() {
        // 1 - 2 + 3 parses as (1 - 2) + 3
        let stmts = parse_ok("x <- 1 - 2 + 3");
        let StmtKind::Assign { value, .. } = &stmts[0].kind else { panic!() };
        let ExprKind::Binary { op, left, .. } = &value.kind else { panic!() };
        assert_eq!(*op, BinOp::Add);
        let ExprKind::Binary { op: inner, .. } = &left.kind else { panic!() };
        assert_eq!(*inner, BinOp::Sub);
    }

    #[test]
    fn parens_override_precedence() {
        let stmts = parse_ok("x <- (1 + 2) * 3");
        let StmtKind::Assign { value, .. } = &stmts[0].kind else { panic!() };
        let ExprKind::Binary { op, left, .. } = &value.kind else { panic!() };
        assert_eq!(*op, BinOp::Mul);
        let ExprKind::Binary { op: inner, .. } = &left.kind else { panic!() };
        assert_eq!(*inner, BinOp::Add);
    }

    #[test]
    fn if_else_blocks_are_flat() {
        let stmts = parse_ok("IF x > 0 THEN OUTPUT 1 OUTPUT 2 ELSE OUTPUT 3 ENDIF");
        let StmtKind::If { then_body, else_body, .. } = &stmts[0].kind else { panic!() };
        assert_eq!(then_body.len(), 2);
        assert_eq!(else_body.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn for_with_step() {
        let stmts = parse_ok("FOR i <- 10 TO 0 STEP 2 OUTPUT i ENDFOR");
        let StmtKind::For { var, step, body, .. } = &stmts[0].kind else { panic!() };
        assert_eq!(var, "i");
        assert!(step.is_some());
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn while_and_repeat() {
        let stmts = parse_ok("WHILE x < 3 DO x <- x + 1 ENDWHILE REPEAT x <- x - 1 UNTIL x = 0");
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0].kind, StmtKind::While { .. }));
        assert!(matches!(stmts[1].kind, StmtKind::Repeat { .. }));
    }

    #[test]
    fn procedure_with_typed_params() {
        let stmts = parse_ok("PROCEDURE greet(name: STRING, times: INTEGER) OUTPUT name ENDPROCEDURE");
        let StmtKind::Procedure(proc) = &stmts[0].kind else { panic!() };
        assert_eq!(proc.name, "greet");
        assert_eq!(proc.params.len(), 2);
        assert_eq!(proc.params[0].tag, TypeTag::String);
        assert_eq!(proc.params[1].tag, TypeTag::Integer);
        assert_eq!(proc.body.len(), 1);
    }

    #[test]
    fn procedure_param_unknown_type_fails() {
        let err = parse("PROCEDURE p(x: WORD) OUTPUT x ENDPROCEDURE").unwrap_err();
        assert!(matches!(err, ParseError::UnknownType { .. }));
    }

    #[test]
    fn call_with_and_without_args() {
        let stmts = parse_ok("CALL setup CALL greet(\"hi\", 2)");
        let StmtKind::Call { target, args } = &stmts[0].kind else { panic!() };
        assert_eq!(target, "setup");
        assert!(args.is_empty());
        let StmtKind::Call { target, args } = &stmts[1].kind else { panic!() };
        assert_eq!(target, "greet");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn input_with_prompt() {
        let stmts = parse_ok("INPUT \"Name: \", name INPUT age");
        assert!(matches!(
            &stmts[0].kind,
            StmtKind::Input { prompt: Some(p), name } if p == "Name: " && name == "name"
        ));
        assert!(matches!(
            &stmts[1].kind,
            StmtKind::Input { prompt: None, name } if name == "age"
        ));
    }

    #[test]
    fn unexpected_token_reports_lexeme_kind_and_position() {
        let err = parse("OUTPUT 1 THEN").unwrap_err();
        match err {
            ParseError::UnexpectedToken { ref lexeme, kind, span } => {
                assert_eq!(lexeme, "THEN");
                assert_eq!(kind, "THEN");
                assert_eq!(span.start, 9);
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
        assert_eq!(err.kind(), "SyntaxError");
        assert_eq!(err.to_string(), "Unexpected token THEN (THEN)");
    }

    #[test]
    fn unterminated_block_is_unexpected_end() {
        let err = parse("IF x > 0 THEN OUTPUT 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
        assert_eq!(err.to_string(), "Unexpected end of program");
    }

    #[test]
    fn empty_program_is_empty_block() {
        assert!(parse_ok("").is_empty());
    }
}
