//! The interpreter implementation.
//!
//! This is a tree-walk interpreter that directly evaluates the AST.
//! Parsing and evaluation are fully separate phases: every binding —
//! declarations, assignments, procedure registrations — executes when its
//! node is walked, and re-executes on every walk, so assignments inside
//! loop and procedure bodies re-bind on each pass.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::rc::Rc;

use slate_ast::expr::{BinOp, Expr, ExprKind};
use slate_ast::stmt::{ProcDecl, Stmt, StmtKind};
use slate_ast::ty::TypeTag;
use slate_ast::Span;

use crate::env::Environment;
use crate::ty;
use crate::value::Value;

/// The tree-walk interpreter.
///
/// Generic over its input source and output sink so tests can drive INPUT
/// and capture OUTPUT; the default construction wires up stdio.
pub struct Interpreter<R, W> {
    env: Environment,
    input: R,
    output: W,
}

impl Interpreter<BufReader<Stdin>, Stdout> {
    /// Create a new interpreter reading from stdin and writing to stdout.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl Default for Interpreter<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Create an interpreter over explicit input/output handles.
    pub fn with_io(input: R, output: W) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
        }
    }

    /// The environment, for inspecting bindings after a run.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run a program: execute its statements in order.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        self.exec_block(stmts)
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Execute a single statement.
    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Output(expr) => {
                let value = self.eval_expr(expr)?;
                writeln!(self.output, "{}", value.render())?;
                Ok(())
            }

            // Registers the declared type; binds no value
            StmtKind::Declare(typedef) => {
                self.env.current_mut().add_type_def(&typedef.name, typedef.tag);
                Ok(())
            }

            StmtKind::Assign { name, value, constant } => {
                let value = self.eval_expr(value)?;
                self.env.current_mut().add_def(name, value, *constant, true, span)
            }

            StmtKind::Input { prompt, name } => self.exec_input(prompt.as_deref(), name, span),

            StmtKind::If { cond, then_body, else_body } => {
                if self.eval_expr(cond)?.truthy() {
                    self.exec_block(then_body)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body)
                } else {
                    Ok(())
                }
            }

            StmtKind::For { var, start, end, step, body } => {
                self.exec_for(var, start, end, step.as_ref(), body, span)
            }

            StmtKind::While { cond, body } => {
                while self.eval_expr(cond)?.truthy() {
                    self.exec_block(body)?;
                }
                Ok(())
            }

            // Post-test: the body runs at least once, looping until the
            // condition turns true
            StmtKind::Repeat { body, until } => {
                loop {
                    self.exec_block(body)?;
                    if self.eval_expr(until)?.truthy() {
                        return Ok(());
                    }
                }
            }

            // Procedures are values: bind the declaration under its name
            StmtKind::Procedure(decl) => {
                let proc = Value::Proc(Rc::new(decl.clone()));
                self.env.current_mut().add_def(&decl.name, proc, false, false, span)
            }

            StmtKind::Call { target, args } => self.exec_call(target, args, span),
        }
    }

    /// INPUT: prompt, read a line, cast to the identifier's declared type
    /// (STRING when undeclared). A failed cast silently re-prompts — the
    /// sole recovered error in the system.
    fn exec_input(&mut self, prompt: Option<&str>, name: &str, span: Span) -> Result<(), RuntimeError> {
        let tag = self.env.current().get_type_def(name).unwrap_or(TypeTag::String);
        loop {
            if let Some(prompt) = prompt {
                write!(self.output, "{}", prompt)?;
                self.output.flush()?;
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(RuntimeError::EndOfInput { span });
            }
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            if let Some(value) = ty::cast_input(&line, tag) {
                return self.env.current_mut().add_def(name, value, false, true, span);
            }
        }
    }

    /// FOR: bounds evaluate once, the end bound is inclusive (the range
    /// spans start to end+step), and the loop variable is written straight
    /// into the scope each iteration, bypassing assignment evaluation.
    fn exec_for(
        &mut self,
        var: &str,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &[Stmt],
        span: Span,
    ) -> Result<(), RuntimeError> {
        let start = self.eval_int_bound(start)?;
        let end = self.eval_int_bound(end)?;
        let step = match step {
            Some(expr) => self.eval_int_bound(expr)?,
            None => 1,
        };
        if step == 0 {
            return Err(RuntimeError::ZeroStep { span });
        }

        // Wide arithmetic so end+step cannot overflow the bound type
        let stop = i128::from(end) + i128::from(step);
        let mut i = i128::from(start);
        let keep_ident_after = self.env.current().is_defined(var);

        while if step > 0 { i < stop } else { i > stop } {
            self.env.current_mut().set_raw(var, Value::Int(i as i64));
            self.exec_block(body)?;
            i += i128::from(step);
        }

        if !keep_ident_after {
            self.env.current_mut().remove_def(var);
        }
        Ok(())
    }

    fn eval_int_bound(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Int(n) => Ok(n),
            other => Err(RuntimeError::TypeCheck {
                given: other.type_name(),
                expected: TypeTag::Integer,
                span: expr.span,
            }),
        }
    }

    /// CALL: resolve, arity-check, then bind arguments and run the body in
    /// a local scope copied from the global scope. The pop is unconditional
    /// on every exit path.
    fn exec_call(&mut self, target: &str, args: &[Expr], span: Span) -> Result<(), RuntimeError> {
        let proc = match self.env.get_def(target) {
            Some(Value::Proc(proc)) => Rc::clone(proc),
            Some(_) => {
                return Err(RuntimeError::NotCallable { name: target.to_string(), span });
            }
            None => {
                return Err(RuntimeError::IdentifierNotDefined { name: target.to_string(), span });
            }
        };

        if args.len() != proc.params.len() {
            return Err(RuntimeError::Params {
                name: proc.name.clone(),
                given: args.len(),
                required: proc.params.len(),
                span,
            });
        }

        self.env.push_local();
        let result = self.run_procedure(&proc, args);
        self.env.pop_local();
        result
    }

    fn run_procedure(&mut self, proc: &ProcDecl, args: &[Expr]) -> Result<(), RuntimeError> {
        for (param, arg) in proc.params.iter().zip(args) {
            let value = self.eval_expr(arg)?;
            ty::validate_param(&value, param.tag, &proc.name, &param.name, arg.span)?;
            let scope = self.env.current_mut();
            scope.add_type_def(&param.name, param.tag);
            scope.add_def(&param.name, value, false, false, arg.span)?;
        }
        self.exec_block(&proc.body)
    }

    /// Evaluate an expression and return its value.
    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(n) => Ok(Value::Float(*n)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),

            ExprKind::Ident(name) => {
                self.env.get_def(name).cloned().ok_or_else(|| RuntimeError::IdentifierNotDefined {
                    name: name.clone(),
                    span: expr.span,
                })
            }

            ExprKind::Binary { op, left, right } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                eval_binary(*op, lhs, rhs, expr.span)
            }
        }
    }
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
    if op.is_comparison() {
        return compare(op, &lhs, &rhs, span);
    }
    match op {
        BinOp::Add => add(lhs, rhs, span),
        BinOp::Sub | BinOp::Mul => arith(op, lhs, rhs, span),
        BinOp::Div => div(lhs, rhs, span),
        _ => unreachable!("comparison handled above"),
    }
}

/// Addition is polymorphic: if either operand is textual the result is the
/// concatenation of both operands' rendered text; numeric operands add
/// with float contagion.
fn add(lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
    if matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)) {
        return Ok(Value::Str(format!("{}{}", lhs.render(), rhs.render())));
    }
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(a + b)),
            _ => Err(unsupported(BinOp::Add, &lhs, &rhs, span)),
        },
    }
}

/// Subtraction and multiplication require numeric operands.
fn arith(op: BinOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(match op {
            BinOp::Sub => a - b,
            _ => a * b,
        })),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(match op {
                BinOp::Sub => a - b,
                _ => a * b,
            })),
            _ => Err(unsupported(op, &lhs, &rhs, span)),
        },
    }
}

/// Division always produces a float, even for two integer operands.
fn div(lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => {
            if b == 0.0 {
                Err(RuntimeError::DivisionByZero { span })
            } else {
                Ok(Value::Float(a / b))
            }
        }
        _ => Err(unsupported(BinOp::Div, &lhs, &rhs, span)),
    }
}

/// Comparisons: numeric pairs compare with contagion, strings and booleans
/// compare natively. Across mismatched types equality is false; ordering
/// is an error.
fn compare(op: BinOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value, RuntimeError> {
    use std::cmp::Ordering;

    let ord = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };

    match ord {
        Some(ord) => Ok(Value::Bool(match op {
            BinOp::Eq => ord == Ordering::Equal,
            BinOp::NotEq => ord != Ordering::Equal,
            BinOp::Gt => ord == Ordering::Greater,
            BinOp::GtEq => ord != Ordering::Less,
            BinOp::Lt => ord == Ordering::Less,
            BinOp::LtEq => ord != Ordering::Greater,
            _ => unreachable!("not a comparison"),
        })),
        None => match op {
            BinOp::Eq => Ok(Value::Bool(false)),
            BinOp::NotEq => Ok(Value::Bool(true)),
            _ => Err(unsupported(op, lhs, rhs, span)),
        },
    }
}

fn unsupported(op: BinOp, lhs: &Value, rhs: &Value, span: Span) -> RuntimeError {
    RuntimeError::UnsupportedOperand {
        op: op.symbol(),
        left: lhs.type_name(),
        right: rhs.type_name(),
        span,
    }
}

/// A runtime error. Every variant aborts the current run; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Identifier '{name}' is not defined.")]
    IdentifierNotDefined { name: String, span: Span },

    #[error("Identifier '{name}' has already been defined as constant")]
    IdentifierAlreadyDefined { name: String, span: Span },

    #[error("Expected type {expected}; received {given} instead")]
    TypeCheck {
        given: &'static str,
        expected: TypeTag,
        span: Span,
    },

    #[error("In parameter {parameter} in {procedure}, expected type {expected}; received {given} instead")]
    ParamTypeCheck {
        given: &'static str,
        expected: TypeTag,
        procedure: String,
        parameter: String,
        span: Span,
    },

    #[error("Procedure {name} takes {required} parameters; {given} given.")]
    Params {
        name: String,
        given: usize,
        required: usize,
        span: Span,
    },

    #[error("Division by zero")]
    DivisionByZero { span: Span },

    #[error("Unsupported operand types for '{op}': {left} and {right}")]
    UnsupportedOperand {
        op: &'static str,
        left: &'static str,
        right: &'static str,
        span: Span,
    },

    #[error("'{name}' is not a procedure")]
    NotCallable { name: String, span: Span },

    #[error("FOR loop step must not be zero")]
    ZeroStep { span: Span },

    #[error("Unexpected end of input stream")]
    EndOfInput { span: Span },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// The error-kind name used in console reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::IdentifierNotDefined { .. } => "IdentifierNotDefined",
            RuntimeError::IdentifierAlreadyDefined { .. } => "IdentifierAlreadyDefined",
            RuntimeError::TypeCheck { .. } | RuntimeError::ParamTypeCheck { .. } => "TypeCheckError",
            RuntimeError::Params { .. } => "ParamsError",
            RuntimeError::DivisionByZero { .. } => "ArithmeticError",
            RuntimeError::UnsupportedOperand { .. } | RuntimeError::NotCallable { .. } => "TypeError",
            RuntimeError::ZeroStep { .. } => "ValueError",
            RuntimeError::EndOfInput { .. } => "EOFError",
            RuntimeError::Io(_) => "OSError",
        }
    }

    /// The source position of the error, when one is available.
    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::IdentifierNotDefined { span, .. }
            | RuntimeError::IdentifierAlreadyDefined { span, .. }
            | RuntimeError::TypeCheck { span, .. }
            | RuntimeError::ParamTypeCheck { span, .. }
            | RuntimeError::Params { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::UnsupportedOperand { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::ZeroStep { span }
            | RuntimeError::EndOfInput { span } => Some(*span),
            RuntimeError::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
        eval_binary(op, lhs, rhs, Span::new(0, 0))
    }

    #[test]
    fn add_concatenates_when_either_side_is_textual() {
        let v = eval(BinOp::Add, Value::Str("n = ".into()), Value::Int(3)).unwrap();
        assert!(matches!(v, Value::Str(s) if s == "n = 3"));
        let v = eval(BinOp::Add, Value::Bool(true), Value::Str("!".into())).unwrap();
        assert!(matches!(v, Value::Str(s) if s == "TRUE!"));
    }

    #[test]
    fn numeric_add_with_float_contagion() {
        assert!(matches!(eval(BinOp::Add, Value::Int(1), Value::Int(2)).unwrap(), Value::Int(3)));
        let v = eval(BinOp::Add, Value::Int(1), Value::Float(0.5)).unwrap();
        assert!(matches!(v, Value::Float(n) if n == 1.5));
    }

    #[test]
    fn division_always_floats() {
        let v = eval(BinOp::Div, Value::Int(7), Value::Int(2)).unwrap();
        assert!(matches!(v, Value::Float(n) if n == 3.5));
    }

    #[test]
    fn division_by_zero() {
        let err = eval(BinOp::Div, Value::Int(1), Value::Int(0)).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
        assert_eq!(err.kind(), "ArithmeticError");
        // Float zero divides the same way
        let err = eval(BinOp::Div, Value::Float(1.0), Value::Float(0.0)).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
    }

    #[test]
    fn subtraction_requires_numbers() {
        let err = eval(BinOp::Sub, Value::Str("a".into()), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "TypeError");
        assert_eq!(
            err.to_string(),
            "Unsupported operand types for '-': STRING and INTEGER"
        );
    }

    #[test]
    fn mixed_type_equality_is_false() {
        assert!(matches!(
            eval(BinOp::Eq, Value::Str("1".into()), Value::Int(1)).unwrap(),
            Value::Bool(false)
        ));
        assert!(matches!(
            eval(BinOp::NotEq, Value::Str("1".into()), Value::Int(1)).unwrap(),
            Value::Bool(true)
        ));
    }

    #[test]
    fn mixed_type_ordering_is_an_error() {
        let err = eval(BinOp::Lt, Value::Str("1".into()), Value::Int(2)).unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedOperand { .. }));
    }

    #[test]
    fn int_float_comparison_uses_contagion() {
        assert!(matches!(
            eval(BinOp::Eq, Value::Int(2), Value::Float(2.0)).unwrap(),
            Value::Bool(true)
        ));
        assert!(matches!(
            eval(BinOp::GtEq, Value::Float(2.5), Value::Int(2)).unwrap(),
            Value::Bool(true)
        ));
    }
}
