//! Top-level runtime orchestration.
//!
//! The [`Runner`] drives tokenize → parse → evaluate for one program,
//! reports errors in the positioned console format, and serializes
//! concurrent runs behind a mutex.

use std::fs;
use std::sync::{Mutex, MutexGuard, TryLockError};

use slate_ast::{LineMap, Span};
use slate_lexer::Lexer;
use slate_parser::Parser;

use crate::interp::Interpreter;

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Whether the source argument is a file path rather than raw code.
    pub file: bool,
    /// Whether a run that finds the runner busy blocks until it is free
    /// (true) or fails immediately with [`RunnerBusy`] (false).
    pub wait: bool,
    /// Reserved extension point; plumbed through, alters no behavior yet.
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { file: false, wait: true, strict: false }
    }
}

/// Error returned when the runner is busy and the caller opted not to wait.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Runner is already acquired")]
pub struct RunnerBusy;

/// Executes Slate programs, one at a time.
///
/// The runner owns no program state between runs: every execution gets a
/// fresh environment, so two runs of the same source always produce
/// identical output.
#[derive(Debug, Default)]
pub struct Runner {
    lock: Mutex<()>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a program from raw source text or a file path (per
    /// `options.file`).
    ///
    /// Returns the exit status: 0 for a run that completed without an
    /// unhandled error, 1 otherwise. Errors are reported to stderr; the
    /// program's own output goes to stdout. `Err(RunnerBusy)` only when
    /// another run is in flight and `options.wait` is false.
    pub fn run(&self, source: &str, options: &RunOptions) -> Result<i32, RunnerBusy> {
        let _guard = self.acquire(options.wait)?;
        Ok(exec(source, options))
    }

    fn acquire(&self, wait: bool) -> Result<MutexGuard<'_, ()>, RunnerBusy> {
        if wait {
            Ok(self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
        } else {
            match self.lock.try_lock() {
                Ok(guard) => Ok(guard),
                Err(TryLockError::WouldBlock) => Err(RunnerBusy),
                Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            }
        }
    }
}

fn exec(source: &str, options: &RunOptions) -> i32 {
    let text;
    let source = if options.file {
        match fs::read_to_string(source) {
            Ok(contents) => {
                text = contents;
                text.as_str()
            }
            Err(_) => {
                eprintln!("error: file of that name does not exist");
                return 1;
            }
        }
    } else {
        source
    };

    let lines = LineMap::new(source);

    let tokens = match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            // Lexical failures report as a generic syntax error
            report(&lines, Some(err.span), "SyntaxError", &err.to_string());
            return 1;
        }
    };

    let stmts = match Parser::new(tokens).parse() {
        Ok(stmts) => stmts,
        Err(err) => {
            report(&lines, Some(err.span()), err.kind(), &err.to_string());
            return 1;
        }
    };

    match Interpreter::new().run(&stmts) {
        Ok(()) => 0,
        Err(err) => {
            report(&lines, err.span(), err.kind(), &err.to_string());
            1
        }
    }
}

/// Console error report: position line (when available) followed by
/// `kind: message`.
fn report(lines: &LineMap, span: Option<Span>, kind: &str, message: &str) {
    if let Some(span) = span {
        let pos = lines.pos(span.start);
        eprintln!("At line {}, column {}, index {}:", pos.line, pos.column, pos.offset);
    }
    eprintln!("{}: {}", kind, message);
}
