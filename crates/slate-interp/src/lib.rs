// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the Slate language.
//!
//! Executes the AST directly without compilation. The [`Runner`] drives the
//! whole tokenize → parse → evaluate pipeline and surfaces errors in the
//! positioned console format.

mod env;
mod interp;
mod runner;
mod ty;
mod value;

pub use env::{Environment, Scope};
pub use interp::{Interpreter, RuntimeError};
pub use runner::{RunOptions, Runner, RunnerBusy};
pub use value::Value;
