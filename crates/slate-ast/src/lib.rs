// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the Slate language.
//!
//! This crate defines the spans, tokens, and AST nodes shared between the
//! lexer, parser, and interpreter.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;
pub mod ty;

pub use span::{LineMap, SourcePos, Span};
