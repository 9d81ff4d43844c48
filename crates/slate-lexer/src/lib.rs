// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tokenizer for Slate source code, built on logos.

mod lexer;

pub use lexer::{LexError, Lexer};
