// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # jslex-automaton
//!
//! A table-driven finite-state tokenizer for JavaScript-like source text.
//!
//! ## Overview
//!
//! Source text flows one way through the crate:
//!
//! ```text
//! char -> Symbol::classify -> TransitionTable::lookup -> Lexer
//!      -> (Final) TokenKind::classify -> Token
//!      -> (no rule) DiagnosticSink
//! ```
//!
//! - [`symbol`] - character classes
//! - [`state`] - automaton states
//! - [`table`] - the transition table and its presets
//! - [`token`] - tokens and the terminal-state classifier
//! - [`lexer`] - the scanning engine
//! - [`diagnostics`] - non-fatal reports
//! - [`tokenizer`] - the strategy-agnostic [`Tokenizer`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use jslex_automaton::{Automaton, TokenKind, Tokenizer};
//!
//! let scan = Automaton::default().tokenize("var x = 10");
//! assert_eq!(scan.tokens[0].kind, TokenKind::Keyword);
//! assert_eq!(scan.tokens[3].text, "10");
//! assert!(scan.is_clean());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod lexer;
pub mod state;
pub mod symbol;
pub mod table;
pub mod token;
pub mod tokenizer;

#[cfg(feature = "regex")]
pub mod pattern;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use lexer::{Lexer, Scan, scan};
pub use state::State;
pub use symbol::Symbol;
pub use table::{Preset, TableBuilder, TableError, TransitionTable};
pub use token::{KEYWORDS, Span, Token, TokenKind, is_keyword};
pub use tokenizer::{Automaton, Strategy, Tokenizer, UnknownStrategy, tokenize_many};

#[cfg(feature = "regex")]
pub use pattern::RegexTokenizer;
