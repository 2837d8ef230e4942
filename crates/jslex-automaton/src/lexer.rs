// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The scanning engine.
//!
//! The lexer drives a [`TransitionTable`] one character at a time:
//!
//! ```text
//! char -> Symbol -> lookup(state, symbol)
//!   Final  -> emit Token(state, lexeme), reset
//!   none   -> report Diagnostic (if anything was buffered), reset
//!   next   -> append char to lexeme, state = next
//! ```
//!
//! The character that drives a `Final` transition is consumed but never
//! becomes part of the lexeme. End of input is fed as one synthetic line
//! break by [`Lexer::finish`], so a trailing token is never lost.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::state::State;
use crate::symbol::Symbol;
use crate::table::TransitionTable;
use crate::token::{Span, Token, TokenKind};

/// The output of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scan {
    /// Tokens in source order
    pub tokens: Vec<Token>,
    /// Diagnostics in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl Scan {
    /// Returns true if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The token kinds in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

/// A source position: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    pub(crate) offset: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    after_cr: bool,
}

impl Mark {
    pub(crate) const ORIGIN: Mark = Mark {
        offset: 0,
        line: 1,
        column: 1,
        after_cr: false,
    };

    /// Moves past `ch`. `\r\n` counts as one line break.
    pub(crate) fn advance(&mut self, ch: char) {
        self.offset += ch.len_utf8();
        match ch {
            '\n' if self.after_cr => {}
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        self.after_cr = ch == '\r';
    }

    /// Moves past every character of `text`.
    pub(crate) fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance(ch);
        }
    }
}

/// Scans one input. Create one per input and discard it after [`finish`](Lexer::finish).
pub struct Lexer<'t, S = Vec<Diagnostic>> {
    table: &'t TransitionTable,
    state: State,
    lexeme: String,
    /// Where the current lexeme began
    start: Mark,
    /// Where the next character begins
    cursor: Mark,
    tokens: Vec<Token>,
    sink: S,
}

impl<'t> Lexer<'t> {
    /// Creates a lexer that collects diagnostics into a `Vec`.
    pub fn new(table: &'t TransitionTable) -> Self {
        Self::with_sink(table, Vec::new())
    }

    /// Feeds the whole of `text` and flushes.
    ///
    /// Diagnostics are also logged as `tracing` warnings.
    pub fn scan(table: &'t TransitionTable, text: &str) -> Scan {
        let mut lexer = Lexer::with_sink(table, TracingSink::new());
        lexer.feed(text);
        let (tokens, sink) = lexer.finish();
        let diagnostics = sink.into_inner();
        tracing::debug!(
            table = table.name(),
            bytes = text.len(),
            tokens = tokens.len(),
            diagnostics = diagnostics.len(),
            "scan finished"
        );
        Scan {
            tokens,
            diagnostics,
        }
    }
}

impl<'t, S: DiagnosticSink> Lexer<'t, S> {
    /// Creates a lexer that reports into `sink`.
    pub fn with_sink(table: &'t TransitionTable, sink: S) -> Self {
        Self {
            table,
            state: State::Start,
            lexeme: String::new(),
            start: Mark::ORIGIN,
            cursor: Mark::ORIGIN,
            tokens: Vec::new(),
            sink,
        }
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The pending lexeme.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Tokens emitted so far. A pending lexeme is not included until
    /// whitespace or [`finish`](Self::finish) closes it.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Feeds every character of `text`.
    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            self.push(ch);
        }
    }

    /// Feeds one character.
    pub fn push(&mut self, ch: char) {
        let here = self.cursor;
        let symbol = Symbol::classify(ch);
        let end = here.offset + ch.len_utf8();

        if self.state.is_operator() && self.table.extends_operator(&self.lexeme, ch) {
            self.lexeme.push(ch);
            self.state = State::InOperator;
        } else {
            match self.table.lookup(self.state, symbol) {
                Some(State::Final) => {
                    // Whitespace closes a token without belonging to it.
                    let end = if symbol.is_whitespace() { here.offset } else { end };
                    self.emit(end);
                }
                Some(State::Error) | None => self.recover(ch, end),
                Some(next) => {
                    tracing::trace!(from = %self.state, to = %next, ?ch, "transition");
                    if self.lexeme.is_empty() {
                        self.start = here;
                    }
                    self.lexeme.push(ch);
                    self.state = next;
                }
            }
        }

        self.cursor.advance(ch);
    }

    /// Flushes the pending lexeme as if whitespace followed it, and returns
    /// the tokens with the sink.
    ///
    /// A line break is tried first so that line comments close; tables
    /// that only finish on blank space get a plain whitespace symbol.
    pub fn finish(mut self) -> (Vec<Token>, S) {
        if self.state != State::Start {
            let closes = [Symbol::LineBreak, Symbol::Whitespace]
                .into_iter()
                .any(|symbol| self.table.lookup(self.state, symbol) == Some(State::Final));
            if closes {
                self.emit(self.cursor.offset);
            } else {
                let diagnostic = Diagnostic::unterminated(
                    &self.lexeme,
                    Span::new(self.start.offset, self.cursor.offset),
                    self.start.line,
                    self.start.column,
                );
                self.sink.report(diagnostic);
                self.reset();
            }
        }
        (self.tokens, self.sink)
    }

    fn emit(&mut self, end: usize) {
        let token = Token::from_lexeme(
            self.state,
            &self.lexeme,
            Span::new(self.start.offset, end),
            self.start.line,
            self.start.column,
        );
        tracing::trace!(kind = %token.kind, text = %token.text, "token");
        self.tokens.push(token);
        self.reset();
    }

    fn recover(&mut self, ch: char, end: usize) {
        if self.lexeme.is_empty() {
            // Nothing buffered: the lone character is dropped without a report.
            tracing::trace!(?ch, "dropped");
            return;
        }
        let diagnostic = Diagnostic::unrecognized(
            &self.lexeme,
            ch,
            Span::new(self.start.offset, end),
            self.start.line,
            self.start.column,
        );
        self.sink.report(diagnostic);
        self.reset();
    }

    fn reset(&mut self) {
        self.lexeme.clear();
        self.state = State::Start;
    }
}

/// Scans `text` with `table`, collecting diagnostics.
pub fn scan(table: &TransitionTable, text: &str) -> Scan {
    Lexer::scan(table, text)
}
