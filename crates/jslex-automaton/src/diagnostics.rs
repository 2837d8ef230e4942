// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Non-fatal scan diagnostics.
//!
//! The lexer never aborts. Every unrecognized sequence is handed to a
//! [`DiagnosticSink`] and scanning resumes with the next character.

use std::fmt;

use crate::token::Span;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// No transition for the buffered text plus the offending character
    UnrecognizedSequence,
    /// Input ended inside a quoted literal or comment
    Unterminated,
}

/// A report describing unrecognized input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// The discarded text, offending character included
    pub text: String,
    /// The character without a transition; `None` at end of input
    pub offending: Option<char>,
    /// The discarded text in the source
    pub span: Span,
    /// 1-based line of the first discarded character
    pub line: u32,
    /// 1-based column of the first discarded character
    pub column: u32,
}

impl Diagnostic {
    /// Reports buffered text followed by a character without a transition.
    pub fn unrecognized(
        lexeme: &str,
        offending: char,
        span: Span,
        line: u32,
        column: u32,
    ) -> Self {
        let mut text = String::with_capacity(lexeme.len() + offending.len_utf8());
        text.push_str(lexeme);
        text.push(offending);
        Self {
            kind: DiagnosticKind::UnrecognizedSequence,
            text,
            offending: Some(offending),
            span,
            line,
            column,
        }
    }

    /// Reports buffered text left open when the input ended.
    pub fn unterminated(lexeme: &str, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind: DiagnosticKind::Unterminated,
            text: lexeme.to_string(),
            offending: None,
            span,
            line,
            column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::UnrecognizedSequence => {
                write!(f, "Unrecognized sequence: {}", self.text)
            }
            DiagnosticKind::Unterminated => {
                write!(f, "Unterminated sequence at end of input: {}", self.text)
            }
        }
    }
}

/// Receives diagnostics as the lexer produces them.
pub trait DiagnosticSink {
    /// Records one diagnostic. Must not fail.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Collects diagnostics and logs each one as a `tracing` warning.
#[derive(Debug, Default)]
pub struct TracingSink {
    diagnostics: Vec<Diagnostic>,
}

impl TracingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the sink, returning the collected diagnostics.
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            line = diagnostic.line,
            column = diagnostic.column,
            "{}",
            diagnostic
        );
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_display() {
        let diagnostic = Diagnostic::unrecognized("=", '=', Span::new(0, 2), 1, 1);
        assert_eq!(diagnostic.text, "==");
        assert_eq!(diagnostic.offending, Some('='));
        assert_eq!(diagnostic.to_string(), "Unrecognized sequence: ==");
    }

    #[test]
    fn test_unterminated_display() {
        let diagnostic = Diagnostic::unterminated("\"abc", Span::new(0, 4), 1, 1);
        assert_eq!(diagnostic.offending, None);
        assert_eq!(
            diagnostic.to_string(),
            "Unterminated sequence at end of input: \"abc"
        );
    }

    #[test]
    fn test_sinks_collect_in_order() {
        let mut vec_sink: Vec<Diagnostic> = Vec::new();
        let mut tracing_sink = TracingSink::new();
        for (i, text) in ["a#", "b@"].iter().enumerate() {
            let mut chars = text.chars();
            let lexeme = chars.next().unwrap().to_string();
            let offending = chars.next().unwrap();
            let diagnostic =
                Diagnostic::unrecognized(&lexeme, offending, Span::new(i * 2, i * 2 + 2), 1, 1);
            vec_sink.report(diagnostic.clone());
            tracing_sink.report(diagnostic);
        }
        assert_eq!(vec_sink.len(), 2);
        assert_eq!(tracing_sink.diagnostics(), vec_sink.as_slice());
        assert_eq!(tracing_sink.into_inner()[1].text, "b@");
    }
}
