// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token definitions and the terminal-state classifier.

use std::fmt;

use crate::state::State;

/// The reserved words.
pub const KEYWORDS: &[&str] = &["function", "var", "return", "if", "else", "while", "for"];

/// Returns true if `text` is a reserved word.
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// A span in the source code, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The kind of a finished token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// A member of [`KEYWORDS`]
    Keyword,
    /// Any other identifier
    Identifier,
    /// Decimal digits
    NumericLiteral,
    /// A quoted literal
    StringLiteral,
    /// `// ...`
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// An operator
    Operator,
    /// Punctuation
    Punctuation,
}

impl TokenKind {
    /// Human-readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "Keyword",
            TokenKind::Identifier => "Identifier",
            TokenKind::NumericLiteral => "Numeric Literal",
            TokenKind::StringLiteral => "String Literal",
            TokenKind::LineComment => "Line Comment",
            TokenKind::BlockComment => "Block Comment",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuation => "Punctuation",
        }
    }

    /// Returns true for both comment kinds.
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Maps the state the automaton was in when it reached `Final`, plus the
    /// accumulated lexeme, to a token kind.
    ///
    /// # Panics
    ///
    /// Panics for states that cannot precede `Final`; the tables never
    /// produce them.
    pub fn classify(state: State, lexeme: &str) -> Self {
        match state {
            State::InIdentifierOrKeyword if is_keyword(lexeme) => TokenKind::Keyword,
            State::InIdentifierOrKeyword => TokenKind::Identifier,
            State::InNumber => TokenKind::NumericLiteral,
            State::InStringDouble | State::InStringSingle => TokenKind::StringLiteral,
            State::InLineComment => TokenKind::LineComment,
            State::InBlockCommentEnd => TokenKind::BlockComment,
            State::InOperator | State::InSlash => TokenKind::Operator,
            State::InPunctuation => TokenKind::Punctuation,
            State::Start
            | State::Final
            | State::Error
            | State::InBlockCommentBody => {
                unreachable!("{state} cannot finish a token (lexeme {lexeme:?})")
            }
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A finished token. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The literal text, without quote or comment delimiters
    pub text: String,
    /// The span in the source code, delimiters included
    pub span: Span,
    /// 1-based line of the first character
    pub line: u32,
    /// 1-based column of the first character
    pub column: u32,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
            column,
        }
    }

    /// Builds a token from the state before `Final` and the raw lexeme.
    ///
    /// The raw lexeme still carries the opening delimiters of quoted
    /// literals and comments, and the first `*` of a block comment's `*/`.
    pub fn from_lexeme(state: State, lexeme: &str, span: Span, line: u32, column: u32) -> Self {
        let kind = TokenKind::classify(state, lexeme);
        let text = match kind {
            TokenKind::StringLiteral => strip(lexeme, 1, 0),
            TokenKind::LineComment => strip(lexeme, 2, 0),
            TokenKind::BlockComment => strip(lexeme, 2, 1),
            _ => lexeme,
        };
        Self::new(kind, text, span, line, column)
    }

    /// Renders the token so that scanning the result yields the same kind.
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::StringLiteral if self.text.contains('"') => format!("'{}'", self.text),
            TokenKind::StringLiteral => format!("\"{}\"", self.text),
            TokenKind::LineComment => format!("//{}", self.text),
            TokenKind::BlockComment => format!("/*{}*/", self.text),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.text, self.kind)
    }
}

fn strip(lexeme: &str, prefix: usize, suffix: usize) -> &str {
    lexeme
        .get(prefix..lexeme.len().saturating_sub(suffix))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        for kw in KEYWORDS {
            assert_eq!(
                TokenKind::classify(State::InIdentifierOrKeyword, kw),
                TokenKind::Keyword
            );
        }
        assert_eq!(
            TokenKind::classify(State::InIdentifierOrKeyword, "variable"),
            TokenKind::Identifier
        );
        assert!(!is_keyword("Var"));
    }

    #[test]
    fn test_keyword_only_in_identifier_family() {
        // A keyword-looking lexeme in another family keeps that family's kind.
        assert_eq!(
            TokenKind::classify(State::InStringDouble, "var"),
            TokenKind::StringLiteral
        );
    }

    #[test]
    fn test_terminal_families() {
        assert_eq!(TokenKind::classify(State::InNumber, "10"), TokenKind::NumericLiteral);
        assert_eq!(TokenKind::classify(State::InOperator, "="), TokenKind::Operator);
        assert_eq!(TokenKind::classify(State::InSlash, "/"), TokenKind::Operator);
        assert_eq!(TokenKind::classify(State::InPunctuation, ";"), TokenKind::Punctuation);
        assert_eq!(TokenKind::classify(State::InLineComment, "// x"), TokenKind::LineComment);
        assert_eq!(
            TokenKind::classify(State::InBlockCommentEnd, "/* x *"),
            TokenKind::BlockComment
        );
    }

    #[test]
    #[should_panic]
    fn test_unreachable_terminal_state() {
        TokenKind::classify(State::InBlockCommentBody, "/* x");
    }

    #[test]
    fn test_delimiters_stripped() {
        let span = Span::new(0, 4);
        let token = Token::from_lexeme(State::InStringDouble, "\"hi", span, 1, 1);
        assert_eq!(token.text, "hi");

        let token = Token::from_lexeme(State::InLineComment, "// 2", span, 1, 1);
        assert_eq!(token.text, " 2");

        let token = Token::from_lexeme(State::InBlockCommentEnd, "/* a *", span, 1, 1);
        assert_eq!(token.text, " a ");

        let token = Token::from_lexeme(State::InBlockCommentEnd, "/**", span, 1, 1);
        assert_eq!(token.text, "");
    }

    #[test]
    fn test_source_text() {
        let span = Span::default();
        let token = Token::new(TokenKind::StringLiteral, "say \"hi\"", span, 1, 1);
        assert_eq!(token.source_text(), "'say \"hi\"'");

        let token = Token::new(TokenKind::BlockComment, " a ", span, 1, 1);
        assert_eq!(token.source_text(), "/* a */");

        let token = Token::new(TokenKind::Keyword, "var", span, 1, 1);
        assert_eq!(token.to_string(), "var - Keyword");
    }
}
