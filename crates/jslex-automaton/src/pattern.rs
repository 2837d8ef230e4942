// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Pattern-matching tokenizer.
//!
//! An ordered list of named regular expressions is tried at the current
//! position. The longest match wins; on a tie the earlier pattern wins, so
//! `var` is a keyword while `variable` is an identifier.
//!
//! | Pattern | Kind |
//! |---------|------|
//! | `whitespace` | skipped |
//! | `directive` | skipped (`#include`, `#define`, ...) |
//! | `keyword` | [`TokenKind::Keyword`] |
//! | `identifier` | [`TokenKind::Identifier`] |
//! | `number` | [`TokenKind::NumericLiteral`] (decimal, fractional, hex) |
//! | `string`, `char` | [`TokenKind::StringLiteral`] |
//! | `line-comment`, `block-comment` | [`TokenKind::LineComment`], [`TokenKind::BlockComment`] |
//! | `operator` | [`TokenKind::Operator`], compound operators included |
//! | `punctuation` | [`TokenKind::Punctuation`] |
//!
//! A character no pattern matches becomes a one-character diagnostic and
//! is skipped.

use ::regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::lexer::{Mark, Scan};
use crate::table::COMPOUND_OPERATORS;
use crate::token::{KEYWORDS, Span, Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// One named pattern.
#[derive(Debug, Clone)]
struct Pattern {
    name: &'static str,
    /// `None` for text that is matched but not emitted
    kind: Option<TokenKind>,
    regex: Regex,
}

/// The regular-expression tokenizer.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    patterns: Vec<Pattern>,
}

impl RegexTokenizer {
    /// Creates the tokenizer with the built-in patterns.
    pub fn new() -> Self {
        Self::with_patterns(default_patterns()).expect("built-in patterns are valid")
    }

    /// Creates a tokenizer from `(name, kind, regex)` triples, in priority
    /// order. Each regex is anchored at the current position.
    pub fn with_patterns<I, P>(patterns: I) -> Result<Self, ::regex::Error>
    where
        I: IntoIterator<Item = (&'static str, Option<TokenKind>, P)>,
        P: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|(name, kind, source)| {
                Regex::new(&format!(r"\A(?:{})", source.as_ref()))
                    .map(|regex| Pattern { name, kind, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The pattern names, in priority order.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }

    fn longest_match(&self, rest: &str) -> Option<(&Pattern, usize)> {
        let mut best: Option<(&Pattern, usize)> = None;
        for pattern in &self.patterns {
            let Some(found) = pattern.regex.find(rest) else {
                continue;
            };
            let len = found.end();
            if len == 0 {
                continue;
            }
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((pattern, len));
            }
        }
        best
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for RegexTokenizer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn tokenize(&self, source: &str) -> Scan {
        let mut scan = Scan::default();
        let mut cursor = Mark::ORIGIN;

        while let Some(rest) = source.get(cursor.offset..).filter(|rest| !rest.is_empty()) {
            let start = cursor;
            match self.longest_match(rest) {
                Some((pattern, len)) => {
                    let matched = &rest[..len];
                    cursor.advance_str(matched);
                    if let Some(kind) = pattern.kind {
                        tracing::trace!(pattern = pattern.name, text = matched, "match");
                        scan.tokens.push(Token::new(
                            kind,
                            literal_text(kind, matched),
                            Span::new(start.offset, cursor.offset),
                            start.line,
                            start.column,
                        ));
                    }
                }
                None => {
                    let Some(ch) = rest.chars().next() else {
                        break;
                    };
                    cursor.advance(ch);
                    scan.diagnostics.push(Diagnostic::unrecognized(
                        "",
                        ch,
                        Span::new(start.offset, cursor.offset),
                        start.line,
                        start.column,
                    ));
                }
            }
        }

        tracing::debug!(
            bytes = source.len(),
            tokens = scan.tokens.len(),
            diagnostics = scan.diagnostics.len(),
            "regex scan finished"
        );
        scan
    }
}

fn literal_text(kind: TokenKind, matched: &str) -> &str {
    let inner = |prefix: usize, suffix: usize| {
        matched
            .get(prefix..matched.len().saturating_sub(suffix))
            .unwrap_or_default()
    };
    match kind {
        TokenKind::StringLiteral => inner(1, 1),
        TokenKind::LineComment => inner(2, 0),
        TokenKind::BlockComment => inner(2, 2),
        _ => matched,
    }
}

fn default_patterns() -> Vec<(&'static str, Option<TokenKind>, String)> {
    let mut operators: Vec<&str> = COMPOUND_OPERATORS.to_vec();
    operators.sort_by_key(|op| std::cmp::Reverse(op.len()));
    let compound = operators
        .iter()
        .map(|op| ::regex::escape(op))
        .collect::<Vec<_>>()
        .join("|");

    vec![
        ("whitespace", None, r"\s+".to_string()),
        ("directive", None, r"#\w+".to_string()),
        (
            "keyword",
            Some(TokenKind::Keyword),
            format!(r"(?:{})\b", KEYWORDS.join("|")),
        ),
        (
            "identifier",
            Some(TokenKind::Identifier),
            r"[\p{XID_Start}_$][\p{XID_Continue}$]*".to_string(),
        ),
        (
            "number",
            Some(TokenKind::NumericLiteral),
            r"0[xX][0-9a-fA-F]+|[0-9]+(?:\.[0-9]+)?".to_string(),
        ),
        ("string", Some(TokenKind::StringLiteral), r#""[^"\n]*""#.to_string()),
        ("char", Some(TokenKind::StringLiteral), r"'[^'\n]*'".to_string()),
        (
            "line-comment",
            Some(TokenKind::LineComment),
            r"//[^\n\r\u{2028}\u{2029}]*".to_string(),
        ),
        (
            "block-comment",
            Some(TokenKind::BlockComment),
            r"(?s)/\*.*?\*/".to_string(),
        ),
        (
            "operator",
            Some(TokenKind::Operator),
            format!(r"{compound}|[-+*/%=<>!&|^~?:]"),
        ),
        (
            "punctuation",
            Some(TokenKind::Punctuation),
            r"[(){}\[\];,.]".to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(source: &str) -> Vec<(TokenKind, String)> {
        RegexTokenizer::new()
            .tokenize(source)
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_keyword_beats_identifier_on_tie() {
        assert_eq!(
            pairs("var variable"),
            vec![
                (TokenKind::Keyword, "var".to_string()),
                (TokenKind::Identifier, "variable".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_whitespace_needed() {
        let kinds: Vec<_> = pairs("f(x);").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
            ]
        );
    }

    #[test]
    fn test_longest_operator() {
        let ops: Vec<_> = pairs("a>>>=b===c=>d")
            .into_iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, t)| t)
            .collect();
        assert_eq!(ops, vec![">>>=", "===", "=>"]);
    }

    #[test]
    fn test_literals_and_comments() {
        assert_eq!(
            pairs("\"hi\" 'c' 0xb1 123.123 // done\n/* a\nb */"),
            vec![
                (TokenKind::StringLiteral, "hi".to_string()),
                (TokenKind::StringLiteral, "c".to_string()),
                (TokenKind::NumericLiteral, "0xb1".to_string()),
                (TokenKind::NumericLiteral, "123.123".to_string()),
                (TokenKind::LineComment, " done".to_string()),
                (TokenKind::BlockComment, " a\nb ".to_string()),
            ]
        );
    }

    #[test]
    fn test_unmatched_character_recovers() {
        let scan = RegexTokenizer::new().tokenize("a # b");
        assert_eq!(scan.tokens.len(), 2);
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].text, "#");
        assert_eq!(scan.diagnostics[0].span, Span::new(2, 3));
    }

    #[test]
    fn test_directive_is_skipped() {
        let scan = RegexTokenizer::new().tokenize("#include x");
        assert!(scan.is_clean());
        assert_eq!(scan.tokens.len(), 1);
        let token = &scan.tokens[0];
        assert_eq!((token.kind, token.text.as_str()), (TokenKind::Identifier, "x"));
        assert_eq!(token.span, Span::new(9, 10));
    }

    #[test]
    fn test_line_comment_stops_at_any_line_break() {
        for source in ["// a\r\nb", "// a\rb", "// a\u{2028}b"] {
            assert_eq!(
                pairs(source),
                vec![
                    (TokenKind::LineComment, " a".to_string()),
                    (TokenKind::Identifier, "b".to_string()),
                ],
                "{source:?}"
            );
        }
    }

    #[test]
    fn test_positions() {
        let scan = RegexTokenizer::new().tokenize("if\n  x");
        assert_eq!((scan.tokens[1].line, scan.tokens[1].column), (2, 3));
        assert_eq!(scan.tokens[1].span, Span::new(5, 6));
    }

    #[test]
    fn test_custom_patterns() {
        let tokenizer = RegexTokenizer::with_patterns([
            ("space", None, r"\s+"),
            ("word", Some(TokenKind::Identifier), r"\w+"),
        ])
        .unwrap();
        assert_eq!(tokenizer.pattern_names(), vec!["space", "word"]);
        assert_eq!(tokenizer.tokenize("a b").tokens.len(), 2);
        assert!(RegexTokenizer::with_patterns([("bad", None, "(")]).is_err());
    }
}
