// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Symbol classification for single input characters.

use unicode_xid::UnicodeXID;

/// Characters that form operators, excluding `/` and `*`.
pub const OPERATOR_CHARS: &[char] = &[
    '+', '-', '=', '<', '>', '!', '&', '|', '%', '^', '~', '?', ':',
];

/// Characters that form single-character punctuation.
pub const PUNCTUATION_CHARS: &[char] = &['(', ')', '{', '}', '[', ']', ';', ',', '.'];

/// The coarse category of one input character, used to index transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    /// Identifier start: XID_Start, `_` or `$`
    Letter,
    /// ASCII decimal digit
    Digit,
    /// `"`
    DoubleQuote,
    /// `'`
    SingleQuote,
    /// `/`, both division and comment delimiter
    Slash,
    /// `*`, both multiplication and block comment delimiter
    Star,
    /// Blank space that does not end a line
    Whitespace,
    /// Line terminator: `\n`, `\r`, U+2028, U+2029
    LineBreak,
    /// Any other operator character
    OperatorChar,
    /// Any punctuation character
    PunctuationChar,
    /// Everything else
    Other,
}

impl Symbol {
    /// Every symbol, in declaration order.
    pub const ALL: [Symbol; 11] = [
        Symbol::Letter,
        Symbol::Digit,
        Symbol::DoubleQuote,
        Symbol::SingleQuote,
        Symbol::Slash,
        Symbol::Star,
        Symbol::Whitespace,
        Symbol::LineBreak,
        Symbol::OperatorChar,
        Symbol::PunctuationChar,
        Symbol::Other,
    ];

    /// Classifies a single character. Total: every character maps to exactly one symbol.
    pub fn classify(ch: char) -> Self {
        match ch {
            '"' => Symbol::DoubleQuote,
            '\'' => Symbol::SingleQuote,
            // Comment delimiters win over the generic operator set.
            '/' => Symbol::Slash,
            '*' => Symbol::Star,
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => Symbol::LineBreak,
            '0'..='9' => Symbol::Digit,
            '_' | '$' => Symbol::Letter,
            _ if ch.is_whitespace() => Symbol::Whitespace,
            _ if ch.is_xid_start() => Symbol::Letter,
            _ if OPERATOR_CHARS.contains(&ch) => Symbol::OperatorChar,
            _ if PUNCTUATION_CHARS.contains(&ch) => Symbol::PunctuationChar,
            _ => Symbol::Other,
        }
    }

    /// Returns true for both blank space and line breaks.
    pub fn is_whitespace(self) -> bool {
        matches!(self, Symbol::Whitespace | Symbol::LineBreak)
    }

    /// Returns true for symbols that can start or extend an operator.
    pub fn is_operator(self) -> bool {
        matches!(self, Symbol::OperatorChar | Symbol::Slash | Symbol::Star)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        for ch in ['a', 'Z', '_', '$', 'é', 'λ'] {
            assert_eq!(Symbol::classify(ch), Symbol::Letter, "{ch:?}");
        }
    }

    #[test]
    fn test_digits() {
        for ch in '0'..='9' {
            assert_eq!(Symbol::classify(ch), Symbol::Digit);
        }
        // Non-ASCII digits are not decimal digits for the automaton.
        assert_eq!(Symbol::classify('٣'), Symbol::Other);
    }

    #[test]
    fn test_delimiters_before_operators() {
        assert_eq!(Symbol::classify('/'), Symbol::Slash);
        assert_eq!(Symbol::classify('*'), Symbol::Star);
        assert_eq!(Symbol::classify('"'), Symbol::DoubleQuote);
        assert_eq!(Symbol::classify('\''), Symbol::SingleQuote);
    }

    #[test]
    fn test_whitespace_family() {
        assert_eq!(Symbol::classify(' '), Symbol::Whitespace);
        assert_eq!(Symbol::classify('\t'), Symbol::Whitespace);
        assert_eq!(Symbol::classify('\u{00A0}'), Symbol::Whitespace);
        assert_eq!(Symbol::classify('\n'), Symbol::LineBreak);
        assert_eq!(Symbol::classify('\r'), Symbol::LineBreak);
        assert!(Symbol::LineBreak.is_whitespace());
        assert!(!Symbol::Letter.is_whitespace());
    }

    #[test]
    fn test_operator_and_punctuation_sets() {
        for &ch in OPERATOR_CHARS {
            assert_eq!(Symbol::classify(ch), Symbol::OperatorChar, "{ch:?}");
        }
        for &ch in PUNCTUATION_CHARS {
            assert_eq!(Symbol::classify(ch), Symbol::PunctuationChar, "{ch:?}");
        }
    }

    #[test]
    fn test_other_is_catch_all() {
        for ch in ['#', '@', '`', '\\', '\0', '€'] {
            assert_eq!(Symbol::classify(ch), Symbol::Other, "{ch:?}");
        }
    }
}
