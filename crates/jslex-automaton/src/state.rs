// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Automaton states.

/// One node of the tokenizer automaton.
///
/// Each in-progress state describes what kind of token prefix has been
/// consumed so far. [`State::Final`] and [`State::Error`] are terminal: the
/// engine never rests in them, it resets to [`State::Start`] immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Nothing buffered
    Start,
    /// The accumulated lexeme is complete
    Final,
    /// No legal transition
    Error,
    /// Letters and digits after an initial letter
    InIdentifierOrKeyword,
    /// Decimal digits
    InNumber,
    /// Operator characters
    InOperator,
    /// Single punctuation character
    InPunctuation,
    /// A lone `/`: division, or the start of a comment
    InSlash,
    /// Body of a `"` literal
    InStringDouble,
    /// Body of a `'` literal
    InStringSingle,
    /// Body of a `//` comment
    InLineComment,
    /// Body of a `/* */` comment
    InBlockCommentBody,
    /// A `*` inside a block comment, possibly closing it
    InBlockCommentEnd,
}

impl State {
    /// Every state, in declaration order.
    pub const ALL: [State; 13] = [
        State::Start,
        State::Final,
        State::Error,
        State::InIdentifierOrKeyword,
        State::InNumber,
        State::InOperator,
        State::InPunctuation,
        State::InSlash,
        State::InStringDouble,
        State::InStringSingle,
        State::InLineComment,
        State::InBlockCommentBody,
        State::InBlockCommentEnd,
    ];

    /// Returns true for [`State::Final`] and [`State::Error`].
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Final | State::Error)
    }

    /// Returns true for the states that hold a non-empty lexeme.
    pub fn is_accumulating(self) -> bool {
        !matches!(self, State::Start | State::Final | State::Error)
    }

    /// Returns true for the states a `Final` transition may leave from,
    /// i.e. the states [`TokenKind::classify`](crate::token::TokenKind::classify) accepts.
    pub fn can_finish(self) -> bool {
        self.is_accumulating() && self != State::InBlockCommentBody
    }

    /// Returns true for the states that can grow an operator lexeme.
    pub fn is_operator(self) -> bool {
        matches!(self, State::InOperator | State::InSlash)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
