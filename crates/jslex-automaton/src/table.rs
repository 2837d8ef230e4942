// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The state-transition table.
//!
//! A [`TransitionTable`] maps `(State, Symbol)` to the next [`State`]. The
//! mapping is partial: a missing entry is an error transition, which the
//! lexer recovers from rather than treating as a fault.
//!
//! ## Presets
//!
//! | Preset | Contents |
//! |--------|----------|
//! | [`Preset::Minimal`] | Identifiers, numbers, single-character operators and punctuation, comment and quote openers. Quoted literals and comments must be empty. |
//! | [`Preset::Standard`] | Minimal plus the interior self-loops, so literals and comments may contain any character. |
//! | [`Preset::Extended`] | Standard plus longest-match compound operators (`==`, `>>>=`, `&&`, ...). |
//!
//! Tables are immutable once built and can be shared across threads.

use std::fmt;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::state::State;
use crate::symbol::Symbol;

/// Compound operators recognised by [`Preset::Extended`].
pub const COMPOUND_OPERATORS: &[&str] = &[
    "==", "===", "!=", "!==", "<=", ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "**", "**=", "<<", ">>", ">>>", "<<=", ">>=", ">>>=", "&&=", "||=",
    "??=", "=>", "?.",
];

/// Errors raised while building a transition table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Two rules for the same key disagree on the target state
    #[error("conflicting rules for ({state}, {symbol:?}): {existing} vs {requested}")]
    Conflict {
        /// Source state of both rules
        state: State,
        /// Symbol of both rules
        symbol: Symbol,
        /// Target of the rule added first
        existing: State,
        /// Target of the rule added later
        requested: State,
    },

    /// A rule leaves a terminal state
    #[error("terminal state {0} cannot have outgoing transitions")]
    TerminalSource(State),

    /// A rule re-enters the start state, which only happens through a reset
    #[error("({0}, {1:?}) cannot transition back to Start")]
    TransitionToStart(State, Symbol),

    /// A rule finishes a token from a state that cannot be classified
    #[error("({0}, {1:?}): {0} cannot finish a token")]
    NonFinishingSource(State, Symbol),

    /// A rule would finish a token before anything was buffered
    #[error("(Start, {0:?}) cannot finish an empty token")]
    EmptyToken(Symbol),

    /// A compound operator shorter than two characters
    #[error("compound operator {0:?} must have at least two characters")]
    ShortOperator(String),

    /// Unknown preset name
    #[error("unknown table preset: {0}")]
    UnknownPreset(String),
}

/// The built-in table configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    /// The literal table, without interior self-loops
    Minimal,
    /// The corrected table
    #[default]
    Standard,
    /// The corrected table plus compound operators
    Extended,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Preset; 3] = [Preset::Minimal, Preset::Standard, Preset::Extended];

    /// The lowercase preset name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Standard => "standard",
            Preset::Extended => "extended",
        }
    }

    /// Builds the table for this preset.
    pub fn table(self) -> TransitionTable {
        match self {
            Preset::Minimal => TransitionTable::minimal(),
            Preset::Standard => TransitionTable::standard(),
            Preset::Extended => TransitionTable::extended(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" | "min" => Ok(Preset::Minimal),
            "standard" | "std" => Ok(Preset::Standard),
            "extended" | "ext" => Ok(Preset::Extended),
            other => Err(TableError::UnknownPreset(other.to_string())),
        }
    }
}

/// An immutable `(State, Symbol) -> State` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    rules: FxHashMap<(State, Symbol), State>,
    /// Every prefix (two characters or longer) of every compound operator
    operator_prefixes: FxHashSet<String>,
    name: &'static str,
}

impl TransitionTable {
    /// Starts an empty table.
    pub fn builder(name: &'static str) -> TableBuilder {
        TableBuilder::new(name)
    }

    /// The literal table: every token closes on whitespace, quoted literals
    /// and comments must be empty.
    pub fn minimal() -> Self {
        minimal_rules(Self::builder(Preset::Minimal.name()))
            .build()
            .expect("minimal table is well-formed")
    }

    /// The minimal table plus interior self-loops for quoted literals and comments.
    pub fn standard() -> Self {
        interior_rules(minimal_rules(Self::builder(Preset::Standard.name())))
            .build()
            .expect("standard table is well-formed")
    }

    /// The standard table plus longest-match compound operators.
    pub fn extended() -> Self {
        interior_rules(minimal_rules(Self::builder(Preset::Extended.name())))
            .operators(COMPOUND_OPERATORS.iter().copied())
            .build()
            .expect("extended table is well-formed")
    }

    /// Looks up the next state. `None` denotes an error transition.
    #[inline]
    pub fn lookup(&self, state: State, symbol: Symbol) -> Option<State> {
        self.rules.get(&(state, symbol)).copied()
    }

    /// Like [`lookup`](Self::lookup), mapping a missing rule to [`State::Error`].
    #[inline]
    pub fn next(&self, state: State, symbol: Symbol) -> State {
        self.lookup(state, symbol).unwrap_or(State::Error)
    }

    /// Returns true if appending `ch` to the operator `lexeme` still spells
    /// (a prefix of) a compound operator.
    pub fn extends_operator(&self, lexeme: &str, ch: char) -> bool {
        if self.operator_prefixes.is_empty() {
            return false;
        }
        let mut candidate = String::with_capacity(lexeme.len() + ch.len_utf8());
        candidate.push_str(lexeme);
        candidate.push(ch);
        self.operator_prefixes.contains(&candidate)
    }

    /// Returns true if the table recognises compound operators.
    pub fn has_compound_operators(&self) -> bool {
        !self.operator_prefixes.is_empty()
    }

    /// The name the table was built with.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules, sorted by source state and symbol.
    pub fn rules(&self) -> Vec<(State, Symbol, State)> {
        let mut rules: Vec<_> = self
            .rules
            .iter()
            .map(|(&(from, symbol), &to)| (from, symbol, to))
            .collect();
        rules.sort();
        rules
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collects rules and validates them into a [`TransitionTable`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: &'static str,
    rules: Vec<(State, Symbol, State)>,
    operators: Vec<String>,
}

impl TableBuilder {
    /// Creates an empty builder.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
            operators: Vec::new(),
        }
    }

    /// Adds one rule.
    pub fn rule(mut self, from: State, symbol: Symbol, to: State) -> Self {
        self.rules.push((from, symbol, to));
        self
    }

    /// Adds the same rule for several symbols.
    pub fn rules(mut self, from: State, symbols: &[Symbol], to: State) -> Self {
        self.rules
            .extend(symbols.iter().map(|&symbol| (from, symbol, to)));
        self
    }

    /// Adds a rule for both whitespace symbols.
    pub fn on_whitespace(self, from: State, to: State) -> Self {
        self.rules(from, &[Symbol::Whitespace, Symbol::LineBreak], to)
    }

    /// Adds a rule for every symbol except the listed ones.
    pub fn otherwise(mut self, from: State, except: &[Symbol], to: State) -> Self {
        self.rules.extend(
            Symbol::ALL
                .iter()
                .filter(|symbol| !except.contains(symbol))
                .map(|&symbol| (from, symbol, to)),
        );
        self
    }

    /// Adds compound operators, recognised by longest-match extension.
    pub fn operators<I, T>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.operators.extend(operators.into_iter().map(Into::into));
        self
    }

    /// Validates the rules and freezes them.
    pub fn build(self) -> Result<TransitionTable, TableError> {
        let mut rules = FxHashMap::default();

        for (from, symbol, to) in self.rules {
            if from.is_terminal() {
                return Err(TableError::TerminalSource(from));
            }
            if to == State::Start {
                return Err(TableError::TransitionToStart(from, symbol));
            }
            if from == State::Start && to.is_terminal() {
                return Err(TableError::EmptyToken(symbol));
            }
            if to == State::Final && !from.can_finish() {
                return Err(TableError::NonFinishingSource(from, symbol));
            }
            if let Some(&existing) = rules.get(&(from, symbol)) {
                if existing != to {
                    return Err(TableError::Conflict {
                        state: from,
                        symbol,
                        existing,
                        requested: to,
                    });
                }
                continue;
            }
            rules.insert((from, symbol), to);
        }

        let mut operator_prefixes = FxHashSet::default();
        for op in self.operators {
            let boundaries: Vec<usize> = op
                .char_indices()
                .map(|(i, ch)| i + ch.len_utf8())
                .collect();
            if boundaries.len() < 2 {
                return Err(TableError::ShortOperator(op));
            }
            for &end in &boundaries[1..] {
                operator_prefixes.insert(op[..end].to_string());
            }
        }

        Ok(TransitionTable {
            rules,
            operator_prefixes,
            name: self.name,
        })
    }
}

fn minimal_rules(builder: TableBuilder) -> TableBuilder {
    use State::*;
    use Symbol::*;

    builder
        // Identifiers and keywords
        .rule(Start, Letter, InIdentifierOrKeyword)
        .rules(InIdentifierOrKeyword, &[Letter, Digit], InIdentifierOrKeyword)
        .on_whitespace(InIdentifierOrKeyword, Final)
        // Numbers
        .rule(Start, Digit, InNumber)
        .rule(InNumber, Digit, InNumber)
        .on_whitespace(InNumber, Final)
        // Quoted literals
        .rule(Start, DoubleQuote, InStringDouble)
        .rule(InStringDouble, DoubleQuote, Final)
        .rule(Start, SingleQuote, InStringSingle)
        .rule(InStringSingle, SingleQuote, Final)
        // Comments; a lone slash is division
        .rule(Start, Slash, InSlash)
        .on_whitespace(InSlash, Final)
        .rule(InSlash, Slash, InLineComment)
        .rule(InSlash, Star, InBlockCommentBody)
        .rule(InLineComment, LineBreak, Final)
        .rule(InBlockCommentBody, Star, InBlockCommentEnd)
        .rule(InBlockCommentEnd, Slash, Final)
        // Single-character operators and punctuation
        .rules(Start, &[OperatorChar, Star], InOperator)
        .on_whitespace(InOperator, Final)
        .rule(Start, PunctuationChar, InPunctuation)
        .on_whitespace(InPunctuation, Final)
}

fn interior_rules(builder: TableBuilder) -> TableBuilder {
    use State::*;
    use Symbol::*;

    builder
        .otherwise(InStringDouble, &[DoubleQuote], InStringDouble)
        .otherwise(InStringSingle, &[SingleQuote], InStringSingle)
        .otherwise(InLineComment, &[LineBreak], InLineComment)
        .otherwise(InBlockCommentBody, &[Star], InBlockCommentBody)
        // A run of stars may still be followed by the closing slash.
        .rule(InBlockCommentEnd, Star, InBlockCommentEnd)
        .otherwise(InBlockCommentEnd, &[Slash, Star], InBlockCommentBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_build() {
        for preset in Preset::ALL {
            let table = preset.table();
            assert_eq!(table.name(), preset.name());
            assert!(!table.is_empty());
        }
    }

    #[test]
    fn test_identifier_family() {
        let table = TransitionTable::minimal();
        assert_eq!(
            table.lookup(State::Start, Symbol::Letter),
            Some(State::InIdentifierOrKeyword)
        );
        assert_eq!(
            table.lookup(State::InIdentifierOrKeyword, Symbol::Digit),
            Some(State::InIdentifierOrKeyword)
        );
        assert_eq!(
            table.lookup(State::InIdentifierOrKeyword, Symbol::Whitespace),
            Some(State::Final)
        );
        assert_eq!(table.lookup(State::Start, Symbol::Other), None);
        assert_eq!(table.next(State::Start, Symbol::Other), State::Error);
    }

    #[test]
    fn test_minimal_has_no_interior_loops() {
        let table = TransitionTable::minimal();
        assert_eq!(table.lookup(State::InStringDouble, Symbol::Letter), None);
        assert_eq!(table.lookup(State::InLineComment, Symbol::Letter), None);
        assert_eq!(table.lookup(State::InBlockCommentBody, Symbol::Letter), None);
        assert_eq!(
            table.lookup(State::InStringDouble, Symbol::DoubleQuote),
            Some(State::Final)
        );
    }

    #[test]
    fn test_standard_interior_loops() {
        let table = TransitionTable::standard();
        for symbol in Symbol::ALL {
            if symbol != Symbol::DoubleQuote {
                assert_eq!(
                    table.lookup(State::InStringDouble, symbol),
                    Some(State::InStringDouble)
                );
            }
            if symbol != Symbol::LineBreak {
                assert_eq!(
                    table.lookup(State::InLineComment, symbol),
                    Some(State::InLineComment)
                );
            }
        }
        assert_eq!(
            table.lookup(State::InLineComment, Symbol::LineBreak),
            Some(State::Final)
        );
        assert_eq!(
            table.lookup(State::InBlockCommentEnd, Symbol::Letter),
            Some(State::InBlockCommentBody)
        );
        assert_eq!(
            table.lookup(State::InBlockCommentEnd, Symbol::Star),
            Some(State::InBlockCommentEnd)
        );
        assert_eq!(
            table.lookup(State::InBlockCommentEnd, Symbol::Slash),
            Some(State::Final)
        );
    }

    #[test]
    fn test_single_character_operators() {
        let table = TransitionTable::standard();
        assert_eq!(table.lookup(State::InOperator, Symbol::OperatorChar), None);
        assert!(!table.has_compound_operators());
        assert!(!table.extends_operator("=", '='));
    }

    #[test]
    fn test_compound_operator_prefixes() {
        let table = TransitionTable::extended();
        assert!(table.extends_operator("=", '='));
        assert!(table.extends_operator("==", '='));
        assert!(!table.extends_operator("===", '='));
        assert!(table.extends_operator(">>", '>'));
        assert!(table.extends_operator(">>>", '='));
        assert!(table.extends_operator("?", '.'));
        assert!(!table.extends_operator("/", '/'));
        assert!(!table.extends_operator("+", '-'));
    }

    #[test]
    fn test_conflicting_rule_rejected() {
        let err = TableBuilder::new("conflict")
            .rule(State::Start, Symbol::Letter, State::InIdentifierOrKeyword)
            .rule(State::Start, Symbol::Letter, State::InNumber)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TableError::Conflict {
                state: State::Start,
                symbol: Symbol::Letter,
                existing: State::InIdentifierOrKeyword,
                requested: State::InNumber,
            }
        );
        assert!(err.to_string().contains("InIdentifierOrKeyword vs InNumber"));
    }

    #[test]
    fn test_duplicate_rule_accepted() {
        let table = TableBuilder::new("dup")
            .on_whitespace(State::InNumber, State::Final)
            .on_whitespace(State::InNumber, State::Final)
            .build()
            .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_malformed_rules_rejected() {
        let err = TableBuilder::new("bad")
            .rule(State::Final, Symbol::Letter, State::InNumber)
            .build()
            .unwrap_err();
        assert_eq!(err, TableError::TerminalSource(State::Final));

        let err = TableBuilder::new("bad")
            .rule(State::InNumber, Symbol::Letter, State::Start)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TableError::TransitionToStart(State::InNumber, Symbol::Letter)
        );

        let err = TableBuilder::new("bad")
            .rule(State::Start, Symbol::Whitespace, State::Final)
            .build()
            .unwrap_err();
        assert_eq!(err, TableError::EmptyToken(Symbol::Whitespace));

        let err = TableBuilder::new("bad")
            .operators(["="])
            .build()
            .unwrap_err();
        assert_eq!(err, TableError::ShortOperator("=".into()));
    }

    #[test]
    fn test_final_from_open_block_comment_rejected() {
        let err = TableBuilder::new("bad")
            .rule(State::Start, Symbol::Slash, State::InSlash)
            .rule(State::InSlash, Symbol::Star, State::InBlockCommentBody)
            .rule(State::InBlockCommentBody, Symbol::Slash, State::Final)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TableError::NonFinishingSource(State::InBlockCommentBody, Symbol::Slash)
        );
    }

    #[test]
    fn test_presets_only_finish_from_classifiable_states() {
        for preset in Preset::ALL {
            for (from, _, to) in preset.table().rules() {
                if to == State::Final {
                    assert!(from.can_finish(), "{preset}: {from}");
                }
            }
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("minimal".parse::<Preset>().unwrap(), Preset::Minimal);
        assert_eq!("EXT".parse::<Preset>().unwrap(), Preset::Extended);
        assert!(matches!(
            "huge".parse::<Preset>(),
            Err(TableError::UnknownPreset(_))
        ));
        assert_eq!(Preset::default(), Preset::Standard);
    }

    #[test]
    fn test_rules_are_sorted() {
        let rules = TransitionTable::minimal().rules();
        assert!(rules.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(rules.len(), TransitionTable::minimal().len());
    }
}
