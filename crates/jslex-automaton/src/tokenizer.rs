// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The common tokenizer capability.
//!
//! Callers that only need "text in, tokens out" depend on [`Tokenizer`] and
//! stay agnostic to the scanning strategy: the table-driven [`Automaton`]
//! or, with the `regex` feature, the pattern-based `RegexTokenizer`.

use std::fmt;
use std::str::FromStr;

use crate::lexer::{Lexer, Scan};
use crate::table::{Preset, TransitionTable};

/// Produces a token sequence from source text.
pub trait Tokenizer: Send + Sync {
    /// Short strategy name.
    fn name(&self) -> &'static str;

    /// Scans `source` completely. Never fails; problems become diagnostics.
    fn tokenize(&self, source: &str) -> Scan;
}

/// The finite-state-automaton tokenizer. Owns its table; one instance can
/// serve any number of concurrent scans.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    table: TransitionTable,
}

impl Automaton {
    /// Creates a tokenizer around `table`.
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    /// Creates a tokenizer for a built-in table.
    pub fn with_preset(preset: Preset) -> Self {
        Self::new(preset.table())
    }

    /// The table in use.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Starts an incremental scan.
    pub fn lexer(&self) -> Lexer<'_> {
        Lexer::new(&self.table)
    }
}

impl Tokenizer for Automaton {
    fn name(&self) -> &'static str {
        "automaton"
    }

    fn tokenize(&self, source: &str) -> Scan {
        Lexer::scan(&self.table, source)
    }
}

/// The available scanning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// [`Automaton`]
    #[default]
    Automaton,
    /// `RegexTokenizer`
    Regex,
}

impl Strategy {
    /// The lowercase strategy name.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Automaton => "automaton",
            Strategy::Regex => "regex",
        }
    }

    /// Builds a tokenizer for this strategy. `preset` only applies to the automaton.
    ///
    /// Returns `None` for [`Strategy::Regex`] when the `regex` feature is disabled.
    pub fn build(self, preset: Preset) -> Option<Box<dyn Tokenizer>> {
        match self {
            Strategy::Automaton => Some(Box::new(Automaton::with_preset(preset))),
            #[cfg(feature = "regex")]
            Strategy::Regex => Some(Box::new(crate::pattern::RegexTokenizer::new())),
            #[cfg(not(feature = "regex"))]
            Strategy::Regex => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown strategy name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tokenizer strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automaton" | "fsa" | "table" => Ok(Strategy::Automaton),
            "regex" | "pattern" => Ok(Strategy::Regex),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Tokenizes several inputs, in parallel when the `parallel` feature is on.
/// Results are in input order.
pub fn tokenize_many<T, S>(tokenizer: &T, sources: &[S]) -> Vec<Scan>
where
    T: Tokenizer + ?Sized,
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "parallel")]
    use rayon::prelude::*;

    #[cfg(feature = "parallel")]
    let sources = sources.par_iter();
    #[cfg(not(feature = "parallel"))]
    let sources = sources.iter();

    sources
        .map(|source| tokenizer.tokenize(source.as_ref()))
        .collect()
}
