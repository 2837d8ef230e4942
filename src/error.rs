// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the jslex CLI.

use std::path::PathBuf;

use jslex_automaton::{TableError, UnknownStrategy};
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, JslexError>;

/// Main error type for the CLI.
#[derive(Error, Debug)]
pub enum JslexError {
    /// Input file does not exist
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config file
    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be rendered
    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown table preset or malformed table
    #[error(transparent)]
    Table(#[from] TableError),

    /// Unknown strategy name
    #[error(transparent)]
    Strategy(#[from] UnknownStrategy),

    /// Strategy compiled out of this build
    #[error("strategy '{0}' is not available in this build")]
    StrategyUnavailable(String),

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker pool could not be started
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Background task panicked or was cancelled
    #[error("scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Line editor error
    #[error("REPL error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
