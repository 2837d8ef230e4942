// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for jslex.

use std::path::PathBuf;

use clap::Parser;
use jslex_automaton::{Preset, Strategy};

use crate::config::Config;
use crate::output::Format;

/// jslex - a finite-state-automaton tokenizer for JavaScript-like source
///
/// With no FILES and no --eval, starts an interactive session.
#[derive(Parser, Debug)]
#[command(name = "jslex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source files to tokenize
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Tokenize CODE instead of reading files
    #[arg(short, long, value_name = "CODE", conflicts_with = "files")]
    pub eval: Option<String>,

    /// Scanning strategy (automaton, regex)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Transition table preset (minimal, standard, extended)
    #[arg(short, long)]
    pub table: Option<Preset>,

    /// Token output format
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Write tokens to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads for scanning many files
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Exit with failure when any diagnostic is produced
    #[arg(long)]
    pub deny_diagnostics: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print the transition table of the selected preset and exit
    #[arg(long)]
    pub print_table: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Runs the interactive session when there is nothing else to scan.
    pub fn is_interactive(&self) -> bool {
        self.files.is_empty() && self.eval.is_none() && !self.print_config && !self.print_table
    }

    /// Applies command line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(table) = self.table {
            config.table = table;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = (jobs > 0).then_some(jobs);
        }
        if self.deny_diagnostics {
            config.deny_diagnostics = true;
        }
        if self.no_color {
            config.color = false;
        }
    }
}
