// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! jslex - a finite-state-automaton tokenizer for JavaScript-like source.
//!
//! This is the main entry point for the jslex CLI/REPL.
//!
//! ## Features
//!
//! - Interactive REPL with token highlighting and history
//! - Async file loading with tokio
//! - Parallel scanning of many files

mod cli;
mod config;
mod error;
mod output;
mod repl;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use futures::future::join_all;
use jslex_automaton::tokenize_many;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;
use error::{JslexError, Result};
use output::Report;

/// Name reported for `--eval` input.
const EVAL_SOURCE: &str = "<eval>";

/// Main entry point - uses tokio runtime for async operations.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load()?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.print_table {
        let table = config.table.table();
        println!("# {} ({} rules)", table.name(), table.len());
        for (from, symbol, to) in table.rules() {
            let (from, symbol) = (from.to_string(), format!("{symbol:?}"));
            println!("{from:<20} {symbol:<16} -> {to}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    if cli.is_interactive() {
        let mut repl = repl::Repl::new(config)?;
        repl.run()?;
        return Ok(ExitCode::SUCCESS);
    }

    let (inputs, failed) = match cli.eval {
        Some(code) => (vec![(EVAL_SOURCE.to_string(), code)], 0),
        None => read_inputs(&cli.files, config.color).await,
    };

    let reports = scan_inputs(&config, inputs).await?;

    match &cli.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            output::write_tokens(&mut out, &reports, config.format)?;
        }
        None => {
            let mut out = io::stdout().lock();
            output::write_tokens(&mut out, &reports, config.format)?;
        }
    }

    let diagnostics = output::print_diagnostics(&reports, config.color);
    tracing::debug!(
        inputs = reports.len(),
        failed,
        diagnostics,
        "tokenizing finished"
    );

    if failed > 0 || (config.deny_diagnostics && diagnostics > 0) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Reads every file concurrently. Files that cannot be read are reported
/// and counted, the rest are returned in argument order.
async fn read_inputs(paths: &[PathBuf], color: bool) -> (Vec<(String, String)>, usize) {
    let reads = paths.iter().map(|path| async move {
        let source = tokio::fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                JslexError::InputNotFound(path.clone())
            } else {
                JslexError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        Ok::<_, JslexError>((path.display().to_string(), source))
    });

    let mut inputs = Vec::with_capacity(paths.len());
    let mut failed = 0;
    for result in join_all(reads).await {
        match result {
            Ok(input) => inputs.push(input),
            Err(e) => {
                failed += 1;
                if color {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                } else {
                    eprintln!("Error: {e}");
                }
            }
        }
    }
    (inputs, failed)
}

/// Tokenizes every input on a blocking worker, in parallel across inputs.
async fn scan_inputs(config: &Config, inputs: Vec<(String, String)>) -> Result<Vec<Report>> {
    let tokenizer = config.tokenizer()?;
    let mut pool = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("jslex-scan-{i}"));
    if let Some(jobs) = config.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build()?;

    let reports = tokio::task::spawn_blocking(move || {
        let (names, sources): (Vec<String>, Vec<String>) = inputs.into_iter().unzip();
        let scans = pool.install(|| tokenize_many(tokenizer.as_ref(), &sources));
        names
            .into_iter()
            .zip(scans)
            .map(|(name, scan)| Report::new(name, scan))
            .collect::<Vec<_>>()
    })
    .await?;

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jslex_automaton::{Preset, Strategy, TokenKind};

    #[tokio::test]
    async fn test_read_inputs_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.js");
        std::fs::write(&present, "var a = 1").unwrap();
        let missing = dir.path().join("missing.js");

        let (inputs, failed) = read_inputs(&[present.clone(), missing], false).await;
        assert_eq!(failed, 1);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, present.display().to_string());
        assert_eq!(inputs[0].1, "var a = 1");
    }

    #[tokio::test]
    async fn test_scan_inputs_keeps_order() {
        let config = Config {
            table: Preset::Extended,
            jobs: Some(2),
            ..Config::default()
        };
        let inputs = (0..8)
            .map(|i| (format!("f{i}.js"), format!("x{i} == {i}")))
            .collect();

        let reports = scan_inputs(&config, inputs).await.unwrap();
        assert_eq!(reports.len(), 8);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.source, format!("f{i}.js"));
            assert_eq!(report.scan.tokens[0].text, format!("x{i}"));
            assert_eq!(report.scan.tokens[1].text, "==");
        }
    }

    #[tokio::test]
    async fn test_scan_inputs_with_regex() {
        let config = Config {
            strategy: Strategy::Regex,
            ..Config::default()
        };
        let inputs = vec![(EVAL_SOURCE.to_string(), "f(x);".to_string())];
        let reports = scan_inputs(&config, inputs).await.unwrap();
        assert_eq!(
            reports[0].scan.kinds(),
            vec![
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
            ]
        );
    }
}
