// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Rendering scan results.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use jslex_automaton::{Diagnostic, DiagnosticKind, Scan};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use crate::error::{JslexError, Result};

/// Token output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One `text - Kind` line per token
    #[default]
    Plain,
    /// A JSON array of reports
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Plain => "plain",
            Format::Json => "json",
        })
    }
}

impl FromStr for Format {
    type Err = JslexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Format::Plain),
            "json" => Ok(Format::Json),
            other => Err(JslexError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// The scan of one named input.
#[derive(Debug, Serialize)]
pub struct Report {
    /// File path, or `<eval>` for inline code
    pub source: String,
    #[serde(flatten)]
    pub scan: Scan,
}

impl Report {
    pub fn new(source: impl Into<String>, scan: Scan) -> Self {
        Self {
            source: source.into(),
            scan,
        }
    }
}

/// Writes the tokens of every report to `out`.
///
/// Plain output prefixes each report with a `==> name <==` header when
/// there is more than one.
pub fn write_tokens<W: Write>(out: &mut W, reports: &[Report], format: Format) -> Result<()> {
    match format {
        Format::Plain => {
            let headers = reports.len() > 1;
            for (i, report) in reports.iter().enumerate() {
                if headers {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    writeln!(out, "==> {} <==", report.source)?;
                }
                for token in &report.scan.tokens {
                    writeln!(out, "{token}")?;
                }
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Formats one diagnostic as `source:line:column: message`.
pub fn format_diagnostic(source: &str, diagnostic: &Diagnostic, color: bool) -> String {
    let location = format!("{source}:{}:{}", diagnostic.line, diagnostic.column);
    if !color {
        return format!("{location}: {diagnostic}");
    }
    let message = diagnostic.to_string();
    let message = match diagnostic.kind {
        DiagnosticKind::UnrecognizedSequence => message.red().to_string(),
        DiagnosticKind::Unterminated => message.yellow().to_string(),
    };
    format!("{}: {message}", location.bold())
}

/// Prints every diagnostic to stderr. Returns how many were printed.
pub fn print_diagnostics(reports: &[Report], color: bool) -> usize {
    let mut count = 0;
    for report in reports {
        for diagnostic in &report.scan.diagnostics {
            eprintln!("{}", format_diagnostic(&report.source, diagnostic, color));
            count += 1;
        }
    }
    count
}
