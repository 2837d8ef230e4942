// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive tokenizer session.
//!
//! Every line typed is scanned on its own and its tokens are printed in the
//! `text - Kind` format. Dot commands switch the table or strategy live.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use jslex_automaton::{KEYWORDS, Preset, RegexTokenizer, Scan, Strategy, TokenKind, Tokenizer};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config as EditorConfig, Editor, Helper};

use crate::config::Config;
use crate::error::Result;
use crate::output;

const HISTORY_FILE: &str = ".jslex_history";
const MAX_HISTORY_SIZE: usize = 1000;
const REPL_SOURCE: &str = "<repl>";

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Table,
    Strategy,
    Config,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim().strip_prefix('.')?;

        let mut parts = input.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        let command = match cmd.as_str() {
            "help" | "h" | "?" => ReplCommand::Help,
            "exit" | "quit" | "q" => ReplCommand::Exit,
            "clear" | "cls" => ReplCommand::Clear,
            "version" | "v" => ReplCommand::Version,
            "load" | "l" => ReplCommand::Load,
            "table" | "t" => ReplCommand::Table,
            "strategy" | "s" => ReplCommand::Strategy,
            "config" => ReplCommand::Config,
            _ => return None,
        };
        Some((command, arg))
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Tokenize a file"),
            (".table [preset]", "Show or switch the transition table"),
            (".strategy [name]", "Show or switch the scanning strategy"),
            (".config [key]", "Show the effective configuration"),
        ]
    }
}

/// Completion, hints and highlighting for the line editor.
struct JslexHelper {
    words: Vec<String>,
    highlighter: RegexTokenizer,
}

impl JslexHelper {
    fn new() -> Self {
        let commands = ReplCommand::all_commands()
            .iter()
            .filter_map(|(usage, _)| usage.split_whitespace().next());
        let presets = Preset::ALL.iter().map(|p| p.name());
        let words = KEYWORDS
            .iter()
            .copied()
            .chain(commands)
            .chain(presets)
            .chain([Strategy::Automaton.name(), Strategy::Regex.name()])
            .map(String::from)
            .collect();

        Self {
            words,
            highlighter: RegexTokenizer::new(),
        }
    }

    fn current_word(line: &str) -> &str {
        let start = line
            .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '.')
            .map(|i| i + 1)
            .unwrap_or(0);
        &line[start..]
    }
}

impl Completer for JslexHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = Self::current_word(&line[..pos]);
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches = self
            .words
            .iter()
            .filter(|w| w.starts_with(word))
            .map(|w| Pair {
                display: w.clone(),
                replacement: w[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for JslexHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }
        self.suffix_for(line)
            .map(|suffix| suffix.dimmed().to_string())
    }
}

impl JslexHelper {
    /// The rest of the first known word that completes the word under the cursor.
    fn suffix_for<'w>(&'w self, line: &str) -> Option<&'w str> {
        let word = Self::current_word(line);
        if word.len() < 2 {
            return None;
        }

        self.words
            .iter()
            .find(|w| w.starts_with(word) && w.len() > word.len())
            .map(|w| &w[word.len()..])
    }
}

impl Highlighter for JslexHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with('.') {
            return Cow::Owned(line.magenta().to_string());
        }
        Cow::Owned(highlight_tokens(line, &self.highlighter.tokenize(line)))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for JslexHelper {}

impl Helper for JslexHelper {}

/// Colors every token of `line` by kind, leaving the gaps untouched.
fn highlight_tokens(line: &str, scan: &Scan) -> String {
    let mut result = String::with_capacity(line.len() * 2);
    let mut cursor = 0;

    for token in &scan.tokens {
        let (start, end) = (token.span.start, token.span.end);
        if start < cursor || end > line.len() {
            continue;
        }
        result.push_str(&line[cursor..start]);
        result.push_str(&paint(token.kind, &line[start..end]));
        cursor = end;
    }

    result.push_str(&line[cursor..]);
    result
}

fn paint(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Keyword => text.magenta().bold().to_string(),
        TokenKind::Identifier => text.to_string(),
        TokenKind::NumericLiteral => text.yellow().to_string(),
        TokenKind::StringLiteral => text.green().to_string(),
        TokenKind::Operator => text.cyan().to_string(),
        TokenKind::Punctuation => text.bright_yellow().to_string(),
        TokenKind::LineComment | TokenKind::BlockComment => text.dimmed().to_string(),
    }
}

/// The interactive tokenizer session.
pub struct Repl {
    config: Config,
    tokenizer: Box<dyn Tokenizer>,
    editor: Editor<JslexHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(config: Config) -> Result<Self> {
        let editor_config = EditorConfig::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(JslexHelper::new()));

        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jslex")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let _ = editor.load_history(&history_path);

        Ok(Self {
            tokenizer: config.tokenizer()?,
            config,
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "jslex>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    let scan = self.tokenizer.tokenize(&line);
                    self.print_scan(REPL_SOURCE, &scan);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(err) = self.editor.save_history(&self.history_path) {
            tracing::debug!(%err, "could not save history");
        }

        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} {} {}",
            "jslex".bright_cyan().bold(),
            "v".dimmed(),
            env!("CARGO_PKG_VERSION").bright_yellow()
        );
        println!(
            "  {} {} {} {}",
            "strategy".dimmed(),
            self.config.strategy.cyan(),
            "table".dimmed(),
            self.config.table.cyan()
        );
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!("{} {}", "jslex".bright_cyan().bold(), env!("CARGO_PKG_VERSION").yellow());
            }
            ReplCommand::Load => match arg {
                Some(path) => self.load_file(Path::new(path)),
                None => print_usage_error(".load", "requires a file path"),
            },
            ReplCommand::Table => match arg {
                Some(name) => self.switch("table", name),
                None => println!("{}", self.config.table.cyan()),
            },
            ReplCommand::Strategy => match arg {
                Some(name) => self.switch("strategy", name),
                None => println!("{}", self.config.strategy.cyan()),
            },
            ReplCommand::Config => match arg {
                Some(key) => match self.config.get(key) {
                    Some(value) => println!("{} = {}", key.dimmed(), value.cyan()),
                    None => print_usage_error(".config", "unknown key"),
                },
                None => match self.config.to_toml() {
                    Ok(rendered) => print!("{rendered}"),
                    Err(err) => print_error(&err),
                },
            },
        }
        CommandResult::Continue
    }

    /// Changes one config key and rebuilds the tokenizer. Leaves both
    /// untouched when the value is rejected.
    fn switch(&mut self, key: &str, value: &str) {
        let mut config = self.config.clone();
        let rebuilt = config.set(key, value).and_then(|()| config.tokenizer());
        match rebuilt {
            Ok(tokenizer) => {
                self.config = config;
                self.tokenizer = tokenizer;
                println!("{} {}", key.dimmed(), value.trim().cyan());
            }
            Err(err) => print_error(&err),
        }
    }

    fn load_file(&self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(source) => {
                let scan = self.tokenizer.tokenize(&source);
                self.print_scan(&path.display().to_string(), &scan);
            }
            Err(err) => eprintln!("{}: {}: {}", "Error".red().bold(), path.display(), err),
        }
    }

    fn print_scan(&self, source: &str, scan: &Scan) {
        for token in &scan.tokens {
            println!("{} - {}", token.text, paint(token.kind, token.kind.name()));
        }
        for diagnostic in &scan.diagnostics {
            eprintln!(
                "{}",
                output::format_diagnostic(source, diagnostic, self.config.color)
            );
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:18} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!("  {:18} {}", "Ctrl+C".yellow(), "Cancel current input".dimmed());
        println!("  {:18} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:18} {}", "Tab".yellow(), "Autocomplete".dimmed());
        println!();
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn print_usage_error(command: &str, message: &str) {
    eprintln!(
        "{}: {} {}",
        "Error".red().bold(),
        command.cyan(),
        message.dimmed()
    );
}

fn print_error(err: &crate::error::JslexError) {
    eprintln!("{}: {}", "Error".red().bold(), err);
}
