// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Configuration management for jslex.

use std::path::{Path, PathBuf};

use jslex_automaton::{Preset, Strategy, Tokenizer};
use serde::{Deserialize, Serialize};

use crate::error::{JslexError, Result};
use crate::output::Format;

/// Project config file, looked up in the working directory.
pub const PROJECT_CONFIG: &str = "jslex.toml";

/// Prefix of the environment variables that override config keys.
const ENV_PREFIX: &str = "JSLEX_";

/// Every key accepted by [`Config::set`].
pub const KEYS: &[&str] = &[
    "strategy",
    "table",
    "format",
    "color",
    "jobs",
    "deny-diagnostics",
];

/// Configuration for jslex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Scanning strategy
    pub strategy: Strategy,

    /// Transition table preset (automaton strategy only)
    pub table: Preset,

    /// Token output format
    pub format: Format,

    /// Colored diagnostics
    pub color: bool,

    /// Worker threads for scanning many files; `None` uses every core
    pub jobs: Option<usize>,

    /// Fail when any diagnostic is produced
    pub deny_diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            table: Preset::default(),
            format: Format::default(),
            color: true,
            jobs: None,
            deny_diagnostics: false,
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(global) = global_config_path() {
            if global.exists() {
                config.merge_from_file(&global)?;
            }
        }

        let project = PathBuf::from(PROJECT_CONFIG);
        if project.exists() {
            config.merge_from_file(&project)?;
        }

        config.merge_env(std::env::vars())?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Merge configuration from a TOML file.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = content.parse().map_err(|source| JslexError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            self.set(&key, &value)?;
        }

        tracing::debug!(path = %path.display(), "merged config file");
        Ok(())
    }

    /// Merge `JSLEX_*` variables. `JSLEX_DENY_DIAGNOSTICS` sets `deny-diagnostics`.
    pub fn merge_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(key) = key.strip_prefix(ENV_PREFIX) {
                let key = key.to_lowercase().replace('_', "-");
                if KEYS.contains(&key.as_str()) {
                    self.set(&key, &value)?;
                }
            }
        }
        Ok(())
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match normalize_key(key).as_str() {
            "strategy" => self.strategy = value.parse()?,
            "table" => self.table = value.parse()?,
            "format" => self.format = value.parse()?,
            "color" => self.color = parse_bool(key, value)?,
            "jobs" => {
                self.jobs = match value {
                    "" | "0" | "auto" => None,
                    n => Some(n.parse().map_err(|_| {
                        JslexError::Config(format!("jobs must be a number, got '{n}'"))
                    })?),
                }
            }
            "deny-diagnostics" => self.deny_diagnostics = parse_bool(key, value)?,
            _ => {
                tracing::warn!(key, "ignoring unknown config key");
            }
        }
        Ok(())
    }

    /// Get a configuration value.
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "strategy" => Some(self.strategy.to_string()),
            "table" => Some(self.table.to_string()),
            "format" => Some(self.format.to_string()),
            "color" => Some(self.color.to_string()),
            "jobs" => Some(self.jobs.map_or_else(|| "auto".to_string(), |n| n.to_string())),
            "deny-diagnostics" => Some(self.deny_diagnostics.to_string()),
            _ => None,
        }
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the configured tokenizer.
    pub fn tokenizer(&self) -> Result<Box<dyn Tokenizer>> {
        self.strategy
            .build(self.table)
            .ok_or_else(|| JslexError::StrategyUnavailable(self.strategy.to_string()))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "-")
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(JslexError::Config(format!(
            "{key} expects true or false, got '{value}'"
        ))),
    }
}

/// Get the global config path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jslex").join("config.toml"))
}
