//! Configuration loading for the demo shell.
//!
//! `runeline.toml` is looked for in the working directory first, then in
//! the platform config directory. Absent files and parse errors both fall
//! back to defaults: a broken config file should never keep the shell
//! from starting.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub multiline: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: Self::default_prompt(),
            multiline: false,
        }
    }
}

impl EditorConfig {
    fn default_prompt() -> String {
        "cli> ".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_file")]
    pub file: PathBuf,
    #[serde(default = "HistoryConfig::default_maxlen")]
    pub maxlen: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
            maxlen: Self::default_maxlen(),
        }
    }
}

impl HistoryConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("history.txt")
    }
    const fn default_maxlen() -> usize {
        32
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Best-effort config path: working directory first, then the platform
/// config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("runeline.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("runeline").join("runeline.toml");
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Ok(Config::default()),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(target: "config", %err, path = %path.display(), "parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}
