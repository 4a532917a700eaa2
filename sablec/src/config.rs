///
/// Front End Configuration
///
/// This module loads `sable.toml`, the optional project configuration read by
/// the `sable` driver. It lets a project respell the keyword and symbol
/// tables that parameterize the lexer and pick a default log level.
///
/// ## Example sable.toml
///
/// ```toml
/// [lexer]
/// keywords = ["as", "break", "class", "continue", "else", "false", "function",
///             "for", "goto", "if", "label", "null", "return", "true", "var", "while"]
///
/// [log]
/// level = "debug"
/// ```
///
/// Tables are positional: entry `i` spells keyword (or symbol) `i`, so an
/// override must list every entry in table order.
///

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::lexer::{Keyword, LanguageTables, Symbol, TableError};

pub const CONFIG_FILE_NAME: &str = "sable.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid literal table: {0}")]
    Table(#[from] TableError),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub lexer: LexerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LexerConfig {
    pub keywords: Option<Vec<String>>,
    pub symbols: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `explicit` when given, otherwise `sable.toml` in `dir` if it
    /// exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn tables(&self) -> Result<LanguageTables, ConfigError> {
        let keywords = match &self.lexer.keywords {
            Some(keywords) => keywords.clone(),
            None => Keyword::SPELLINGS.iter().map(|s| s.to_string()).collect(),
        };
        let symbols = match &self.lexer.symbols {
            Some(symbols) => symbols.clone(),
            None => Symbol::SPELLINGS.iter().map(|s| s.to_string()).collect(),
        };
        Ok(LanguageTables::new(keywords, symbols)?)
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        self.log
            .level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log.level.clone()))
    }
}
