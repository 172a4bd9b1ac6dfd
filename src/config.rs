//! clausekit configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ClauseError, ClauseResult};
use crate::transpiler::{Compiler, Dialect, IdentifierPreparer};

/// Explicit quote pair, overriding the dialect's.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuotingConfig {
    pub initial: String,
    /// Defaults to `initial`.
    #[serde(default, rename = "final")]
    pub final_quote: Option<String>,
}

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dialect: Dialect,

    /// Schema file used when none is given on the command line
    #[serde(default)]
    pub schema: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub quoting: Option<QuotingConfig>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            schema: None,
            log_level: default_log_level(),
            quoting: None,
        }
    }
}

impl Config {
    /// `<config dir>/clausekit/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("clausekit").join("config.toml"))
    }

    /// Read `path` if given, else the default location if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> ClauseResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        let content = fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        // Relative schema paths are relative to the config file.
        if let (Some(schema), Some(dir)) = (config.schema.as_mut(), path.parent()) {
            if schema.is_relative() {
                *schema = dir.join(&*schema);
            }
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ClauseResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClauseError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn preparer(&self) -> IdentifierPreparer {
        match &self.quoting {
            Some(q) => IdentifierPreparer::new(&q.initial, q.final_quote.as_deref()),
            None => self.dialect.preparer(),
        }
    }

    pub fn compiler(&self) -> Compiler {
        Compiler::new(self.preparer())
    }
}
