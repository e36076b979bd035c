//! Optional TOML configuration file.
//!
//! ```toml
//! log_level = "info"
//! log_file = "phtax.log"
//! income_tax_brackets = "brackets.csv"
//! format = "text"
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cli::OutputFormat;

pub const DEFAULT_CONFIG_FILE_PATH: &str = "./phtax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub income_tax_brackets: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Loads `path` when given; otherwise `./phtax.toml` if it exists, or the
    /// defaults.
    ///
    /// Relative paths inside the file are resolved against the file's
    /// directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE_PATH);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    fn relative_to(
        self,
        base: &Path,
    ) -> Self {
        let resolve =
            |p: Option<PathBuf>| p.map(|p| if p.is_relative() { base.join(p) } else { p });
        Self {
            log_file: resolve(self.log_file),
            income_tax_brackets: resolve(self.income_tax_brackets),
            ..self
        }
    }
}
