use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;
use crate::opts::{is_identifier, tokenize, TokenizeError};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Invalid user.java_opts: {0}")]
    UserOpts(#[from] TokenizeError),
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/java-opts/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("java-opts").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Placeholder and launch variable names are valid identifiers
    /// - The three placeholders are distinct
    /// - The store directory is set
    /// - `user.java_opts` tokenizes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placeholders;
        let names = [
            ("placeholders.install_root", &p.install_root),
            ("placeholders.home", &p.home),
            ("placeholders.passthrough", &p.passthrough),
            ("launch.variable", &self.launch.variable),
        ];
        for (field, name) in names {
            if !is_identifier(name) {
                return Err(ConfigError::ValidationError {
                    message: format!("{} '{}' is not a valid variable name", field, name),
                });
            }
        }

        if p.install_root == p.home || p.install_root == p.passthrough || p.home == p.passthrough
        {
            return Err(ConfigError::ValidationError {
                message: "Placeholder names must be distinct".to_string(),
            });
        }

        if self.store.dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "store.dir must not be empty".to_string(),
            });
        }

        tokenize(&self.user.java_opts)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_variable_name() {
        let mut config = Config::default();
        config.launch.variable = "JAVA-OPTS".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("launch.variable"));
    }

    #[test]
    fn rejects_duplicate_placeholders() {
        let mut config = Config::default();
        config.placeholders.home = "DEPS_DIR".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_user_opts() {
        let mut config = Config::default();
        config.user.java_opts = "-Da=\"open".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UserOpts(_)));
        assert!(err.to_string().contains("-Da=\"open"));
    }
}
