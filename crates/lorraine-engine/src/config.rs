//! Compiler configuration (lorraine.toml)
//!
//! ```toml
//! imbalancedLocalAssignments = true
//! allowTypelessFunctions = false
//! detailedErrors = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// File looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "lorraine.toml";

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML, including unknown keys and mistyped values
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to render TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Flags consulted while parsing, validating and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    /// Allow `local` statements with fewer values than variables; the
    /// missing values become `nil`
    pub imbalanced_local_assignments: bool,

    /// Allow function prototypes and function types without a return
    /// annotation; they return `any`
    pub allow_typeless_functions: bool,

    /// Render errors as annotated source snippets instead of a single line
    pub detailed_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imbalanced_local_assignments: false,
            allow_typeless_functions: false,
            detailed_errors: true,
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse a config from TOML text
    fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl Config {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Load the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `lorraine.toml` in the
    /// working directory is used when present and the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_imbalanced_local_assignments(mut self, enabled: bool) -> Self {
        self.imbalanced_local_assignments = enabled;
        self
    }

    pub fn with_typeless_functions(mut self, enabled: bool) -> Self {
        self.allow_typeless_functions = enabled;
        self
    }

    pub fn with_detailed_errors(mut self, enabled: bool) -> Self {
        self.detailed_errors = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.imbalanced_local_assignments);
        assert!(!config.allow_typeless_functions);
        assert!(config.detailed_errors);

        // An empty file is all defaults
        assert_eq!(Config::from_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_camel_case_keys() {
        let config = Config::from_str(
            r#"
imbalancedLocalAssignments = true
detailedErrors = false
"#,
        )
        .unwrap();

        assert!(config.imbalanced_local_assignments);
        assert!(!config.allow_typeless_functions);
        assert!(!config.detailed_errors);
    }

    #[test]
    fn test_str_parse() {
        let config: Config = "allowTypelessFunctions = true".parse().unwrap();
        assert!(config.allow_typeless_functions);
        assert!("detailedErrors = 1".parse::<Config>().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_str("strictMode = true").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_mistyped_value_rejected() {
        let err = Config::from_str("allowTypelessFunctions = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowTypelessFunctions = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.allow_typeless_functions);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_to_toml_reloads() {
        let config = Config::default()
            .with_typeless_functions(true)
            .with_detailed_errors(false);

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("allowTypelessFunctions = true"));
        assert_eq!(Config::from_str(&rendered).unwrap(), config);
    }
}
