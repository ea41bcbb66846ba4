//! Run configuration.
//!
//! Every setting has a default suited to PNUSA line lists and NCBI Pathogen
//! Detection distance tables, so a config file only needs to name what differs. Values
//! are layered: built-in defaults, then an optional TOML file, then
//! command-line flags (applied by the `cli` module).
//!
//! ```toml
//! [line_list]
//! path = "1804MLJMP-1_Montevideo_analreq180709.xlsx"
//! column = "WGS_id"
//! prefix = "PNU"
//!
//! [registry]
//! email = "someone@example.org"
//! max_retries = 3
//!
//! [distance_table]
//! path = "PDG000000002.1169.reference_target.SNP_distances.tsv"
//! skip_bad_rows = true
//!
//! [matching]
//! mode = "first-side"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::MatchMode;
use crate::utils::validation::is_plausible_email;

pub const DEFAULT_IDENTIFIER_COLUMN: &str = "WGS_id";
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "PNU";
pub const DEFAULT_REGISTRY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_REGISTRY_DATABASE: &str = "biosample";
pub const DEFAULT_TOOL_NAME: &str = "linelist-linker";
pub const DEFAULT_ACC1_COLUMN: &str = "biosample_acc_1";
pub const DEFAULT_ACC2_COLUMN: &str = "biosample_acc_2";
pub const DEFAULT_DISTANCE_COLUMN: &str = "compatible_distance";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub line_list: LineListConfig,
    pub registry: RegistryConfig,
    pub distance_table: DistanceTableConfig,
    pub matching: MatchingConfig,
}

/// Where identifiers come from and which of them are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineListConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Header of the identifier column; must match exactly
    pub column: String,
    /// Values not starting with this are dropped
    pub prefix: String,
    /// Worksheet to read; the first sheet when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for LineListConfig {
    fn default() -> Self {
        Self {
            path: None,
            column: DEFAULT_IDENTIFIER_COLUMN.to_string(),
            prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            sheet: None,
        }
    }
}

/// Remote accession registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// E-utilities base URL (without the trailing `/efetch.fcgi`)
    pub base_url: String,
    pub database: String,
    /// Contact address the registry requires from callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub tool: String,
    /// Extra attempts after the first for transient network failures
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            database: DEFAULT_REGISTRY_DATABASE.to_string(),
            email: None,
            tool: DEFAULT_TOOL_NAME.to_string(),
            max_retries: 3,
            backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

/// Pairwise distance table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceTableConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub acc1_column: String,
    pub acc2_column: String,
    pub distance_column: String,
    pub delimiter: char,
    /// Drop (and count) malformed rows instead of aborting the load
    pub skip_bad_rows: bool,
}

impl Default for DistanceTableConfig {
    fn default() -> Self {
        Self {
            path: None,
            acc1_column: DEFAULT_ACC1_COLUMN.to_string(),
            acc2_column: DEFAULT_ACC2_COLUMN.to_string(),
            distance_column: DEFAULT_DISTANCE_COLUMN.to_string(),
            delimiter: '\t',
            skip_bad_rows: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub mode: MatchMode,
}

impl Config {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys, and
    /// `ConfigError::Invalid` if a value fails [`Config::validate`].
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or any error
    /// from [`Config::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Defaults, or the given file when one is supplied
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that would otherwise fail late, after network traffic
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_list.column.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "line_list.column must not be empty".to_string(),
            ));
        }
        if self.line_list.prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "line_list.prefix must not be empty".to_string(),
            ));
        }

        let table = &self.distance_table;
        for (key, value) in [
            ("acc1_column", &table.acc1_column),
            ("acc2_column", &table.acc2_column),
            ("distance_column", &table.distance_column),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "distance_table.{key} must not be empty"
                )));
            }
        }
        if !table.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "distance_table.delimiter must be a single ASCII character, got '{}'",
                table.delimiter
            )));
        }

        let registry = &self.registry;
        for (key, value) in [
            ("base_url", &registry.base_url),
            ("database", &registry.database),
            ("tool", &registry.tool),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "registry.{key} must not be empty"
                )));
            }
        }
        if registry.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "registry.timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Some(email) = &self.registry.email {
            if !is_plausible_email(email) {
                return Err(ConfigError::Invalid(format!(
                    "registry.email '{email}' does not look like an email address"
                )));
            }
        }

        Ok(())
    }

    /// The caller identity, which registry lookups cannot proceed without
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no email is configured.
    pub fn require_email(&self) -> Result<&str, ConfigError> {
        self.registry
            .email
            .as_deref()
            .ok_or(ConfigError::Missing("registry.email (or --email)"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no line-list path is configured.
    pub fn require_line_list(&self) -> Result<&Path, ConfigError> {
        self.line_list
            .path
            .as_deref()
            .ok_or(ConfigError::Missing("line_list.path (or --line-list)"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no distance-table path is configured.
    pub fn require_distance_table(&self) -> Result<&Path, ConfigError> {
        self.distance_table
            .path
            .as_deref()
            .ok_or(ConfigError::Missing("distance_table.path (or --distances)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.line_list.column, "WGS_id");
        assert_eq!(config.line_list.prefix, "PNU");
        assert_eq!(config.registry.database, "biosample");
        assert_eq!(config.distance_table.acc1_column, "biosample_acc_1");
        assert_eq!(config.distance_table.acc2_column, "biosample_acc_2");
        assert_eq!(config.distance_table.distance_column, "compatible_distance");
        assert_eq!(config.distance_table.delimiter, '\t');
        assert!(config.distance_table.skip_bad_rows);
        assert_eq!(config.matching.mode, MatchMode::FirstSide);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
[line_list]
column = "Isolate ID"

[registry]
email = "someone@example.org"
max_retries = 0

[distance_table]
skip_bad_rows = false

[matching]
mode = "symmetric"
"#,
        )
        .unwrap();

        assert_eq!(config.line_list.column, "Isolate ID");
        assert_eq!(config.line_list.prefix, "PNU");
        assert_eq!(config.registry.email.as_deref(), Some("someone@example.org"));
        assert_eq!(config.registry.max_retries, 0);
        assert_eq!(config.registry.timeout_secs, 30);
        assert!(!config.distance_table.skip_bad_rows);
        assert_eq!(config.matching.mode, MatchMode::Symmetric);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_toml("[line_list]\ncolumn_name = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_toml("[line_list]\nprefix = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml("[registry]\nemail = \"nobody\"\n").unwrap_err();
        assert!(err.to_string().contains("nobody"));

        let err = Config::from_toml("[distance_table]\ndelimiter = \"é\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml("[registry]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        for key in ["database", "tool"] {
            let err = Config::from_toml(&format!("[registry]\n{key} = \" \"\n")).unwrap_err();
            assert!(err.to_string().contains(&format!("registry.{key}")));
        }
    }

    #[test]
    fn test_missing_settings_are_named() {
        let config = Config::default();
        let err = config.require_email().unwrap_err();
        assert!(err.to_string().contains("--email"));
        assert!(config.require_line_list().is_err());
        assert!(config.require_distance_table().is_err());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let mut config = Config::default();
        config.registry.email = Some("someone@example.org".to_string());
        config.line_list.path = Some(PathBuf::from("cases.xlsx"));

        let text = config.to_toml().unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.registry.email, config.registry.email);
        assert_eq!(parsed.line_list.path, config.line_list.path);
    }
}
