//! Configuration management for mdtf.
//!
//! Parses `mdtf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The `[formatter]` table holds formatter settings under their configuration
//! names:
//!
//! ```toml
//! [formatter]
//! html5ElementSuffix = true
//! abbreviations = """
//! HTML=HyperText Markup Language
//! CSS: Cascading Style Sheets
//! """
//! externalLinkAttributes = "target=_blank, rel=nofollow"
//! tableClass = "table"
//!
//! [output]
//! extension = "html"
//! ```
//!
//! TOML has no null, so leaving a key out is how a setting is reset to the
//! engine default. CLI settings can be applied during load via
//! [`CliSettings`].

use std::path::{Path, PathBuf};

use mdtf_directives::{ConfigSnapshot, ConfigValue, SCHEMA, field};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdtf.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override `html5ElementSuffix`.
    pub html5_element_suffix: Option<bool>,
    /// Override `setBreaksEnabled`.
    pub breaks_enabled: Option<bool>,
    /// Override `setUrlsLinked`.
    pub urls_linked: Option<bool>,
    /// Free-form `name=value` overrides, applied last.
    pub overrides: Vec<(String, String)>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw `[formatter]` table as parsed from TOML.
    formatter: toml::Table,
    /// Output configuration.
    pub output: OutputConfig,

    /// Resolved formatter settings (set after loading).
    #[serde(skip)]
    pub snapshot: ConfigSnapshot,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File extension for rendered files written to an output directory.
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "html".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdtf.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a setting has the wrong type.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings)?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the resolved snapshot.
    fn apply_cli_settings(&mut self, settings: &CliSettings) -> Result<(), ConfigError> {
        if let Some(html5) = settings.html5_element_suffix {
            self.snapshot.set("html5ElementSuffix", html5);
        }
        if let Some(breaks) = settings.breaks_enabled {
            self.snapshot.set("setBreaksEnabled", breaks);
        }
        if let Some(urls) = settings.urls_linked {
            self.snapshot.set("setUrlsLinked", urls);
        }
        for (name, value) in &settings.overrides {
            let value = override_value(name, value)?;
            self.snapshot.set(name.as_str(), value);
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.resolve()?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            settings = config.snapshot.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Convert the raw `[formatter]` table into a validated snapshot.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let mut snapshot = ConfigSnapshot::new();
        for (name, value) in &self.formatter {
            let value = convert_toml_value(name, value)?;
            validate_setting(name, &value)?;
            snapshot.set(name.as_str(), value);
        }
        self.snapshot = snapshot;
        self.validate_output()
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        let extension = &self.output.extension;
        if extension.is_empty() {
            return Err(ConfigError::Validation(
                "output.extension cannot be empty".to_owned(),
            ));
        }
        if extension.contains(['/', '\\', '.']) {
            return Err(ConfigError::Validation(format!(
                "output.extension must be a bare extension, got {extension:?}"
            )));
        }
        Ok(())
    }
}

/// Map a TOML value onto the formatter's value model.
///
/// Numbers are accepted as text (`tableClass = 1` sets a table border).
fn convert_toml_value(name: &str, value: &toml::Value) -> Result<ConfigValue, ConfigError> {
    match value {
        toml::Value::Boolean(b) => Ok(ConfigValue::Bool(*b)),
        toml::Value::String(s) => Ok(ConfigValue::Text(s.clone())),
        toml::Value::Integer(i) => Ok(ConfigValue::Text(i.to_string())),
        toml::Value::Float(f) => Ok(ConfigValue::Text(f.to_string())),
        toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => Err(
            ConfigError::Validation(format!("formatter.{name} must be a string or boolean")),
        ),
    }
}

/// Check a setting against the schema.
///
/// Unknown settings are kept but logged, so newer config files keep working
/// with older binaries.
fn validate_setting(name: &str, value: &ConfigValue) -> Result<(), ConfigError> {
    let Some(descriptor) = field(name) else {
        tracing::warn!(setting = name, "Unknown formatter setting");
        return Ok(());
    };
    if !descriptor.kind.accepts(value) {
        return Err(ConfigError::Validation(format!(
            "formatter.{name} must be a {}, got {}",
            descriptor.kind.expected(),
            value.kind_name()
        )));
    }
    Ok(())
}

/// Interpret a `name=value` CLI override using the schema.
fn override_value(name: &str, value: &str) -> Result<ConfigValue, ConfigError> {
    let descriptor = field(name).ok_or_else(|| {
        let known: Vec<&str> = SCHEMA.iter().map(|f| f.name).collect();
        ConfigError::Validation(format!(
            "unknown formatter setting {name:?} (expected one of: {})",
            known.join(", ")
        ))
    })?;

    if descriptor.kind.expected() == "boolean" {
        match value {
            "true" | "1" | "yes" | "on" => Ok(ConfigValue::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(ConfigValue::Bool(false)),
            other => Err(ConfigError::Validation(format!(
                "{name} expects a boolean, got {other:?}"
            ))),
        }
    } else {
        Ok(ConfigValue::Text(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mdtf_directives::compile;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(toml)?;
        config.resolve()?;
        Ok(config)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.snapshot.is_empty());
        assert_eq!(config.output.extension, "html");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("").unwrap();
        assert!(config.snapshot.is_empty());
        assert_eq!(config.output.extension, "html");
    }

    #[test]
    fn test_parse_formatter_config() {
        let toml = r#"
[formatter]
html5ElementSuffix = true
abbreviations = """
HTML=HyperText Markup Language
CSS: Cascading Style Sheets
"""
imageAttributes = "class=hero, alt=Banner"
codeBlockAttrParent = true
footnoteLinkText = "[%s]"
"#;
        let config = parse(toml).unwrap();
        let snapshot = &config.snapshot;

        assert_eq!(
            snapshot.get("html5ElementSuffix"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(
            snapshot.get("imageAttributes"),
            Some(&ConfigValue::from("class=hero, alt=Banner"))
        );

        let directives = compile(snapshot).unwrap();
        assert_eq!(
            directives.abbreviations().get("CSS"),
            Some("Cascading Style Sheets")
        );
        assert!(directives.code_block_attr_on_parent());
        assert_eq!(directives.footnote_link_text(), Some("[%s]"));
    }

    #[test]
    fn test_integer_table_class_becomes_text() {
        let config = parse("[formatter]\ntableClass = 1\n").unwrap();
        assert_eq!(config.snapshot.get("tableClass"), Some(&ConfigValue::from("1")));
    }

    #[test]
    fn test_wrong_type_is_validation_error() {
        let err = parse("[formatter]\ncodeBlockAttrParent = \"yes\"\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("formatter.codeBlockAttrParent"));
    }

    #[test]
    fn test_array_value_is_validation_error() {
        let err = parse("[formatter]\nlinkAttributes = [\"a=b\"]\n").unwrap_err();
        assert!(err.to_string().contains("formatter.linkAttributes"));
    }

    #[test]
    fn test_unknown_setting_is_kept() {
        let config = parse("[formatter]\nfutureSetting = \"x\"\n").unwrap();
        assert_eq!(
            config.snapshot.get("futureSetting"),
            Some(&ConfigValue::from("x"))
        );
    }

    #[test]
    fn test_output_extension_validation() {
        assert!(parse("[output]\nextension = \"\"\n").is_err());
        assert!(parse("[output]\nextension = \".html\"\n").is_err());
        let config = parse("[output]\nextension = \"xhtml\"\n").unwrap();
        assert_eq!(config.output.extension, "xhtml");
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = parse("[formatter]\nhtml5ElementSuffix = false\n").unwrap();
        let settings = CliSettings {
            html5_element_suffix: Some(true),
            breaks_enabled: Some(true),
            urls_linked: Some(false),
            overrides: vec![
                ("tableClass".to_owned(), "grid".to_owned()),
                ("codeBlockAttrParent".to_owned(), "on".to_owned()),
            ],
        };

        config.apply_cli_settings(&settings).unwrap();

        let snapshot = &config.snapshot;
        assert_eq!(snapshot.get("html5ElementSuffix"), Some(&ConfigValue::Bool(true)));
        assert_eq!(snapshot.get("setBreaksEnabled"), Some(&ConfigValue::Bool(true)));
        assert_eq!(snapshot.get("setUrlsLinked"), Some(&ConfigValue::Bool(false)));
        assert_eq!(snapshot.get("tableClass"), Some(&ConfigValue::from("grid")));
        assert_eq!(
            snapshot.get("codeBlockAttrParent"),
            Some(&ConfigValue::Bool(true))
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = parse("[formatter]\ntableClass = \"grid\"\n").unwrap();
        config.apply_cli_settings(&CliSettings::default()).unwrap();
        assert_eq!(config.snapshot.len(), 1);
    }

    #[test]
    fn test_override_unknown_setting() {
        let err = override_value("tabelClass", "grid").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("tabelClass"));
        assert!(message.contains("tableClass"));
    }

    #[test]
    fn test_override_bad_boolean() {
        let err = override_value("html5ElementSuffix", "maybe").unwrap_err();
        assert!(err.to_string().contains("expects a boolean"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[formatter]\nfootnoteClass = \"notes\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.snapshot.get("footnoteClass"),
            Some(&ConfigValue::from("notes"))
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[formatter\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config_from(&nested).unwrap();
        assert_eq!(found, nested.join(CONFIG_FILENAME));
    }
}
