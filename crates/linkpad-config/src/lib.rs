//! Configuration management for Linkpad.
//!
//! Parses `linkpad.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `diagrams.kroki_url`
//! - `share.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the preview theme name.
    pub theme: Option<String>,
    /// Override the preview debounce window in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "linkpad.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Preview configuration.
    pub preview: PreviewConfig,
    /// Diagram rendering configuration (optional section).
    /// When present, `kroki_url` is required.
    diagrams: Option<DiagramsSection>,
    /// Share link configuration.
    pub share: ShareConfig,

    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Preview configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Quiet period between a save and the re-render, in milliseconds.
    pub debounce_ms: u64,
    /// Theme name, `"light"` or `"dark"`.
    pub theme: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            theme: "dark".to_owned(),
        }
    }
}

/// Raw diagrams section as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsSection {
    kroki_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug)]
pub struct DiagramsConfig {
    /// Kroki server URL for diagram rendering, None disables diagrams.
    pub kroki_url: Option<String>,
    /// HTTP timeout for render requests, in seconds.
    pub timeout_secs: u64,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            kroki_url: None,
            timeout_secs: 30,
        }
    }
}

/// Share link configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ShareConfig {
    /// Public base URL used when building share links. Defaults to the
    /// address the server listens on.
    pub base_url: Option<String>,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`diagrams.kroki_url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `linkpad.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The merged result is what gets
    /// validated, so a CLI flag can fix an invalid file value but can also
    /// introduce one.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the effective configuration is invalid.
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
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(theme) = &settings.theme {
            self.preview.theme.clone_from(theme);
        }
        if let Some(debounce_ms) = settings.debounce_ms {
            self.preview.debounce_ms = debounce_ms;
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams_resolved.kroki_url = Some(kroki_url.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

        config.expand_env_vars()?;
        config.resolve_diagrams()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`], after CLI
    /// settings have been applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_preview()?;
        self.validate_diagrams()?;
        self.validate_share()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_preview(&self) -> Result<(), ConfigError> {
        const MAX_DEBOUNCE_MS: u64 = 60_000;

        let theme = &self.preview.theme;
        if !theme.eq_ignore_ascii_case("light") && !theme.eq_ignore_ascii_case("dark") {
            return Err(ConfigError::Validation(format!(
                "preview.theme must be \"light\" or \"dark\", got {theme:?}"
            )));
        }

        if self.preview.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "preview.debounce_ms cannot exceed {MAX_DEBOUNCE_MS}"
            )));
        }

        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        const MAX_TIMEOUT_SECS: u64 = 300;

        // Only validate kroki_url if set (diagram rendering enabled)
        if let Some(ref kroki_url) = self.diagrams_resolved.kroki_url {
            require_non_empty(kroki_url, "diagrams.kroki_url")?;
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }

        let timeout = self.diagrams_resolved.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "diagrams.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }

    fn validate_share(&self) -> Result<(), ConfigError> {
        if let Some(ref base_url) = self.share.base_url {
            require_non_empty(base_url, "share.base_url")?;
            require_http_url(base_url, "share.base_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref mut diagrams) = self.diagrams
            && let Some(ref url) = diagrams.kroki_url
        {
            diagrams.kroki_url = Some(expand::expand_env(url, "diagrams.kroki_url")?);
        }

        if let Some(ref url) = self.share.base_url {
            self.share.base_url = Some(expand::expand_env(url, "share.base_url")?);
        }

        Ok(())
    }

    /// Resolve the optional `[diagrams]` section.
    ///
    /// Validates that `kroki_url` is provided when the section exists.
    fn resolve_diagrams(&mut self) -> Result<(), ConfigError> {
        self.diagrams_resolved = match &self.diagrams {
            Some(diagrams) => {
                let kroki_url = diagrams.kroki_url.clone().ok_or_else(|| {
                    ConfigError::Validation(
                        "[diagrams] section requires kroki_url to be set".to_owned(),
                    )
                })?;
                DiagramsConfig {
                    kroki_url: Some(kroki_url),
                    timeout_secs: diagrams.timeout_secs.unwrap_or(30),
                }
            }
            None => DiagramsConfig::default(),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.preview.debounce_ms, 300);
        assert_eq!(config.preview.theme, "dark");
        assert!(config.diagrams_resolved.kroki_url.is_none());
        assert_eq!(config.diagrams_resolved.timeout_secs, 30);
        assert!(config.share.base_url.is_none());
    }

    #[test]
    fn parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.preview.theme, "dark");
    }

    #[test]
    fn parse_server_section() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn parse_preview_section() {
        let toml = r#"
[preview]
debounce_ms = 150
theme = "light"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.preview.debounce_ms, 150);
        assert_eq!(config.preview.theme, "light");
    }

    #[test]
    fn resolve_diagrams_section() {
        let toml = r#"
[diagrams]
kroki_url = "https://kroki.io"
timeout_secs = 10
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_diagrams().unwrap();

        assert_eq!(
            config.diagrams_resolved.kroki_url,
            Some("https://kroki.io".to_owned())
        );
        assert_eq!(config.diagrams_resolved.timeout_secs, 10);
    }

    #[test]
    fn diagrams_section_requires_kroki_url() {
        let toml = r#"
[diagrams]
timeout_secs = 10
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_diagrams().unwrap_err();

        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("kroki_url"));
    }

    #[test]
    fn no_diagrams_section_is_valid() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_diagrams().unwrap();

        assert!(config.diagrams_resolved.kroki_url.is_none());
        assert_eq!(config.diagrams_resolved.timeout_secs, 30);
    }

    #[test]
    fn apply_cli_settings_overrides_listed_fields() {
        let mut config = Config::default();
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            theme: Some("light".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.preview.theme, "light");
        assert_eq!(config.preview.debounce_ms, 300); // Unchanged
    }

    #[test]
    fn apply_cli_settings_kroki_url_enables_diagrams() {
        let mut config = Config::default();
        assert!(config.diagrams_resolved.kroki_url.is_none());

        let overrides = CliSettings {
            kroki_url: Some("http://localhost:8000".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.diagrams_resolved.kroki_url,
            Some("http://localhost:8000".to_owned())
        );
    }

    #[test]
    fn apply_cli_settings_empty_changes_nothing() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.preview.theme, "dark");
    }

    #[test]
    fn load_explicit_path_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkpad.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8100

[preview]
theme = "light"

[diagrams]
kroki_url = "https://kroki.io"
"#
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8100);
        assert_eq!(config.preview.theme, "light");
        assert_eq!(
            config.diagrams_resolved.kroki_url,
            Some("https://kroki.io".to_owned())
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn load_missing_explicit_path_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/linkpad.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_validates_cli_settings_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkpad.toml");
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            theme: Some("sepia".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("preview.theme"));
    }

    #[test]
    fn load_lets_cli_settings_fix_an_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkpad.toml");
        std::fs::write(&path, "[preview]\ntheme = \"sepia\"\n").unwrap();

        let overrides = CliSettings {
            theme: Some("light".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(config.preview.theme, "light");
    }

    #[test]
    fn expand_env_vars_in_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LINKPAD_CONF_HOST", "0.0.0.0");
        }

        let toml = r#"
[server]
host = "${LINKPAD_CONF_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");

        unsafe {
            std::env::remove_var("LINKPAD_CONF_HOST");
        }
    }

    #[test]
    fn expand_env_vars_in_share_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LINKPAD_CONF_BASE", "https://pad.example.com");
        }

        let toml = r#"
[share]
base_url = "${LINKPAD_CONF_BASE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(
            config.share.base_url,
            Some("https://pad.example.com".to_owned())
        );

        unsafe {
            std::env::remove_var("LINKPAD_CONF_BASE");
        }
    }

    #[test]
    fn expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LINKPAD_CONF_MISSING");
        }

        let toml = r#"
[diagrams]
kroki_url = "${LINKPAD_CONF_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("LINKPAD_CONF_MISSING"));
        assert!(err.to_string().contains("diagrams.kroki_url"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_server_host_empty() {
        let mut config = Config::default();
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn validate_server_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn validate_preview_theme_unknown() {
        let mut config = Config::default();
        config.preview.theme = "sepia".to_owned();
        assert_validation_error(&config, &["preview.theme", "sepia"]);
    }

    #[test]
    fn validate_preview_theme_case_insensitive() {
        let mut config = Config::default();
        config.preview.theme = "Light".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_preview_debounce_too_large() {
        let mut config = Config::default();
        config.preview.debounce_ms = 120_000;
        assert_validation_error(&config, &["debounce_ms", "60000"]);
    }

    #[test]
    fn validate_diagrams_kroki_url_invalid_scheme() {
        let mut config = Config::default();
        config.diagrams_resolved.kroki_url = Some("ftp://kroki.io".to_owned());
        assert_validation_error(&config, &["kroki_url", "http"]);
    }

    #[test]
    fn validate_diagrams_timeout_zero() {
        let mut config = Config::default();
        config.diagrams_resolved.timeout_secs = 0;
        assert_validation_error(&config, &["timeout_secs", "greater than 0"]);
    }

    #[test]
    fn validate_share_base_url_invalid_scheme() {
        let mut config = Config::default();
        config.share.base_url = Some("pad.example.com".to_owned());
        assert_validation_error(&config, &["share.base_url", "http"]);
    }

    #[test]
    fn validate_share_base_url_valid_https() {
        let mut config = Config::default();
        config.share.base_url = Some("https://pad.example.com".to_owned());
        assert!(config.validate().is_ok());
    }
}
