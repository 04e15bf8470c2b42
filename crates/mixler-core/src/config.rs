use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "MIXLER_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_BACKEND_ANON_KEY: &str = "MIXLER_BACKEND_ANON_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Hosted backend connection
    pub backend: BackendConfig,

    /// Public site settings (links, calendar export)
    #[serde(default)]
    pub site: SiteConfig,

    /// UI timings and thresholds
    #[serde(default)]
    pub ui: UiConfig,
}

/// Hosted backend project credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,

    /// Public (anon) API key. Safe to ship to browsers.
    pub anon_key: String,
}

impl BackendConfig {
    /// Check if credentials are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
            && !self.anon_key.is_empty()
            && !self.url.starts_with("YOUR_")
            && !self.anon_key.starts_with("YOUR_")
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "YOUR_SUPABASE_URL".to_string(),
            anon_key: "YOUR_SUPABASE_ANON_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public origin used for event links in calendar files
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// IANA timezone all event wall-clock times are assumed to be in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Domain suffix for calendar UIDs (`<event id>@<uid_domain>`)
    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    /// Login page path used by auth redirects
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_base_url() -> String {
    "https://staging.mixler.ca".to_string()
}

fn default_timezone() -> String {
    "America/Edmonton".to_string()
}

fn default_uid_domain() -> String {
    "mixler.ca".to_string()
}

fn default_login_path() -> String {
    "/login.html".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timezone: default_timezone(),
            uid_domain: default_uid_domain(),
            login_path: default_login_path(),
        }
    }
}

impl SiteConfig {
    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", self.timezone, e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a toast stays visible (ms)
    #[serde(default = "default_toast_visible_ms")]
    pub toast_visible_ms: u64,

    /// Exit transition before the toast element is removed (ms)
    #[serde(default = "default_toast_exit_ms")]
    pub toast_exit_ms: u64,

    /// Scroll offset after which the header gets the `scrolled` class (px)
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: f64,
}

fn default_toast_visible_ms() -> u64 {
    3000
}

fn default_toast_exit_ms() -> u64 {
    300
}

fn default_scroll_threshold_px() -> f64 {
    50.0
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_visible_ms: default_toast_visible_ms(),
            toast_exit_ms: default_toast_exit_ms(),
            scroll_threshold_px: default_scroll_threshold_px(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mixler");

        Self {
            config_dir,
            backend: BackendConfig::default(),
            site: SiteConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path, creating defaults if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            config
        } else {
            let contents = std::fs::read_to_string(config_path)
                .context("Failed to read config file")?;

            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace backend credentials from the environment when present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            tracing::debug!("Backend URL overridden from {}", ENV_BACKEND_URL);
            self.backend.url = url;
        }
        if let Ok(key) = std::env::var(ENV_BACKEND_ANON_KEY) {
            tracing::debug!("Backend key overridden from {}", ENV_BACKEND_ANON_KEY);
            self.backend.anon_key = key;
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.backend.is_configured() {
            self.validate_url(&self.backend.url, "backend.url", &mut result);
        } else {
            result.add_warning(
                "backend",
                "Backend credentials not configured - sign-in will be unavailable",
            );
        }

        self.validate_url(&self.site.base_url, "site.base_url", &mut result);

        if let Err(e) = self.site.tz() {
            result.add_error("site.timezone", e.to_string());
        }

        if !self.site.login_path.starts_with('/') {
            result.add_error("site.login_path", "Login path must start with '/'");
        }

        if self.site.uid_domain.trim().is_empty() {
            result.add_error("site.uid_domain", "UID domain cannot be empty");
        }

        if self.ui.toast_visible_ms == 0 {
            result.add_warning("ui.toast_visible_ms", "Toasts will disappear immediately");
        }

        if self.ui.scroll_threshold_px < 0.0 {
            result.add_error(
                "ui.scroll_threshold_px",
                "Scroll threshold cannot be negative",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("mixler");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.backend.url = "https://project.supabase.co".to_string();
        config.backend.anon_key = "anon-key".to_string();
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_placeholder_backend_is_warning() {
        let result = Config::default().validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "backend"));
    }

    #[test]
    fn test_invalid_backend_url() {
        let mut config = configured();
        config.backend.url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "backend.url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = configured();
        config.site.base_url = "ftp://mixler.ca".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_unknown_timezone() {
        let mut config = configured();
        config.site.timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "site.timezone"));
    }

    #[test]
    fn test_default_timezone_parses() {
        let tz = SiteConfig::default().tz().unwrap();
        assert_eq!(tz, chrono_tz::America::Edmonton);
    }

    #[test]
    fn test_login_path_must_be_absolute() {
        let mut config = configured();
        config.site.login_path = "login.html".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_load_from_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixler").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.site.timezone, "America/Edmonton");
        assert_eq!(config.ui.toast_visible_ms, 3000);
        assert_eq!(config.ui.toast_exit_ms, 300);
    }

    #[test]
    fn test_load_from_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
config_dir = "/tmp/mixler"

[backend]
url = "https://project.supabase.co"
anon_key = "anon"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.site.login_path, "/login.html");
        assert_eq!(config.ui.scroll_threshold_px, 50.0);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
