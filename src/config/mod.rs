//! Configuration for geopin
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/geopin/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

#[cfg(test)]
mod tests;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dark", "light", "radar"
    pub theme: String,

    /// Geolocation provider settings
    pub provider: ProviderConfig,

    /// Initial map viewport
    pub viewport: ViewportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Geolocation provider settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Disabled means no geolocation capability: the locate action reports
    /// failure immediately and manual placement is the only way to set a target
    pub enabled: bool,

    /// ip-api.com compatible JSON endpoint
    pub url: String,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://ip-api.com/json".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Where the map starts before any fix is acquired
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    pub initial_lat: f64,
    pub initial_lng: f64,
    /// Wide world view by default
    pub initial_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_lat: 0.0,
            initial_lng: 0.0,
            initial_zoom: 2.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level for the geopin target ("trace".."error")
    pub level: String,

    /// Also write structured JSON logs to rotating files
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,

    /// Log file name prefix
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "geopin.log".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            provider: ProviderConfig::default(),
            viewport: ViewportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure. Every field is optional so a partial file merges
/// cleanly over the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub provider: Option<FileProviderConfig>,
    pub viewport: Option<FileViewportConfig>,
    pub logging: Option<FileLoggingConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileProviderConfig {
    pub enabled: Option<bool>,
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileViewportConfig {
    pub initial_lat: Option<f64>,
    pub initial_lng: Option<f64>,
    pub initial_zoom: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileLoggingConfig {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub file_prefix: Option<String>,
}

impl Config {
    /// Path to the config file, if a config directory can be determined
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("geopin").join("config.toml"))
    }

    /// Load configuration: defaults, then file, then environment
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(file) = Self::load_file() {
            config.apply_file(file);
        }
        config.apply_env();

        config
    }

    fn load_file() -> Option<FileConfig> {
        let path = Self::config_path()?;
        let contents = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&contents) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: could not parse {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if let Some(p) = file.provider {
            if let Some(enabled) = p.enabled {
                self.provider.enabled = enabled;
            }
            if let Some(url) = p.url {
                self.provider.url = url;
            }
            if let Some(timeout) = p.timeout_secs {
                self.provider.timeout_secs = timeout;
            }
        }
        if let Some(v) = file.viewport {
            if let Some(lat) = v.initial_lat {
                self.viewport.initial_lat = lat;
            }
            if let Some(lng) = v.initial_lng {
                self.viewport.initial_lng = lng;
            }
            if let Some(zoom) = v.initial_zoom {
                self.viewport.initial_zoom = zoom;
            }
        }
        if let Some(l) = file.logging {
            if let Some(level) = l.level {
                self.logging.level = level;
            }
            if let Some(enabled) = l.file_enabled {
                self.logging.file_enabled = enabled;
            }
            if let Some(dir) = l.file_dir {
                self.logging.file_dir = dir;
            }
            if let Some(prefix) = l.file_prefix {
                self.logging.file_prefix = prefix;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(theme) = std::env::var("GEOPIN_THEME") {
            self.theme = theme;
        }
        if let Ok(url) = std::env::var("GEOPIN_PROVIDER_URL") {
            self.provider.url = url;
        }
        if std::env::var("GEOPIN_OFFLINE").is_ok() {
            self.provider.enabled = false;
        }
        if let Ok(level) = std::env::var("GEOPIN_LOG") {
            self.logging.level = level;
        }
    }

    /// Serialize the configuration as a commented TOML template.
    /// This is the single source of truth for the generated config file.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# geopin configuration
# Generated by geopin v{version}. Delete a line to fall back to the default.

# Theme: "dark", "light", "radar"
theme = "{theme}"

[provider]
# Set to false to run without geolocation (manual placement only)
enabled = {enabled}
# ip-api.com compatible JSON endpoint
url = "{url}"
timeout_secs = {timeout}

[viewport]
initial_lat = {lat}
initial_lng = {lng}
initial_zoom = {zoom}

[logging]
# trace, debug, info, warn, error
level = "{level}"
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_prefix = "{file_prefix}"
"#,
            version = VERSION,
            theme = self.theme,
            enabled = self.provider.enabled,
            url = self.provider.url,
            timeout = self.provider.timeout_secs,
            lat = self.viewport.initial_lat,
            lng = self.viewport.initial_lng,
            zoom = self.viewport.initial_zoom,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
            file_prefix = self.logging.file_prefix,
        )
    }

    /// Write the default config template if no config file exists yet.
    /// Helps users discover the available options.
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        // Best effort; a read-only home directory is not fatal
        let _ = std::fs::write(&path, Config::default().to_toml());
    }
}
