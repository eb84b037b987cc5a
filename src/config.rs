//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values take the defaults
//! below.
//!
//! ```toml
//! [viewer]
//! skin = "psx"
//! deadzone = 0.25
//! fragment = ""
//!
//! [skins]
//! source = "."
//!
//! [render]
//! frame_rate_hz = 60
//!
//! [input]
//! rescan_interval_ms = 1000
//! device_paths = []
//!
//! [output]
//! path = "gamergrip.html"
//! interval_ms = 100
//! state_path = "gamergrip.state"
//!
//! [logging]
//! dir = ""
//! file_prefix = "gamergrip.log"
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::skin::catalog::SkinCatalog;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub skins: SkinsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Starting values for the viewer options
#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    #[serde(default = "default_skin")]
    pub skin: String,

    #[serde(default = "default_deadzone")]
    pub deadzone: f32,

    /// Fragment applied at startup, e.g. `#!skin=nes_jp`
    #[serde(default)]
    pub fragment: String,
}

/// Where skin assets come from
#[derive(Debug, Deserialize, Clone)]
pub struct SkinsConfig {
    /// Directory or `http(s)://` base URL containing `skins/`
    #[serde(default = "default_skins_source")]
    pub source: String,
}

/// Render loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
}

/// Gamepad discovery configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_rescan_interval_ms")]
    pub rescan_interval_ms: u64,

    /// Explicit event nodes; empty scans `/dev/input`
    #[serde(default)]
    pub device_paths: Vec<String>,
}

/// Rendered page output
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,

    #[serde(default = "default_output_interval_ms")]
    pub interval_ms: u64,

    /// File remembering the last fragment across restarts; empty disables
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

/// Log file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for daily log files; empty logs to stderr
    #[serde(default)]
    pub dir: String,

    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
}

// Default value functions
fn default_skin() -> String { crate::options::DEFAULT_SKIN.to_string() }
fn default_deadzone() -> f32 { crate::options::DEFAULT_DEADZONE }

fn default_skins_source() -> String { ".".to_string() }

fn default_frame_rate_hz() -> u32 { 60 }

fn default_rescan_interval_ms() -> u64 { 1000 }

fn default_output_path() -> String { "gamergrip.html".to_string() }
fn default_output_interval_ms() -> u64 { 100 }
fn default_state_path() -> String { "gamergrip.state".to_string() }

fn default_log_file_prefix() -> String { "gamergrip.log".to_string() }

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            skin: default_skin(),
            deadzone: default_deadzone(),
            fragment: String::new(),
        }
    }
}

impl Default for SkinsConfig {
    fn default() -> Self {
        Self { source: default_skins_source() }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { frame_rate_hz: default_frame_rate_hz() }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rescan_interval_ms: default_rescan_interval_ms(),
            device_paths: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            interval_ms: default_output_interval_ms(),
            state_path: default_state_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            file_prefix: default_log_file_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamergrip::config::Config;
    ///
    /// let config = Config::load("gamergrip.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate viewer defaults
        if !SkinCatalog::builtin().accepts(&self.viewer.skin) {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom(format!("unknown skin '{}'", self.viewer.skin))
            ));
        }

        if !self.viewer.deadzone.is_finite()
            || self.viewer.deadzone < 0.0
            || self.viewer.deadzone >= 1.0
        {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("deadzone must be at least 0.0 and below 1.0")
            ));
        }

        // Validate skin source
        if self.skins.source.is_empty() {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("skins source cannot be empty")
            ));
        }

        // Validate timing fields
        if self.render.frame_rate_hz == 0 || self.render.frame_rate_hz > 240 {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("frame_rate_hz must be between 1 and 240")
            ));
        }

        if self.input.rescan_interval_ms == 0 || self.input.rescan_interval_ms > 60000 {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("rescan_interval_ms must be between 1 and 60000")
            ));
        }

        if self.output.interval_ms == 0 || self.output.interval_ms > 60000 {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("output interval_ms must be between 1 and 60000")
            ));
        }

        // Validate output and logging paths
        if self.output.path.is_empty() {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("output path cannot be empty")
            ));
        }

        if !self.logging.dir.is_empty() && self.logging.file_prefix.is_empty() {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("logging file_prefix cannot be empty when dir is set")
            ));
        }

        if self.input.device_paths.iter().any(|p| p.is_empty()) {
            return Err(crate::error::GamerGripError::Config(
                toml::de::Error::custom("device_paths entries cannot be empty")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.viewer.skin, "psx");
        assert_eq!(config.viewer.deadzone, 0.25);
        assert_eq!(config.render.frame_rate_hz, 60);
        assert!(config.input.device_paths.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r##"
[viewer]
skin = "nes_jp"
fragment = "#!deadzone=0.1"

[skins]
source = "https://example.com/gamergrip"

[input]
device_paths = ["/dev/input/event7"]

[output]
path = "/tmp/pad.html"
"##;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.viewer.skin, "nes_jp");
        assert_eq!(config.viewer.fragment, "#!deadzone=0.1");
        assert_eq!(config.skins.source, "https://example.com/gamergrip");
        assert_eq!(config.input.device_paths, vec!["/dev/input/event7"]);
        assert_eq!(config.output.path, "/tmp/pad.html");
        assert_eq!(config.output.interval_ms, 100);
        assert_eq!(config.output.state_path, "gamergrip.state");
    }

    #[test]
    fn test_state_path_can_be_disabled() {
        let config = Config::from_toml("[output]\nstate_path = \"\"\n").unwrap();
        assert!(config.output.state_path.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/gamergrip.toml").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(Config::from_toml("[viewer\nskin = ").is_err());
    }

    #[test]
    fn test_unknown_skin() {
        let mut config = create_valid_config();
        config.viewer.skin = "xbox".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_style() {
        let mut config = create_valid_config();
        config.viewer.skin = "psx_jp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_negative() {
        let mut config = create_valid_config();
        config.viewer.deadzone = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_one() {
        let mut config = create_valid_config();
        config.viewer.deadzone = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_nan() {
        let mut config = create_valid_config();
        config.viewer.deadzone = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_zero_is_valid() {
        let mut config = create_valid_config();
        config.viewer.deadzone = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_skins_source() {
        let mut config = create_valid_config();
        config.skins.source = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_rate_zero() {
        let mut config = create_valid_config();
        config.render.frame_rate_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_rate_too_high() {
        let mut config = create_valid_config();
        config.render.frame_rate_hz = 241;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rescan_interval_zero() {
        let mut config = create_valid_config();
        config.input.rescan_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rescan_interval_too_high() {
        let mut config = create_valid_config();
        config.input.rescan_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_interval_zero() {
        let mut config = create_valid_config();
        config.output.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_output_path() {
        let mut config = create_valid_config();
        config.output.path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_prefix_with_dir() {
        let mut config = create_valid_config();
        config.logging.dir = "./logs".to_string();
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_prefix_without_dir() {
        let mut config = create_valid_config();
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_device_path_entry() {
        let mut config = create_valid_config();
        config.input.device_paths = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_skin(), "psx");
        assert_eq!(default_deadzone(), 0.25);
        assert_eq!(default_skins_source(), ".");
        assert_eq!(default_frame_rate_hz(), 60);
        assert_eq!(default_rescan_interval_ms(), 1000);
        assert_eq!(default_output_path(), "gamergrip.html");
        assert_eq!(default_output_interval_ms(), 100);
        assert_eq!(default_log_file_prefix(), "gamergrip.log");
    }
}
