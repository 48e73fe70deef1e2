//! Client configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via SDCP_CONFIG or --config)
//! 3. Environment variables

use sdcp_protocol::{Community, Item, Model, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default connect timeout (5 s).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default per-read poll interval (100 ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default budget for a whole response (3.5 s).
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 3_500;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection settings.
    pub connection: ConnectorConfig,
    /// Features supported by the projector model.
    pub capabilities: Capabilities,
}

impl Config {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("SDCP_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        config.resolve_model()?;
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.connection.apply_env_overrides();
        if self.connection.model.is_some() {
            if let Err(e) = self.resolve_model() {
                tracing::warn!("{}, keeping configured capabilities", e);
            }
        }
    }

    /// Replaces the capabilities with those of the named model.
    ///
    /// `connection.model` wins over `capabilities.model`. Without either,
    /// the capabilities stay as configured.
    pub fn resolve_model(&mut self) -> Result<(), ConfigError> {
        let Some(name) = self
            .connection
            .model
            .clone()
            .or_else(|| self.capabilities.model.clone())
        else {
            return Ok(());
        };
        let model = Model::from_name(&name).ok_or(ConfigError::UnknownModel(name))?;
        tracing::debug!("Using capabilities of {}", model);
        self.capabilities = Capabilities::from_model(&model);
        Ok(())
    }
}

/// Connection settings for one projector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Host name or IP address of the projector.
    pub host: String,
    /// SDCP port.
    pub port: u16,
    /// Community string; invalid values fall back to "SONY".
    pub community: String,
    /// Bound on establishing the TCP connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Bound on a single socket read, in milliseconds.
    pub poll_interval_ms: u64,
    /// Bound on accumulating a whole response, in milliseconds.
    pub response_timeout_ms: u64,
    /// Projector model name, e.g. "VPL-VW520".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            community: "SONY".to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            model: None,
        }
    }
}

impl ConnectorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// `host:port` as passed to the socket layer.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The community to put in frames.
    pub fn community(&self) -> Community {
        match self.community.parse() {
            Ok(community) => community,
            Err(_) => {
                tracing::warn!(
                    "Invalid community {:?}, falling back to default",
                    self.community
                );
                Community::default()
            }
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Never zero, so a read always yields to the runtime.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SDCP_HOST") {
            self.host = host;
        }

        if let Ok(port) = std::env::var("SDCP_PORT") {
            if let Ok(parsed) = port.parse() {
                self.port = parsed;
            }
        }

        if let Ok(community) = std::env::var("SDCP_COMMUNITY") {
            self.community = community;
        }

        if let Ok(model) = std::env::var("SDCP_MODEL") {
            self.model = Some(model);
        }

        if let Ok(ms) = std::env::var("SDCP_CONNECT_TIMEOUT_MS") {
            if let Ok(parsed) = ms.parse() {
                self.connect_timeout_ms = parsed;
            }
        }

        if let Ok(ms) = std::env::var("SDCP_POLL_INTERVAL_MS") {
            if let Ok(parsed) = ms.parse() {
                self.poll_interval_ms = parsed;
            }
        }

        if let Ok(ms) = std::env::var("SDCP_RESPONSE_TIMEOUT_MS") {
            if let Ok(parsed) = ms.parse() {
                self.response_timeout_ms = parsed;
            }
        }
    }
}

/// Optional features of the projector model.
///
/// Older models lack some picture settings and the direct power command;
/// gated items are refused locally instead of being sent. Naming a `model`
/// derives every flag from the model table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Power can be switched with the power item rather than IR codes.
    pub power_command: bool,
    pub film_mode: bool,
    pub lamp_control: bool,
    pub picture_position: bool,
    pub overscan: bool,
    pub iris_mode: bool,
    pub iris_manual: bool,
    pub iris_sensitivity: bool,
    pub block_nr: bool,
    pub mosquito_nr: bool,
    pub mpeg_nr: bool,
    pub xvcolor: bool,
    pub film_projection: bool,
    pub motion_enhancer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            model: None,
            power_command: true,
            film_mode: true,
            lamp_control: true,
            picture_position: true,
            overscan: true,
            iris_mode: true,
            iris_manual: true,
            iris_sensitivity: true,
            block_nr: true,
            mosquito_nr: true,
            mpeg_nr: true,
            xvcolor: true,
            film_projection: true,
            motion_enhancer: true,
        }
    }
}

impl Capabilities {
    pub fn from_model(model: &Model) -> Self {
        Self {
            model: Some(model.name.to_string()),
            power_command: model.power_command,
            film_mode: model.supports(&Item::FILM_MODE),
            lamp_control: model.supports(&Item::LAMP_CONTROL),
            picture_position: model.supports(&Item::PICTURE_POSITION),
            overscan: model.supports(&Item::OVERSCAN),
            iris_mode: model.supports(&Item::IRIS_MODE),
            iris_manual: model.supports(&Item::IRIS_MANUAL),
            iris_sensitivity: model.supports(&Item::IRIS_SENSITIVITY),
            block_nr: model.supports(&Item::BLOCK_NR),
            mosquito_nr: model.supports(&Item::MOSQUITO_NR),
            mpeg_nr: model.supports(&Item::MPEG_NR),
            xvcolor: model.supports(&Item::XVCOLOR),
            film_projection: model.supports(&Item::FILM_PROJECTION),
            motion_enhancer: model.supports(&Item::MOTION_ENHANCER),
        }
    }

    /// The model these capabilities were derived from, if it is known.
    pub fn model(&self) -> Option<Model> {
        self.model.as_deref().and_then(Model::from_name)
    }

    /// Returns whether `item` can be addressed on this model.
    pub fn supports(&self, item: &Item) -> bool {
        if let Some(model) = self.model() {
            if !model.supports(item) {
                return false;
            }
        }
        let gates = [
            (Item::FILM_MODE, self.film_mode),
            (Item::LAMP_CONTROL, self.lamp_control),
            (Item::PICTURE_POSITION, self.picture_position),
            (Item::OVERSCAN, self.overscan),
            (Item::IRIS_MODE, self.iris_mode),
            (Item::IRIS_MANUAL, self.iris_manual),
            (Item::IRIS_SENSITIVITY, self.iris_sensitivity),
            (Item::BLOCK_NR, self.block_nr),
            (Item::MOSQUITO_NR, self.mosquito_nr),
            (Item::MPEG_NR, self.mpeg_nr),
            (Item::XVCOLOR, self.xvcolor),
            (Item::FILM_PROJECTION, self.film_projection),
            (Item::MOTION_ENHANCER, self.motion_enhancer),
        ];
        gates
            .iter()
            .find(|(gated, _)| gated.code == item.code)
            .map_or(true, |(_, supported)| *supported)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    IoError(PathBuf, std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),

    #[error("unknown projector model {0:?}")]
    UnknownModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connection.port, 53484);
        assert_eq!(config.connection.community(), Community::default());
        assert_eq!(config.connection.poll_interval(), Duration::from_millis(100));
        assert_eq!(
            config.connection.response_timeout(),
            Duration::from_millis(3500)
        );
        assert!(config.capabilities.power_command);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
connection:
  host: 192.168.1.50
  community: PROJ
  response_timeout_ms: 2000
capabilities:
  power_command: false
  film_mode: false
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.connection.addr(), "192.168.1.50:53484");
        assert_eq!(config.connection.community().as_bytes(), b"PROJ");
        assert_eq!(
            config.connection.response_timeout(),
            Duration::from_millis(2000)
        );
        assert_eq!(config.connection.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert!(!config.capabilities.power_command);
        assert!(!config.capabilities.film_mode);
        assert!(config.capabilities.overscan);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/sdcp.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(_, _))));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "connection: [not, a, map]").unwrap();
        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_, _))));
    }

    #[test]
    fn test_invalid_community_falls_back() {
        let config = ConnectorConfig::new("projector").with_community("TOOLONG");
        assert_eq!(config.community(), Community::default());
    }

    #[test]
    fn test_capability_gates() {
        let capabilities = Capabilities {
            overscan: false,
            ..Capabilities::default()
        };
        assert!(!capabilities.supports(&Item::OVERSCAN));
        assert!(capabilities.supports(&Item::CONTRAST));
        assert!(Capabilities::default().supports(&Item::OVERSCAN));
    }

    #[test]
    fn test_model_capabilities() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
capabilities:
  model: VPL-HW45ES
  overscan: true
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let capabilities = &config.capabilities;
        assert_eq!(capabilities.model().unwrap().name, "VPL-HW45ES");
        assert!(!capabilities.power_command);
        assert!(!capabilities.overscan);
        assert!(!capabilities.picture_position);
        assert!(!capabilities.supports(&Item::OVERSCAN));
        assert!(capabilities.supports(&Item::MOTION_ENHANCER));
    }

    #[test]
    fn test_connection_model_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
connection:
  host: 192.168.1.50
  model: vw1000es
capabilities:
  model: VPL-HW45ES
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.capabilities.model.as_deref(),
            Some("VPL-VW1000ES")
        );
        assert!(!config.capabilities.power_command);
    }

    #[test]
    fn test_unknown_model() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  model: VPL-XX1").unwrap();
        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnknownModel(name)) if name == "VPL-XX1"));
    }

    #[test]
    fn test_builder() {
        let config = ConnectorConfig::new("10.0.0.7")
            .with_port(1234)
            .with_poll_interval(Duration::ZERO)
            .with_response_timeout(Duration::from_secs(1));
        assert_eq!(config.addr(), "10.0.0.7:1234");
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.response_timeout_ms, 1000);
    }
}
