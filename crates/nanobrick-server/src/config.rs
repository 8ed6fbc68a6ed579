//! Configuration management for the NanoBrick server.
//!
//! Sources, highest precedence first:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`NANOBRICK_*`, `GOOGLE_API_KEY`, `GEMINI_*`)
//! 3. `.env` file
//! 4. YAML configuration file
//! 5. Default values

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use nanobrick_sim::MAX_QUBITS;
use serde::{Deserialize, Serialize};

/// Value shipped in the sample `.env`; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "your_google_api_key_here";

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub quantum: QuantumConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Upper bound on one `/api/optimize` run, in seconds
    #[serde(default = "default_optimize_timeout")]
    pub optimize_timeout_secs: u64,
}

/// Variational optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumConfig {
    /// Register width for every optimization request
    #[serde(default = "default_num_qubits")]
    pub num_qubits: usize,

    /// Fixed seed for the initial parameters; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Generative model settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key (set via GOOGLE_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// REST base URL, without trailing `/models/...`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_optimize_timeout() -> u64 {
    30
}

fn default_num_qubits() -> usize {
    4
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            optimize_timeout_secs: default_optimize_timeout(),
        }
    }
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            num_qubits: default_num_qubits(),
            seed: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    pub fn optimize_timeout(&self) -> Duration {
        Duration::from_secs(self.optimize_timeout_secs)
    }
}

impl LlmConfig {
    /// The API key, unless it is empty or the sample placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

impl Config {
    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration with full precedence: file, `.env`, then environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of `self`.
    pub fn merge_env(mut self) -> Self {
        if let Ok(v) = std::env::var("NANOBRICK_BIND") {
            self.server.bind_address = v;
        }
        if let Ok(v) = std::env::var("NANOBRICK_OPTIMIZE_TIMEOUT") {
            if let Ok(val) = v.parse() {
                self.server.optimize_timeout_secs = val;
            }
        }

        if let Ok(v) = std::env::var("NANOBRICK_NUM_QUBITS") {
            if let Ok(val) = v.parse() {
                self.quantum.num_qubits = val;
            }
        }
        if let Ok(v) = std::env::var("NANOBRICK_SEED") {
            if let Ok(val) = v.parse() {
                self.quantum.seed = Some(val);
            }
        }

        if let Ok(v) = std::env::var("GOOGLE_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("GEMINI_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("GEMINI_ENDPOINT") {
            self.llm.endpoint = v;
        }

        if let Ok(v) = std::env::var("NANOBRICK_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("NANOBRICK_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.server.optimize_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "optimize_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(2..=MAX_QUBITS).contains(&self.quantum.num_qubits) {
            return Err(ConfigError::ValidationError(format!(
                "num_qubits must be between 2 and {MAX_QUBITS}, got {}",
                self.quantum.num_qubits
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm model name must not be empty".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Parsed listener address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid bind address: {}",
                self.server.bind_address
            ))
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
