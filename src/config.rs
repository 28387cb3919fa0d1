//! # Configuration Management
//!
//! Wire constants and runtime configuration for the inform decoder.
//!
//! The constants describe the fixed wire format and are not configurable.
//! [`InformConfig`] carries the knobs a caller may reasonably tune: size
//! ceilings that bound how much memory an attacker-chosen length may claim,
//! the controller's authkey, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variables via `from_env()`

use crate::error::{InformError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;
use zeroize::Zeroizing;

/// Magic bytes every inform packet starts with
pub const MAGIC_BYTES: [u8; 4] = *b"UBNT";

/// Width of the hardware address field
pub const DEVICE_ID_LEN: usize = 6;

/// Width of the AES initialization vector field
pub const IV_LEN: usize = 16;

/// AES-128 key size
pub const AES_KEY_LEN: usize = 16;

/// AES block size; ciphertext lengths must be a multiple of it
pub const AES_BLOCK_SIZE: usize = 16;

/// Bytes following the Snappy stream inside a compressed payload
pub const SNAPPY_TRAILER_LEN: usize = 10;

/// Max allowed declared payload length (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Max allowed payload size after decompression (64 MB)
pub const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Factory authkey of devices that have not been adopted yet (hex)
pub const DEFAULT_AUTHKEY: &str = "ba86f2bbe107c7c57eb5f2690775c712";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InformConfig {
    /// Decoder limits and key material
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl InformConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| InformError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| InformError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| InformError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("INFORM_MAX_PAYLOAD_SIZE") {
            config.decoder.max_payload_size = size.parse::<usize>().map_err(|e| {
                InformError::ConfigError(format!("Invalid INFORM_MAX_PAYLOAD_SIZE: {e}"))
            })?;
        }

        if let Ok(size) = std::env::var("INFORM_MAX_DECOMPRESSED_SIZE") {
            config.decoder.max_decompressed_size = size.parse::<usize>().map_err(|e| {
                InformError::ConfigError(format!("Invalid INFORM_MAX_DECOMPRESSED_SIZE: {e}"))
            })?;
        }

        if let Ok(key) = std::env::var("INFORM_AUTHKEY") {
            config.decoder.authkey = Some(key);
        }

        if let Ok(level) = std::env::var("INFORM_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| InformError::ConfigError(format!("Invalid log level: {level}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| InformError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| InformError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.decoder.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(InformError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Decoder limits and key material
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecoderConfig {
    /// Largest declared payload length accepted before allocation
    pub max_payload_size: usize,

    /// Largest Snappy output accepted
    pub max_decompressed_size: usize,

    /// Hex encoded AES-128 authkey; `None` means the factory default key
    #[serde(default)]
    pub authkey: Option<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            max_decompressed_size: MAX_DECOMPRESSED_SIZE,
            authkey: None,
        }
    }
}

impl DecoderConfig {
    /// Decode the configured authkey into raw key bytes.
    ///
    /// Falls back to [`DEFAULT_AUTHKEY`] when no key is configured. The
    /// returned buffer is wiped on drop.
    pub fn key(&self) -> Result<Zeroizing<Vec<u8>>> {
        let encoded = self.authkey.as_deref().unwrap_or(DEFAULT_AUTHKEY);
        let key = Zeroizing::new(
            hex::decode(encoded.trim())
                .map_err(|e| InformError::ConfigError(format!("Invalid authkey hex: {e}")))?,
        );
        if key.len() != AES_KEY_LEN {
            return Err(InformError::InvalidKey);
        }
        Ok(key)
    }

    /// Validate decoder configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_payload_size == 0 {
            errors.push("Max payload size cannot be 0".to_string());
        } else if self.max_payload_size > u32::MAX as usize {
            errors.push(format!(
                "Max payload size too large: {} bytes (the length field is 32 bits)",
                self.max_payload_size
            ));
        }

        if self.max_decompressed_size == 0 {
            errors.push("Max decompressed size cannot be 0".to_string());
        }

        if let Some(ref key) = self.authkey {
            match hex::decode(key.trim()) {
                Ok(bytes) if bytes.len() == AES_KEY_LEN => {}
                Ok(bytes) => errors.push(format!(
                    "Authkey must be {AES_KEY_LEN} bytes, got {}",
                    bytes.len()
                )),
                Err(e) => errors.push(format!("Authkey is not valid hex: {e}")),
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("inform-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
