//! Service configuration with TOML file support.

use std::path::PathBuf;
use std::sync::Arc;

use datafutures_authorization::AuthorizationScope;
use datafutures_crypto::{MarkerCodec, SealedCodec, ValueCodec};
use datafutures_index::IndexOptions;
use datafutures_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Which value codec protects stored values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// `FHE-` + base64 of the decimal text. Not confidential.
    #[default]
    Marker,
    /// ChaCha20-Poly1305 under a key derived from `codec_secret`.
    Sealed,
}

/// Configuration for a future service instance.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Store instance that reveal authorizations are scoped to.
    #[serde(default)]
    pub contract_address: String,

    /// Network id that reveal authorizations are scoped to.
    #[serde(default)]
    pub chain_id: u64,

    /// Validity window of one authorization session.
    #[serde(default = "default_thirty_days")]
    pub authorization_duration_days: u64,

    /// Lifetime for new futures created without one, and for stored
    /// records that carry no `expiryDate`.
    #[serde(default = "default_thirty_days")]
    pub default_expiry_days: u64,

    /// Read-modify-write rounds an index append may take.
    #[serde(default = "default_append_attempts")]
    pub index_append_attempts: u32,

    #[serde(default)]
    pub codec: CodecKind,

    /// Hex secret for the sealed codec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_secret: Option<String>,

    /// Verify the reveal signature and window before decoding.
    #[serde(default)]
    pub verify_signatures: bool,

    /// Data directory for the record store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_thirty_days() -> u64 {
    30
}

fn default_append_attempts() -> u32 {
    3
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./datafutures_data")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ServiceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ServiceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    pub fn scope(&self) -> AuthorizationScope {
        AuthorizationScope {
            contract_address: self.contract_address.clone(),
            chain_id: self.chain_id,
        }
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            default_expiry_days: self.default_expiry_days,
            append_attempts: self.index_append_attempts.max(1),
        }
    }

    /// Instantiate the configured value codec.
    pub fn build_codec(&self) -> Result<Arc<dyn ValueCodec>, ServiceError> {
        match self.codec {
            CodecKind::Marker => Ok(Arc::new(MarkerCodec)),
            CodecKind::Sealed => {
                let secret = self.codec_secret.as_deref().ok_or_else(|| {
                    ServiceError::Config("codec = \"sealed\" requires codec_secret".into())
                })?;
                Ok(Arc::new(SealedCodec::from_hex(secret)?))
            }
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            chain_id: 0,
            authorization_duration_days: default_thirty_days(),
            default_expiry_days: default_thirty_days(),
            index_append_attempts: default_append_attempts(),
            codec: CodecKind::default(),
            codec_secret: None,
            verify_signatures: false,
            data_dir: default_data_dir(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServiceConfig {
            contract_address: "0xC0FFEE".into(),
            chain_id: 8009,
            ..ServiceConfig::default()
        };
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = ServiceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.contract_address, "0xC0FFEE");
        assert_eq!(parsed.chain_id, 8009);
        assert_eq!(parsed.codec, CodecKind::Marker);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.authorization_duration_days, 30);
        assert_eq!(config.default_expiry_days, 30);
        assert_eq!(config.index_append_attempts, 3);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
        assert!(!config.verify_signatures);
        assert_eq!(config.data_dir, PathBuf::from("./datafutures_data"));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            chain_id = 11155111
            codec = "sealed"
            codec_secret = "00112233"
            log_format = "json"
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.codec, CodecKind::Sealed);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_expiry_days, 30); // default
        assert_eq!(config.build_codec().unwrap().name(), "sealed");
    }

    #[test]
    fn sealed_without_secret_is_a_config_error() {
        let config = ServiceConfig {
            codec: CodecKind::Sealed,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.build_codec(), Err(ServiceError::Config(_))));
    }

    #[test]
    fn unknown_codec_rejected() {
        assert!(ServiceConfig::from_toml_str(r#"codec = "rot13""#).is_err());
    }

    #[test]
    fn zero_append_attempts_still_tries_once() {
        let config = ServiceConfig {
            index_append_attempts: 0,
            ..ServiceConfig::default()
        };
        assert_eq!(config.index_options().append_attempts, 1);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = ServiceConfig::from_toml_file("/nonexistent/datafutures.toml");
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }
}
