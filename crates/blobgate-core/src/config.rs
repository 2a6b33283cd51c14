//! Gateway configuration.
//!
//! Provides [`GatewayConfig`], loaded from environment variables by
//! [`GatewayConfig::from_env`] or assembled with its builder.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default bind address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";

/// Default owner id and display name reported by `ListBuckets`.
pub const DEFAULT_OWNER: &str = "blobgate";

/// Default upper bound for a single object body (5 GiB).
pub const DEFAULT_MAX_OBJECT_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("text") {
            Some(Self::Text)
        } else if value.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Gateway configuration.
///
/// # Examples
///
/// ```
/// use blobgate_core::config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8000");
/// assert_eq!(config.owner_id, "blobgate");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address for the gateway.
    #[builder(default = String::from(DEFAULT_LISTEN))]
    pub gateway_listen: String,

    /// Log level filter used when `RUST_LOG` is unset.
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Log output format.
    #[builder(default)]
    pub log_format: LogFormat,

    /// Owner id reported in bucket listings.
    #[builder(default = String::from(DEFAULT_OWNER))]
    pub owner_id: String,

    /// Owner display name reported in bucket listings.
    #[builder(default = String::from(DEFAULT_OWNER))]
    pub owner_display_name: String,

    /// Largest accepted object body in bytes.
    #[builder(default = DEFAULT_MAX_OBJECT_SIZE)]
    pub max_object_size: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8000` |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOG_FORMAT` | `text` |
    /// | `OWNER_ID` | `blobgate` |
    /// | `OWNER_DISPLAY_NAME` | `blobgate` |
    /// | `MAX_OBJECT_SIZE` | `5368709120` |
    ///
    /// Values that do not parse keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(format) = lookup("LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
            config.log_format = format;
        }
        if let Some(v) = lookup("OWNER_ID") {
            config.owner_id = v;
        }
        if let Some(v) = lookup("OWNER_DISPLAY_NAME") {
            config.owner_display_name = v;
        }
        if let Some(n) = lookup("MAX_OBJECT_SIZE").and_then(|v| v.parse::<u64>().ok()) {
            config.max_object_size = n;
        }

        config
    }
}
