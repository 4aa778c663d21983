//! Configuration module for the metadata portal.

use crate::error::{PortalError, Result};
use crate::lineage::DEFAULT_CHANGE_REF_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main portal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Persisted state location.
    pub storage: StorageConfig,
    /// Backend behaviour.
    pub backend: BackendConfig,
    /// Lineage numbering.
    pub lineage: LineageConfig,
    /// Dashboard statistics.
    pub stats: StatsConfig,
    /// Logging.
    pub observability: ObservabilityConfig,
}

impl PortalConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PortalError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            PortalError::Config(format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(PortalError::InvalidConfig {
                field: "storage.data_dir".to_string(),
                reason: "Data directory must be set".to_string(),
            });
        }

        let prefix = self.lineage.change_ref_prefix.trim();
        if prefix.is_empty() || prefix.ends_with('-') {
            return Err(PortalError::InvalidConfig {
                field: "lineage.change_ref_prefix".to_string(),
                reason: "Prefix must be non-empty and must not end with '-'".to_string(),
            });
        }

        if self.stats.recent_window.is_zero() {
            return Err(PortalError::InvalidConfig {
                field: "stats.recent_window".to_string(),
                reason: "Recent change window must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Create a minimal development configuration.
    pub fn development() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("/tmp/metaportal/state"),
            },
            backend: BackendConfig {
                latency: Duration::ZERO,
                offline: false,
            },
            lineage: LineageConfig::default(),
            stats: StatsConfig::default(),
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: false,
            },
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<key>.json` file per persisted key.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./metaportal-data"),
        }
    }
}

/// Simulated backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Delay before each acknowledgement.
    #[serde(with = "humantime_serde")]
    pub latency: Duration,
    /// Reject every call.
    #[serde(default)]
    pub offline: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
            offline: false,
        }
    }
}

/// Lineage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Change references are issued as `<prefix>-NNN`.
    pub change_ref_prefix: String,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            change_ref_prefix: DEFAULT_CHANGE_REF_PREFIX.to_string(),
        }
    }
}

/// Statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// How far back a change counts as recent.
    #[serde(with = "humantime_serde")]
    pub recent_window: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            recent_window: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    pub log_level: String,
    /// Enable JSON logging.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Serde helper for Duration using humantime format.
pub mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let (value, unit_secs) = if let Some(ms) = s.strip_suffix("ms") {
            return ms.parse::<u64>().map(Duration::from_millis).map_err(|e| e.to_string());
        } else if let Some(v) = s.strip_suffix('s') {
            (v, 1)
        } else if let Some(v) = s.strip_suffix('m') {
            (v, 60)
        } else if let Some(v) = s.strip_suffix('h') {
            (v, 60 * 60)
        } else if let Some(v) = s.strip_suffix('d') {
            (v, 24 * 60 * 60)
        } else {
            return s.parse::<u64>().map(Duration::from_millis).map_err(|e| e.to_string());
        };
        value
            .parse::<u64>()
            .map(|v| Duration::from_secs(v * unit_secs))
            .map_err(|e| e.to_string())
    }
}
