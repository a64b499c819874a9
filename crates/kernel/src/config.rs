use serde::{Deserialize, Serialize};

/// Tunables for a [`FileRegistry`](crate::FileRegistry).
///
/// Every field has a default, so a partial document deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Initial bucket count of the filename index.
    pub file_buckets: usize,
    /// Initial bucket count of each file's version-id index.
    pub version_buckets: usize,
    /// Load factor above which a keyed store doubles its buckets.
    pub max_load_factor: f64,
    /// Label given to the root snapshot of every new file.
    pub root_message: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            file_buckets: 16,
            version_buckets: 16,
            max_load_factor: 0.75,
            root_message: "Initial version".into(),
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroBuckets { field: &'static str },
    #[error("max_load_factor must be a positive finite number, got {0}")]
    InvalidLoadFactor(f64),
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_buckets == 0 {
            return Err(ConfigError::ZeroBuckets {
                field: "file_buckets",
            });
        }
        if self.version_buckets == 0 {
            return Err(ConfigError::ZeroBuckets {
                field: "version_buckets",
            });
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}
