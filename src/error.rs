use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the simulator's boundaries: workload loading,
/// process admission, and kernel reconfiguration. The tick pipeline itself
/// never returns one of these.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid process `{name}`: {reason}")]
    Validation { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse workload: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn validation(name: &str, reason: impl Into<String>) -> SimError {
        SimError::Validation {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
