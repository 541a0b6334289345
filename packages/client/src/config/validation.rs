//! Loading and validating connection options

use super::options::ConnectionOptions;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

impl ConnectionOptions {
    /// Parse options from a camelCase JSON document and validate them.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON or wrongly typed fields (including
    /// an unparsable `localAddress`) and `InvalidParameter` when
    /// [`validate`](Self::validate) rejects the result.
    pub fn from_json(document: &str) -> ConfigResult<Self> {
        let options: ConnectionOptions = serde_json::from_str(document)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject options that can never produce a working agent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a client certificate entry with an
    /// empty certificate or key.
    pub fn validate(&self) -> ConfigResult<()> {
        for (prefix, entry) in &self.client_certificates {
            if entry.cert.trim().is_empty() || entry.key.trim().is_empty() {
                return Err(ConfigurationError::InvalidParameter(format!(
                    "client certificate for '{prefix}' needs both cert and key"
                )));
            }
        }
        Ok(())
    }
}
