//! TLS-specific error types

/// Errors raised while turning PEM material into a TLS client configuration
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Certificate parsing failed: {0}")]
    CertificateParsing(String),
    #[error("Private key parsing failed: {0}")]
    PrivateKey(String),
    #[error("Invalid server name: {0}")]
    ServerName(String),
    #[error("TLS configuration rejected: {0}")]
    Config(#[from] rustls::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
