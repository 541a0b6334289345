//! TLS material for https origins and https proxies
//!
//! Builds rustls client configurations from PEM strings. Roots come from the
//! configured `ca` when present, otherwise from the platform store with the
//! bundled webpki roots as fallback.

pub mod config;
pub mod errors;
mod verifier;

pub use config::{TlsSettings, client_config, server_name};
pub use errors::TlsError;
