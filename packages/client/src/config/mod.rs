//! Connection options
//!
//! Typed input to agent resolution: proxy settings, bypass rule, TLS
//! material, pool limits and per-registry client certificates. Options can
//! be built in code, parsed from JSON, or seeded from the environment.

pub mod certificates;
pub mod env;
pub mod options;
pub mod validation;

pub use certificates::{CertificateSelector, LongestPrefixSelector};
pub use options::{ClientCertificate, ConnectionOptions, DEFAULT_MAX_SOCKETS};
pub use validation::{ConfigResult, ConfigurationError};
