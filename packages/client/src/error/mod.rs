//! Error types for agent resolution and outbound calls
//!
//! Every error carries a stable numeric code, a short note and, where it
//! applies, the offending value (`link`) and a remediation hint.

pub mod constructors;
pub mod types;

pub use constructors::{BoxError, aborted, invalid_proxy_url, invalid_url, request};
pub use types::{AbortReason, ERROR_HOST, Error, Kind, Result};
