//! Mesh Agent Prelude
//!
//! The types needed to resolve agents and issue calls through them.

pub use crate::agent::{Agent, AgentBody, AgentKind, AgentSelector};
pub use crate::config::{ClientCertificate, ConnectionOptions};
pub use crate::error::{AbortReason, Error, Kind, Result};
pub use crate::fetch::{FetchOptions, fetch_with_timeout};
pub use crate::proxy::NoProxy;

pub use tokio_util::sync::CancellationToken;

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
