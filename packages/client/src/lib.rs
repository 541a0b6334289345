//! # Mesh Agent Client
//!
//! Resolves and caches pooled connection managers ("agents") for outbound
//! HTTP/HTTPS requests. An agent is either a direct keep-alive pool or one
//! that reaches the origin through an HTTP, HTTPS or SOCKS proxy.
//!
//! ## Features
//!
//! - **Proxy bypass** with dot-aligned host suffix rules (`noProxy`)
//! - **Scheme-aware proxy selection** (`httpProxy` for `http`, `httpsProxy` otherwise)
//! - **LRU agent caches** keyed by the settings that decide pool identity
//! - **Per-registry client certificates** overriding global TLS material
//! - **Rustls TLS** with native root certificates
//! - **Timeout and cancellation** for single calls
//!
//! ## Usage
//!
//! ```no_run
//! use mesh_agent_client::{AgentSelector, ConnectionOptions};
//!
//! let selector = AgentSelector::new();
//! let options = ConnectionOptions {
//!     https_proxy: Some("http://proxy.local:8080".to_owned()),
//!     no_proxy: Some("example.com".into()),
//!     ..ConnectionOptions::default()
//! };
//! let agent = selector.get_agent("https://registry.npmjs.org/pkg", &options)?;
//! println!("{:?}", agent.kind());
//! # Ok::<(), mesh_agent_client::Error>(())
//! ```

#![deny(unsafe_code)]

pub mod agent;
pub mod cache;
pub mod config;
pub mod connect;
pub mod error;
pub mod fetch;
pub mod prelude;
pub mod proxy;
pub mod tls;

pub use agent::{
    Agent, AgentBody, AgentKind, AgentSelector, AgentSettings, DirectAgentFactory, ProxyAgentFactory,
    SelectorStats, skew_timeout,
};
pub use cache::{AgentCache, CacheKey, CacheStatsSnapshot, DEFAULT_CAPACITY};
pub use config::{
    CertificateSelector, ClientCertificate, ConfigurationError, ConnectionOptions,
    DEFAULT_MAX_SOCKETS, LongestPrefixSelector,
};
pub use error::{AbortReason, Error, Kind, Result};
pub use fetch::{DEFAULT_FETCH_TIMEOUT_MS, FetchOptions, FetchResponse, fetch_with_timeout};
pub use proxy::{NoProxy, ResolvedProxy, bypass, resolve_proxy_uri};
pub use tls::{TlsError, TlsSettings};

pub use tokio_util::sync::CancellationToken;
