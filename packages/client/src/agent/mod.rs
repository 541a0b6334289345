//! Agents: pooled connection managers and their resolution
//!
//! An [`Agent`] owns a keep-alive pool for one effective configuration. The
//! [`AgentSelector`] decides between a proxy agent and a direct agent for a
//! target and returns the cached instance for its configuration.

pub mod direct;
pub mod proxy;
pub mod selector;
pub mod types;

pub use direct::DirectAgentFactory;
pub use proxy::ProxyAgentFactory;
pub use selector::{AgentSelector, SelectorStats};
pub use types::{Agent, AgentBody, AgentKind, AgentSettings, skew_timeout};
