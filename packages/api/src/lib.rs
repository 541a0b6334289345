//! Mesh Agent Public API
//!
//! Pooled HTTP/HTTPS agents resolved per target and per connection options,
//! with a fluent builder for options and for single calls.
//!
//! The free functions use a process-wide [`AgentSelector`] created on first
//! use. Install a customised one with [`init_global_selector`] before the
//! first call.
//!
//! ```no_run
//! # async fn run() -> mesh_agent::Result<()> {
//! let options = mesh_agent::OptionsBuilder::new()
//!     .https_proxy("http://proxy.local:8080")
//!     .no_proxy("localhost, .internal")
//!     .build();
//!
//! let agent = mesh_agent::get_agent("https://registry.npmjs.org/pkg", &options)?;
//! println!("{:?}", agent.kind());
//!
//! let response = mesh_agent::Mesh::json()
//!     .connection(options)
//!     .timeout_ms(5_000)
//!     .get("https://registry.npmjs.org/pkg")
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::sync::{Arc, OnceLock};

pub mod builder;

pub use builder::*;

pub use mesh_agent_client::{
    AbortReason, Agent, AgentKind, AgentSelector, CancellationToken, CertificateSelector,
    ClientCertificate, ConnectionOptions, Error, FetchOptions, FetchResponse, Kind, NoProxy,
    Result,
};

static GLOBAL_SELECTOR: OnceLock<AgentSelector> = OnceLock::new();

/// The process-wide selector, created with default capacity on first use.
pub fn global_selector() -> &'static AgentSelector {
    GLOBAL_SELECTOR.get_or_init(AgentSelector::new)
}

/// Install `selector` as the process-wide selector.
///
/// # Errors
///
/// Returns `selector` back when the global selector was already created,
/// either by an earlier call or by first use.
pub fn init_global_selector(selector: AgentSelector) -> std::result::Result<(), AgentSelector> {
    GLOBAL_SELECTOR.set(selector)
}

/// Agent for `uri` from the process-wide selector.
///
/// # Errors
///
/// See [`AgentSelector::get_agent`].
pub fn get_agent(uri: &str, options: &ConnectionOptions) -> Result<Arc<Agent>> {
    global_selector().get_agent(uri, options)
}

/// One call through the process-wide selector.
///
/// # Errors
///
/// See [`mesh_agent_client::fetch_with_timeout`].
pub async fn fetch_with_timeout(resource: &str, options: FetchOptions) -> Result<FetchResponse> {
    mesh_agent_client::fetch_with_timeout(global_selector(), resource, options).await
}

/// Main entry point providing static builder methods
pub struct Mesh;

impl Mesh {
    /// Builder for a call without a preset content type
    #[must_use]
    pub fn request() -> MeshBuilder {
        MeshBuilder::new()
    }

    /// Builder for a JSON call
    ///
    /// Shorthand for `MeshBuilder::json()`
    #[must_use]
    pub fn json() -> MeshBuilder {
        MeshBuilder::json()
    }

    /// Builder whose calls go through `selector` instead of the global one
    #[must_use]
    pub fn with_selector(selector: Arc<AgentSelector>) -> MeshBuilder {
        MeshBuilder::new().selector(selector)
    }

    /// Fluent connection options
    #[must_use]
    pub fn options() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

/// Create a new JSON call builder
///
/// Shorthand for `MeshBuilder::json()`
#[must_use]
pub fn json() -> MeshBuilder {
    MeshBuilder::json()
}

/// Create a new options builder
#[must_use]
pub fn options() -> OptionsBuilder {
    OptionsBuilder::new()
}
