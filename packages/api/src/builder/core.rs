//! Core `MeshBuilder` structures and base functionality
//!
//! Contains the main `MeshBuilder` struct, its body state types, and the
//! connection-level settings of a call.

use std::sync::Arc;

use http::Method;
use mesh_agent_client::{AgentSelector, CancellationToken, ConnectionOptions, FetchOptions};

use super::options::OptionsBuilder;

/// Content type enumeration for elegant API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "application/octet-stream" => ContentType::ApplicationOctetStream,
            "text/plain" => ContentType::TextPlain,
            _ => ContentType::ApplicationJson,
        }
    }
}

/// State marker indicating no body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodyNotSet;

/// State marker indicating a body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodySet;

/// Builder for one call through an agent selector
///
/// Type parameter `S` tracks the body state:
/// - `BodyNotSet`: Default state, body methods and bodiless verbs available
/// - `BodySet`: Body has been set, only verbs that carry a body available
#[derive(Debug, Clone)]
pub struct MeshBuilder<S = BodyNotSet> {
    /// Selector resolving the agent; the global selector when `None`
    pub(crate) selector: Option<Arc<AgentSelector>>,
    /// Call being built
    pub(crate) fetch: FetchOptions,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
    pub(crate) state: S,
}

impl MeshBuilder<BodyNotSet> {
    /// Start building a call with default connection options
    #[must_use]
    pub fn new() -> Self {
        Self {
            selector: None,
            fetch: FetchOptions::default(),
            debug_enabled: false,
            state: BodyNotSet,
        }
    }

    /// Shorthand for setting Content-Type and Accept to application/json
    #[must_use]
    pub fn json() -> Self {
        Self::new()
            .content_type(ContentType::ApplicationJson)
            .accept(ContentType::ApplicationJson)
    }
}

impl Default for MeshBuilder<BodyNotSet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> MeshBuilder<S> {
    /// Enable debug logging for this call
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Resolve agents through `selector` instead of the global selector
    #[must_use]
    pub fn selector(mut self, selector: Arc<AgentSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Replace the connection options
    #[must_use]
    pub fn connection(mut self, options: ConnectionOptions) -> Self {
        self.fetch.connection = options;
        self
    }

    /// Edit the connection options fluently
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    ///
    /// let builder = Mesh::json().configure(|options| options.https_proxy("socks5://127.0.0.1:1080"));
    /// ```
    #[must_use]
    pub fn configure<F>(mut self, edit: F) -> Self
    where
        F: FnOnce(OptionsBuilder) -> OptionsBuilder,
    {
        let options = std::mem::take(&mut self.fetch.connection);
        self.fetch.connection = edit(OptionsBuilder::from_options(options)).build();
        self
    }

    /// Abort the call after `timeout` milliseconds; `0` disables the limit
    #[must_use]
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.fetch.connection.timeout = Some(timeout);
        self
    }

    /// Abort the call when `signal` is cancelled
    #[must_use]
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.fetch.signal = Some(signal);
        self
    }

    /// Connection options the call will use
    pub fn connection_options(&self) -> &ConnectionOptions {
        &self.fetch.connection
    }

    pub(crate) fn with_method(mut self, method: Method) -> Self {
        self.fetch.method = method;
        self
    }
}
