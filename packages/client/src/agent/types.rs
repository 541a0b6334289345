//! Agent variants and the pooled client they wrap

use std::collections::HashMap;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use bytes::Bytes;
use http::header::PROXY_AUTHORIZATION;
use http::uri::Scheme;
use http::{HeaderValue, Request, Response, Uri};
use http_body_util::Full;
use hyper::body::{Body, Frame, Incoming, SizeHint};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ConnectionOptions;
use crate::connect::{AgentConnector, Dialer, Route};
use crate::error::{self, Result};

/// The closed set of agent flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Keep-alive pool for `http` targets
    Http,
    /// Keep-alive pool for `https` targets
    Https,
    /// `http` targets forwarded by an HTTP(S) proxy
    HttpProxy,
    /// `https` targets tunneled through an HTTP(S) proxy with CONNECT
    HttpsProxy,
    /// Any target through a SOCKS proxy
    Socks,
}

impl AgentKind {
    #[must_use]
    pub fn is_proxy(self) -> bool {
        !matches!(self, AgentKind::Http | AgentKind::Https)
    }
}

/// Map a caller timeout to the agent's own timeout.
///
/// Absent or `0` stays `0` (disabled). Any other value becomes `T + 1` so a
/// caller-side timeout of `T` always fires first.
#[must_use]
pub fn skew_timeout(timeout: Option<u64>) -> u64 {
    match timeout {
        None | Some(0) => 0,
        Some(ms) => ms.saturating_add(1),
    }
}

/// Settings an agent was built with. Fixed for the agent's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// Pool limit
    pub max_sockets: usize,
    /// Skewed timeout in milliseconds, `0` when disabled
    pub timeout: u64,
    /// Local bind address
    pub local_address: Option<IpAddr>,
    /// Certificate verification, `None` for `http` targets
    pub strict_ssl: Option<bool>,
    /// Proxy as `scheme://host:port`, without credentials
    pub proxy: Option<String>,
}

impl AgentSettings {
    pub(crate) fn new(options: &ConnectionOptions, is_https: bool, proxy: Option<String>) -> Self {
        Self {
            max_sockets: options.max_sockets(),
            timeout: skew_timeout(options.timeout),
            local_address: options.local_address,
            strict_ssl: is_https.then_some(options.strict_ssl),
            proxy,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_millis(self.timeout))
    }

    pub(crate) fn dialer(&self) -> Dialer {
        Dialer::new(self.local_address, self.timeout())
    }
}

/// Response body of an agent call.
///
/// Holds the destination's request slot until the body ends, fails, or is
/// dropped.
#[derive(Debug)]
pub struct AgentBody {
    inner: Incoming,
    slot: Option<OwnedSemaphorePermit>,
}

impl AgentBody {
    /// True while the body still occupies a request slot.
    #[must_use]
    pub fn holds_slot(&self) -> bool {
        self.slot.is_some()
    }
}

impl Body for AgentBody {
    type Data = Bytes;
    type Error = hyper::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<std::result::Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let frame = ready!(Pin::new(&mut this.inner).poll_frame(cx));
        if !matches!(frame, Some(Ok(_))) {
            this.slot = None;
        }
        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Pooled connection manager for one effective configuration.
pub struct Agent {
    kind: AgentKind,
    settings: AgentSettings,
    route: Route,
    client: Client<AgentConnector, Full<Bytes>>,
    /// Request slots per destination `scheme://host:port`
    slots: Mutex<HashMap<String, Arc<Semaphore>>>,
    proxy_authorization: Option<HeaderValue>,
}

impl Agent {
    pub(crate) fn new(
        kind: AgentKind,
        settings: AgentSettings,
        connector: AgentConnector,
        proxy_authorization: Option<HeaderValue>,
    ) -> Self {
        let mut builder = Client::builder(TokioExecutor::new());
        builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(settings.max_sockets);
        if let Some(idle) = settings.timeout() {
            builder.pool_idle_timeout(idle);
        }

        tracing::debug!(
            target: "mesh_agent::agent",
            "Built {:?} agent (max_sockets={}, timeout={}ms, proxy={:?})",
            kind,
            settings.max_sockets,
            settings.timeout,
            settings.proxy
        );

        Self {
            kind,
            route: connector.route().clone(),
            slots: Mutex::new(HashMap::new()),
            client: builder.build(connector),
            settings,
            proxy_authorization,
        }
    }

    #[must_use]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    #[must_use]
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Send one request through the pool.
    ///
    /// At most `max_sockets` requests per destination host are in flight;
    /// further requests to that host wait. A slot is held by the response
    /// body and released when the body ends or is dropped. Forwarding proxy
    /// agents add `Proxy-Authorization` unless the request carries one.
    ///
    /// # Errors
    ///
    /// Returns a `Request` error for connect, TLS, proxy handshake and
    /// protocol failures.
    pub async fn request(&self, mut request: Request<Full<Bytes>>) -> Result<Response<AgentBody>> {
        if let Some(auth) = &self.proxy_authorization {
            if !request.headers().contains_key(PROXY_AUTHORIZATION) {
                request.headers_mut().insert(PROXY_AUTHORIZATION, auth.clone());
            }
        }

        let slot = self
            .host_slots(request.uri())
            .acquire_owned()
            .await
            .map_err(error::request)?;

        let response = self.client.request(request).await.map_err(error::request)?;
        let (parts, inner) = response.into_parts();
        let slot = (!inner.is_end_stream()).then_some(slot);
        Ok(Response::from_parts(parts, AgentBody { inner, slot }))
    }

    /// Slots of the destination of `uri`. Entries of hosts with nothing in
    /// flight are pruned when a new host is added.
    fn host_slots(&self, uri: &Uri) -> Arc<Semaphore> {
        let host = destination(uri);
        let mut slots = self.slots.lock();
        if let Some(existing) = slots.get(&host) {
            return Arc::clone(existing);
        }

        slots.retain(|_, semaphore| Arc::strong_count(semaphore) > 1);
        let semaphore = Arc::new(Semaphore::new(
            self.settings.max_sockets.min(Semaphore::MAX_PERMITS),
        ));
        slots.insert(host, Arc::clone(&semaphore));
        semaphore
    }
}

/// `scheme://host:port` of a request target, with the default port filled in.
fn destination(uri: &Uri) -> String {
    let scheme = uri.scheme_str().unwrap_or("http");
    let host = uri.host().unwrap_or_default();
    let port = uri.port_u16().unwrap_or(if uri.scheme() == Some(&Scheme::HTTPS) {
        443
    } else {
        80
    });
    format!("{scheme}://{host}:{port}")
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("kind", &self.kind)
            .field("settings", &self.settings)
            .field("route", &self.route)
            .finish()
    }
}
