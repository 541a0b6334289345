//! Single outbound call with timeout and cancellation
//!
//! The call races the caller's cancellation token against its timeout;
//! whichever fires first aborts it.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response, Uri};
use http_body_util::Full;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::agent::{AgentBody, AgentSelector};
use crate::config::ConnectionOptions;
use crate::error::{self, AbortReason, Result};

/// Timeout applied when `connection.timeout` is absent.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 20_000;

/// Response of a call; the body streams from the pooled connection and
/// holds the destination's request slot until it ends or is dropped.
pub type FetchResponse = Response<AgentBody>;

/// Request and connection options of one call.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Agent options; `timeout` also bounds the call, `0` meaning no limit
    pub connection: ConnectionOptions,
    /// Cancels the call when triggered
    pub signal: Option<CancellationToken>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            connection: ConnectionOptions::default(),
            signal: None,
        }
    }
}

impl FetchOptions {
    /// Timeout of the call in milliseconds; `0` disables it.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.connection.timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS)
    }
}

/// Issue one request to `resource` through the agent `selector` resolves.
///
/// The response is returned once its head arrives; reading the body is not
/// covered by the timeout.
///
/// # Errors
///
/// - `Abort` with [`AbortReason::Cancelled`] when `signal` fires first
/// - `Abort` with [`AbortReason::TimedOut`] when the timeout elapses first
/// - `InvalidProxyUrl` / `InvalidUrl` from agent resolution
/// - `Request` for transport failures
pub async fn fetch_with_timeout(
    selector: &AgentSelector,
    resource: &str,
    options: FetchOptions,
) -> Result<FetchResponse> {
    let target = Url::parse(resource).map_err(|e| error::invalid_url(resource, e))?;
    let agent = selector.get_agent_for(&target, &options.connection)?;
    let timeout_ms = options.timeout_ms();

    // The percent-encoded form; `Uri` rejects raw spaces and non-ASCII.
    let uri: Uri = target
        .as_str()
        .parse()
        .map_err(|e| error::invalid_url(resource, e))?;
    let mut request = Request::new(Full::new(options.body));
    *request.method_mut() = options.method;
    *request.uri_mut() = uri;
    *request.headers_mut() = options.headers;

    let signal = options.signal.unwrap_or_default();
    let deadline = async {
        if timeout_ms == 0 {
            std::future::pending::<()>().await;
        } else {
            tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
        }
    };

    tokio::select! {
        biased;
        () = signal.cancelled() => {
            tracing::debug!(target: "mesh_agent::fetch", "Call to {} cancelled", resource);
            Err(error::aborted(resource, AbortReason::Cancelled))
        }
        () = deadline => {
            tracing::debug!(target: "mesh_agent::fetch", "Call to {} timed out after {}ms", resource, timeout_ms);
            Err(error::aborted(resource, AbortReason::TimedOut))
        }
        response = agent.request(request) => response.map_err(|e| e.with_link(resource)),
    }
}
