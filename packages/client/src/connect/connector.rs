//! Route-aware connector behind every agent

use std::sync::Arc;
use std::task::{Context, Poll};

use http::uri::Scheme;
use http::{HeaderValue, Uri};
use hyper_util::client::legacy::connect::proxy::{SocksV4, SocksV5, Tunnel};
use tower_service::Service;

use super::connection::{BoxIo, Conn};
use super::dialer::{BoxFuture, Dialer};
use super::handshake::Handshake;
use crate::error::BoxError;

/// SOCKS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksVersion {
    V4,
    V5,
}

/// How a connection reaches the origin.
#[derive(Clone)]
pub enum Route {
    /// Straight to the origin
    Direct,
    /// Through an HTTP proxy that forwards absolute-form requests
    Forward { proxy: Uri },
    /// Through an HTTP CONNECT tunnel
    Tunnel {
        proxy: Uri,
        auth: Option<HeaderValue>,
    },
    /// Through a SOCKS proxy
    Socks {
        proxy: Uri,
        version: SocksVersion,
        remote_dns: bool,
        auth: Option<(String, String)>,
    },
    /// A proxy whose address could not be expressed as a URI; every
    /// connection attempt fails with `reason`
    Unreachable { reason: Arc<str> },
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Direct => f.write_str("Direct"),
            Route::Forward { proxy } => f.debug_struct("Forward").field("proxy", proxy).finish(),
            Route::Tunnel { proxy, auth } => f
                .debug_struct("Tunnel")
                .field("proxy", proxy)
                .field("auth", &auth.is_some())
                .finish(),
            Route::Socks {
                proxy,
                version,
                remote_dns,
                auth,
            } => f
                .debug_struct("Socks")
                .field("proxy", proxy)
                .field("version", version)
                .field("remote_dns", remote_dns)
                .field("auth", &auth.is_some())
                .finish(),
            Route::Unreachable { reason } => {
                f.debug_struct("Unreachable").field("reason", reason).finish()
            }
        }
    }
}

/// Connector used by an agent's pooled client.
#[derive(Clone, Debug)]
pub struct AgentConnector {
    dialer: Dialer,
    route: Route,
    origin_tls: Handshake,
}

impl AgentConnector {
    pub fn new(dialer: Dialer, route: Route, origin_tls: Handshake) -> Self {
        Self {
            dialer,
            route,
            origin_tls,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    async fn connect(self, dst: Uri) -> Result<Conn, BoxError> {
        let is_https = dst.scheme() == Some(&Scheme::HTTPS);

        let (io, is_proxy): (BoxIo, bool) = match &self.route {
            Route::Direct => (self.dialer.tcp(dst.clone()).await?, false),
            Route::Forward { proxy } => {
                if is_https {
                    return Err(format!("forwarding proxy {proxy} cannot carry https target {dst}").into());
                }
                let mut dialer = self.dialer.clone();
                (dialer.call(proxy.clone()).await?.into_inner(), true)
            }
            Route::Tunnel { proxy, auth } => {
                let mut tunnel = Tunnel::new(proxy.clone(), self.dialer.clone());
                if let Some(auth) = auth {
                    tunnel = tunnel.with_auth(auth.clone());
                }
                let io = tunnel
                    .call(dst.clone())
                    .await
                    .map_err(|e| format!("tunnel through {proxy} failed: {e}"))?;
                (io.into_inner(), false)
            }
            Route::Socks {
                proxy,
                version: SocksVersion::V5,
                remote_dns,
                auth,
            } => {
                let mut socks = SocksV5::new(proxy.clone(), self.dialer.clone()).local_dns(!remote_dns);
                if let Some((user, pass)) = auth {
                    socks = socks.with_auth(user.clone(), pass.clone());
                }
                let io = socks
                    .call(dst.clone())
                    .await
                    .map_err(|e| format!("SOCKS5 handshake with {proxy} failed: {e}"))?;
                (io.into_inner(), false)
            }
            Route::Socks {
                proxy,
                version: SocksVersion::V4,
                remote_dns,
                ..
            } => {
                let mut socks = SocksV4::new(proxy.clone(), self.dialer.clone()).local_dns(!remote_dns);
                let io = socks
                    .call(dst.clone())
                    .await
                    .map_err(|e| format!("SOCKS4 handshake with {proxy} failed: {e}"))?;
                (io.into_inner(), false)
            }
            Route::Unreachable { reason } => return Err(reason.to_string().into()),
        };

        let io = if is_https {
            self.origin_tls.handshake(&dst, io).await?
        } else {
            io
        };

        tracing::trace!(target: "mesh_agent::connect", "Connected to {} via {:?}", dst, self.route);
        Ok(Conn::new(io, is_proxy))
    }
}

impl Service<Uri> for AgentConnector {
    type Response = Conn;
    type Error = BoxError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        Box::pin(self.clone().connect(dst))
    }
}
