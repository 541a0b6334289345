//! TCP dialing for the first hop of a connection
//!
//! The first hop is either the origin itself or a proxy. Proxy handshakes
//! from `hyper_util` drive the dialer as their inner connector.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use http::Uri;
use http::uri::Scheme;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioIo;
use tower_service::Service;

use super::connection::BoxIo;
use super::handshake::Handshake;
use crate::error::BoxError;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Opens TCP connections, wrapping them in TLS when dialing an `https`
/// proxy.
#[derive(Clone, Debug)]
pub struct Dialer {
    http: HttpConnector,
    hop_tls: Handshake,
}

impl Dialer {
    pub fn new(local_address: Option<IpAddr>, connect_timeout: Option<Duration>) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_nodelay(true);
        http.set_local_address(local_address);
        http.set_connect_timeout(connect_timeout);
        Self {
            http,
            hop_tls: Handshake::Disabled,
        }
    }

    /// TLS used when the dialed URI is `https`.
    #[must_use]
    pub fn with_hop_tls(mut self, hop_tls: Handshake) -> Self {
        self.hop_tls = hop_tls;
        self
    }

    /// Plain TCP to `uri`'s authority. The URI should carry an explicit
    /// port unless its scheme is `http` or `https`.
    pub async fn tcp(&self, uri: Uri) -> Result<BoxIo, BoxError> {
        let mut http = self.http.clone();
        let stream = http.call(uri).await?;
        Ok(Box::new(stream.into_inner()))
    }
}

impl Service<Uri> for Dialer {
    type Response = TokioIo<BoxIo>;
    type Error = BoxError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            let io = this.tcp(uri.clone()).await?;
            let io = if uri.scheme() == Some(&Scheme::HTTPS) {
                this.hop_tls.handshake(&uri, io).await?
            } else {
                io
            };
            Ok(TokioIo::new(io))
        })
    }
}
