//! TLS handshake stage of a connection

use std::sync::Arc;

use http::Uri;
use tokio_rustls::TlsConnector;

use super::connection::BoxIo;
use crate::error::BoxError;
use crate::tls::{self, TlsError, TlsSettings};

/// TLS stage applied to a stream. A configuration that failed to build is
/// kept and reported when a handshake is attempted, so building an agent
/// never fails on bad PEM material.
#[derive(Clone)]
pub enum Handshake {
    Disabled,
    Ready(TlsConnector),
    Invalid(Arc<TlsError>),
}

impl Handshake {
    pub fn from_settings(settings: &TlsSettings) -> Self {
        match tls::client_config(settings) {
            Ok(config) => Handshake::Ready(TlsConnector::from(Arc::new(config))),
            Err(e) => {
                tracing::warn!(
                    target: "mesh_agent::tls",
                    "TLS material rejected, https connections through this agent will fail: {}",
                    e
                );
                Handshake::Invalid(Arc::new(e))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Handshake::Ready(_))
    }

    /// Run the client handshake for `dst` over `io`.
    pub async fn handshake(&self, dst: &Uri, io: BoxIo) -> Result<BoxIo, BoxError> {
        match self {
            Handshake::Disabled => Err(format!("no TLS configured for {dst}").into()),
            Handshake::Invalid(e) => Err(format!("invalid TLS configuration: {e}").into()),
            Handshake::Ready(connector) => {
                let host = dst
                    .host()
                    .ok_or_else(|| format!("missing host in {dst}"))?;
                let name = tls::server_name(host)?;
                let stream = connector.connect(name, io).await?;
                Ok(Box::new(stream))
            }
        }
    }
}

impl std::fmt::Debug for Handshake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handshake::Disabled => f.write_str("Disabled"),
            Handshake::Ready(_) => f.write_str("Ready"),
            Handshake::Invalid(e) => f.debug_tuple("Invalid").field(e).finish(),
        }
    }
}
