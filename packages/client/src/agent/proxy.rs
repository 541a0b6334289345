//! Agents that reach the origin through a proxy

use std::sync::Arc;

use http::Uri;

use super::types::{Agent, AgentKind, AgentSettings};
use crate::config::ConnectionOptions;
use crate::connect::{AgentConnector, Handshake, Route, SocksVersion};
use crate::proxy::ResolvedProxy;
use crate::tls::TlsSettings;

/// Builds HTTP, HTTPS and SOCKS proxy agents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyAgentFactory;

impl ProxyAgentFactory {
    /// Build the agent for `proxy`, or `None` when its scheme is neither
    /// `http`, `https` nor `socks*`.
    ///
    /// TLS options of `options` apply to the origin only when the target is
    /// https. An `https` proxy is itself reached over TLS.
    #[must_use]
    pub fn build(
        &self,
        proxy: &ResolvedProxy,
        is_https: bool,
        options: &ConnectionOptions,
    ) -> Option<Agent> {
        let scheme = proxy.scheme();
        if !is_proxy_scheme(scheme) {
            tracing::debug!(
                target: "mesh_agent::proxy",
                "Unsupported proxy scheme '{}', connecting directly",
                scheme
            );
            return None;
        }
        let tls = is_https.then(|| TlsSettings::from_options(options));

        let (kind, route, proxy_authorization) = match (scheme, proxy_uri(proxy)) {
            (_, Err(reason)) => (kind_for(scheme, is_https), Route::Unreachable { reason }, None),
            ("http" | "https", Ok(uri)) if is_https => (
                AgentKind::HttpsProxy,
                Route::Tunnel {
                    proxy: uri,
                    auth: proxy.basic_auth(),
                },
                None,
            ),
            ("http" | "https", Ok(uri)) => (
                AgentKind::HttpProxy,
                Route::Forward { proxy: uri },
                proxy.basic_auth(),
            ),
            (_, Ok(uri)) => {
                let (version, remote_dns) = socks_flavor(scheme);
                let auth = match version {
                    SocksVersion::V5 => proxy.username().map(|user| {
                        (user.to_owned(), proxy.password().unwrap_or_default().to_owned())
                    }),
                    SocksVersion::V4 => None,
                };
                (
                    AgentKind::Socks,
                    Route::Socks {
                        proxy: uri,
                        version,
                        remote_dns,
                        auth,
                    },
                    None,
                )
            }
        };

        let hop_tls = if scheme == "https" {
            Handshake::from_settings(&tls.clone().unwrap_or_default())
        } else {
            Handshake::Disabled
        };
        let origin_tls = tls.as_ref().map_or(Handshake::Disabled, Handshake::from_settings);

        let settings = AgentSettings::new(options, is_https, Some(proxy.redacted()));
        let connector =
            AgentConnector::new(settings.dialer().with_hop_tls(hop_tls), route, origin_tls);
        Some(Agent::new(kind, settings, connector, proxy_authorization))
    }
}

fn is_proxy_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https") || scheme.starts_with("socks")
}

fn kind_for(scheme: &str, is_https: bool) -> AgentKind {
    match scheme {
        "http" | "https" if is_https => AgentKind::HttpsProxy,
        "http" | "https" => AgentKind::HttpProxy,
        _ => AgentKind::Socks,
    }
}

/// SOCKS version and whether the proxy resolves host names.
///
/// `socks4` and `socks5` resolve locally; `socks4a`, `socks5h`, bare
/// `socks` and unknown `socks*` variants let the proxy resolve.
fn socks_flavor(scheme: &str) -> (SocksVersion, bool) {
    match scheme {
        "socks4" => (SocksVersion::V4, false),
        "socks4a" => (SocksVersion::V4, true),
        "socks5" => (SocksVersion::V5, false),
        _ => (SocksVersion::V5, true),
    }
}

/// `scheme://host:port` with the port always explicit, since the dialer
/// only knows the defaults of `http` and `https`.
fn proxy_uri(proxy: &ResolvedProxy) -> Result<Uri, Arc<str>> {
    let raw = proxy.redacted();
    raw.parse::<Uri>()
        .map_err(|e| Arc::from(format!("proxy address {raw} is not a valid URI: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socks_flavors() {
        assert_eq!(socks_flavor("socks4"), (SocksVersion::V4, false));
        assert_eq!(socks_flavor("socks4a"), (SocksVersion::V4, true));
        assert_eq!(socks_flavor("socks5"), (SocksVersion::V5, false));
        assert_eq!(socks_flavor("socks5h"), (SocksVersion::V5, true));
        assert_eq!(socks_flavor("socks"), (SocksVersion::V5, true));
    }

    #[test]
    fn test_proxy_schemes() {
        assert!(is_proxy_scheme("http"));
        assert!(is_proxy_scheme("https"));
        assert!(is_proxy_scheme("socks5h"));
        assert!(!is_proxy_scheme("ftp"));
        assert!(!is_proxy_scheme("pac+http"));
    }
}
