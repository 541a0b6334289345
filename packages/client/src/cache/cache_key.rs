//! Cache key generation for agents
//!
//! A key is an ordered list of `name=value` segments joined by `&`. It
//! covers exactly the settings that decide socket-pool identity and TLS
//! negotiation. `max_sockets` and `timeout` are not part of it: a later
//! call asking for different limits gets the agent built by the first call.
//!
//! Segments that do not apply use `>no-...<` sentinels so an absent value
//! never collides with an empty one. PEM material is reduced to a SHA-256
//! fingerprint and proxy credentials likewise, so keys are safe to log.

use std::fmt;
use std::net::IpAddr;

use ring::digest;

use crate::proxy::ResolvedProxy;
use crate::tls::TlsSettings;

/// Deterministic identity of an agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key of a direct agent.
    #[must_use]
    pub fn direct(is_https: bool, local_address: Option<IpAddr>, tls: &TlsSettings) -> Self {
        let mut segments = vec![format!("https={is_https}")];
        segments.extend(common_segments(is_https, local_address, tls));
        Self(segments.join("&"))
    }

    /// Key of a proxy agent. Credentials are compared after percent-decoding
    /// so `us%65r` and `user` share one agent.
    #[must_use]
    pub fn proxy(
        proxy: &ResolvedProxy,
        is_https: bool,
        local_address: Option<IpAddr>,
        tls: &TlsSettings,
    ) -> Self {
        let credentials = match proxy.username() {
            Some(user) => fingerprint([user, proxy.password().unwrap_or_default()]),
            None => ">no-auth<".to_owned(),
        };
        let authority = format!(
            "{}://{}@{}:{}",
            proxy.scheme(),
            credentials,
            urlencoding::encode(proxy.host().unwrap_or_default()),
            proxy.port()
        );

        let mut segments = vec![format!("https={is_https}"), format!("proxy={authority}")];
        segments.extend(common_segments(is_https, local_address, tls));
        Self(segments.join("&"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn common_segments(is_https: bool, local_address: Option<IpAddr>, tls: &TlsSettings) -> [String; 5] {
    let local_address = local_address.map_or_else(
        || ">no-local-address<".to_owned(),
        |addr| urlencoding::encode(&addr.to_string()).into_owned(),
    );
    let strict_ssl = if is_https {
        tls.strict_ssl.to_string()
    } else {
        ">no-strict-ssl<".to_owned()
    };
    let pem_segment = |pems: &[String], sentinel: &str| {
        if is_https && !pems.is_empty() {
            fingerprint(pems.iter().map(String::as_str))
        } else {
            sentinel.to_owned()
        }
    };

    [
        format!("local-address={local_address}"),
        format!("strict-ssl={strict_ssl}"),
        format!("ca={}", pem_segment(&tls.ca, ">no-ca<")),
        format!("cert={}", pem_segment(&tls.cert, ">no-cert<")),
        format!("key={}", pem_segment(tls.key.as_slice(), ">no-key<")),
    ]
}

/// Hex SHA-256 over length-prefixed entries, so `["ab"]` and `["a", "b"]`
/// differ.
fn fingerprint<'a>(entries: impl IntoIterator<Item = &'a str>) -> String {
    let mut ctx = digest::Context::new(&digest::SHA256);
    for entry in entries {
        ctx.update(&(entry.len() as u64).to_be_bytes());
        ctx.update(entry.as_bytes());
    }
    hex::encode(ctx.finish())
}
