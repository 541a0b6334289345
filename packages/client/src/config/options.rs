//! Connection options and their defaults
//!
//! [`ConnectionOptions`] is the immutable per-call input to agent
//! resolution. JSON keys are camelCase (`httpsProxy`, `strictSsl`, ...).

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::proxy::NoProxy;

/// Connection pool limit used when `max_sockets` is absent or zero.
pub const DEFAULT_MAX_SOCKETS: usize = 50;

/// Per-registry client certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCertificate {
    /// PEM certificate chain
    pub cert: String,
    /// PEM private key
    pub key: String,
    /// PEM certificate authority overriding the global `ca`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
}

/// Options that decide which agent a target resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionOptions {
    /// Proxy for `http` targets
    pub http_proxy: Option<String>,

    /// Proxy for every other target scheme
    pub https_proxy: Option<String>,

    /// Proxy bypass rule; absent bypasses nothing but can still be filled
    /// from the environment, unlike an explicit `false`
    pub no_proxy: Option<NoProxy>,

    /// PEM certificate authorities trusted instead of the system roots
    #[serde(deserialize_with = "one_or_many")]
    pub ca: Vec<String>,

    /// PEM client certificate chain
    #[serde(deserialize_with = "one_or_many")]
    pub cert: Vec<String>,

    /// PEM client private key
    pub key: Option<String>,

    /// Verify server certificates of https targets
    pub strict_ssl: bool,

    /// Connection pool limit, 50 when absent
    pub max_sockets: Option<usize>,

    /// Local address outbound sockets bind to
    pub local_address: Option<IpAddr>,

    /// Timeout in milliseconds; `0` disables it
    pub timeout: Option<u64>,

    /// Registry URL prefix to client certificate
    pub client_certificates: BTreeMap<String, ClientCertificate>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            http_proxy: None,
            https_proxy: None,
            no_proxy: None,
            ca: Vec::new(),
            cert: Vec::new(),
            key: None,
            strict_ssl: true,
            max_sockets: None,
            local_address: None,
            timeout: None,
            client_certificates: BTreeMap::new(),
        }
    }
}

impl ConnectionOptions {
    /// True when either proxy setting is present and non-empty.
    #[must_use]
    pub fn has_proxy(&self) -> bool {
        let set = |proxy: &Option<String>| proxy.as_deref().is_some_and(|p| !p.is_empty());
        set(&self.http_proxy) || set(&self.https_proxy)
    }

    /// Effective bypass rule.
    #[must_use]
    pub fn no_proxy_rule(&self) -> &NoProxy {
        const NEVER: &NoProxy = &NoProxy::Never;
        self.no_proxy.as_ref().unwrap_or(NEVER)
    }

    /// Effective pool limit.
    #[must_use]
    pub fn max_sockets(&self) -> usize {
        match self.max_sockets {
            Some(0) | None => DEFAULT_MAX_SOCKETS,
            Some(n) => n,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(pem)) => vec![pem],
        Some(OneOrMany::Many(pems)) => pems,
    })
}
