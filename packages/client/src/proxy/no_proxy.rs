//! NoProxy rule and host matching
//!
//! Decides whether a target host is exempt from proxying. Patterns are
//! dot-aligned host suffixes: `example.com` matches `example.com` and every
//! subdomain of it, but never `notexample.com`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Proxy bypass rule.
///
/// Deserializes from a JSON boolean (`true` bypasses every host, `false`
/// none) or from a comma-separated list of host suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum NoProxy {
    /// Never bypass the proxy
    #[default]
    Never,
    /// Always bypass the proxy
    Always,
    /// Bypass hosts matching any of the comma-separated suffixes
    Hosts(String),
}

impl NoProxy {
    /// Returns the rule found in `NO_PROXY` / `no_proxy`, or `Never` when
    /// neither variable is set.
    pub fn from_env() -> NoProxy {
        Self::from_lookup(|name| std::env::var(name).ok()).unwrap_or_default()
    }

    /// The rule in `NO_PROXY` / `no_proxy`, `None` when neither is set.
    pub(crate) fn from_lookup<F>(lookup: F) -> Option<NoProxy>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("NO_PROXY")
            .or_else(|| lookup("no_proxy"))
            .map(NoProxy::from)
    }

    /// Check if `hostname` should bypass the proxy.
    #[must_use]
    pub fn matches(&self, hostname: &str) -> bool {
        match self {
            NoProxy::Always => true,
            NoProxy::Never => false,
            NoProxy::Hosts(list) => {
                let host = reversed_labels(hostname);
                list.split(',')
                    .map(str::trim)
                    .filter(|pattern| !pattern.is_empty())
                    .any(|pattern| suffix_matches(&host, pattern))
            }
        }
    }
}

/// Free-function form of [`NoProxy::matches`].
#[must_use]
pub fn bypass(hostname: &str, no_proxy: &NoProxy) -> bool {
    no_proxy.matches(hostname)
}

fn reversed_labels(name: &str) -> Vec<&str> {
    name.split('.').filter(|label| !label.is_empty()).rev().collect()
}

fn suffix_matches(host: &[&str], pattern: &str) -> bool {
    let pattern = reversed_labels(pattern);
    if pattern.is_empty() || pattern.len() > host.len() {
        return false;
    }
    pattern.iter().zip(host).all(|(p, h)| p == h)
}

impl From<bool> for NoProxy {
    fn from(flag: bool) -> Self {
        if flag { NoProxy::Always } else { NoProxy::Never }
    }
}

impl From<String> for NoProxy {
    fn from(list: String) -> Self {
        NoProxy::Hosts(list)
    }
}

impl From<&str> for NoProxy {
    fn from(list: &str) -> Self {
        NoProxy::Hosts(list.to_owned())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawNoProxy {
    Flag(bool),
    Hosts(String),
}

impl Serialize for NoProxy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = match self {
            NoProxy::Never => RawNoProxy::Flag(false),
            NoProxy::Always => RawNoProxy::Flag(true),
            NoProxy::Hosts(list) => RawNoProxy::Hosts(list.clone()),
        };
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NoProxy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawNoProxy>::deserialize(deserializer)? {
            None => NoProxy::Never,
            Some(RawNoProxy::Flag(flag)) => NoProxy::from(flag),
            Some(RawNoProxy::Hosts(list)) => NoProxy::Hosts(list),
        })
    }
}
