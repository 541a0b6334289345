//! Proxy settings from the process environment
//!
//! Upper-case variables win over lower-case ones, matching the usual
//! `HTTP_PROXY` / `http_proxy` convention.

use super::options::ConnectionOptions;
use crate::proxy::NoProxy;

impl ConnectionOptions {
    /// Options populated from `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY`
    /// (or their lower-case forms). Everything else keeps its default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            http_proxy: proxy_var(&lookup, "HTTP_PROXY"),
            https_proxy: proxy_var(&lookup, "HTTPS_PROXY"),
            no_proxy: NoProxy::from_lookup(&lookup),
            ..Self::default()
        }
    }

    /// Fill unset proxy fields from the environment. An explicit
    /// `no_proxy`, including `NoProxy::Never`, is kept.
    #[must_use]
    pub fn with_env_fallback(self) -> Self {
        self.with_lookup_fallback(|name| std::env::var(name).ok())
    }

    /// Same as [`with_env_fallback`](Self::with_env_fallback) with a custom
    /// variable source.
    #[must_use]
    pub fn with_lookup_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.http_proxy.is_none() {
            self.http_proxy = proxy_var(&lookup, "HTTP_PROXY");
        }
        if self.https_proxy.is_none() {
            self.https_proxy = proxy_var(&lookup, "HTTPS_PROXY");
        }
        if self.no_proxy.is_none() {
            self.no_proxy = NoProxy::from_lookup(&lookup);
        }
        self
    }
}

fn proxy_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .or_else(|| lookup(&name.to_ascii_lowercase()))
        .filter(|value| !value.trim().is_empty())
}
