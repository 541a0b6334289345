//! Entry point of agent resolution
//!
//! Bypass check first, then the proxy path, then the direct path. Each path
//! has its own cache so proxy and direct agents never share keys or
//! capacity.

use std::num::NonZeroUsize;
use std::sync::Arc;

use url::Url;

use super::direct::DirectAgentFactory;
use super::proxy::ProxyAgentFactory;
use super::types::Agent;
use crate::cache::{AgentCache, CacheKey, CacheStatsSnapshot};
use crate::config::{CertificateSelector, ConnectionOptions, LongestPrefixSelector};
use crate::error::{self, Result};
use crate::proxy::{bypass, resolve_proxy_uri};
use crate::tls::TlsSettings;

/// Counters of both caches of a selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorStats {
    pub proxy: CacheStatsSnapshot,
    pub direct: CacheStatsSnapshot,
}

/// Resolves and caches agents.
///
/// Create one at startup and share it by reference; tests create their own
/// for isolated caches.
pub struct AgentSelector {
    proxy_agents: AgentCache,
    direct_agents: AgentCache,
    certificates: Arc<dyn CertificateSelector>,
    proxy_factory: ProxyAgentFactory,
    direct_factory: DirectAgentFactory,
}

impl AgentSelector {
    /// Selector whose caches hold 50 agents each.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proxy_agents: AgentCache::new(),
            direct_agents: AgentCache::new(),
            certificates: Arc::new(LongestPrefixSelector),
            proxy_factory: ProxyAgentFactory,
            direct_factory: DirectAgentFactory,
        }
    }

    /// Selector whose caches hold `capacity` agents each.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            proxy_agents: AgentCache::with_capacity(capacity),
            direct_agents: AgentCache::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Replace the per-registry client certificate lookup.
    #[must_use]
    pub fn with_certificate_selector<S>(mut self, selector: S) -> Self
    where
        S: CertificateSelector + 'static,
    {
        self.certificates = Arc::new(selector);
        self
    }

    /// Agent for `uri` under `options`.
    ///
    /// Calls whose options produce the same cache key get the same agent,
    /// even when they ask for different `max_sockets` or `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProxyUrl` when the applicable proxy setting does not
    /// parse and `InvalidUrl` when `uri` does not.
    pub fn get_agent(&self, uri: &str, options: &ConnectionOptions) -> Result<Arc<Agent>> {
        let target = Url::parse(uri).map_err(|e| error::invalid_url(uri, e))?;
        self.get_agent_for(&target, options)
    }

    /// Agent for an already parsed target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProxyUrl` when the applicable proxy setting does not
    /// parse.
    pub fn get_agent_for(&self, target: &Url, options: &ConnectionOptions) -> Result<Arc<Agent>> {
        let is_https = target.scheme() == "https";

        if options.has_proxy() && !bypass(target.host_str().unwrap_or_default(), options.no_proxy_rule()) {
            if let Some(agent) = self.proxy_agent(target, is_https, options)? {
                return Ok(agent);
            }
        }

        Ok(self.direct_agent(target, is_https, options))
    }

    fn proxy_agent(
        &self,
        target: &Url,
        is_https: bool,
        options: &ConnectionOptions,
    ) -> Result<Option<Arc<Agent>>> {
        let Some(proxy) = resolve_proxy_uri(
            target,
            options.http_proxy.as_deref(),
            options.https_proxy.as_deref(),
        )?
        else {
            return Ok(None);
        };

        let tls = TlsSettings::from_options(options);
        let key = CacheKey::proxy(&proxy, is_https, options.local_address, &tls);
        Ok(self
            .proxy_agents
            .get_or_try_create(key, || self.proxy_factory.build(&proxy, is_https, options)))
    }

    fn direct_agent(&self, target: &Url, is_https: bool, options: &ConnectionOptions) -> Arc<Agent> {
        let mut tls = TlsSettings::from_options(options);
        if let Some(selected) = self.certificates.select(&options.client_certificates, target) {
            tls = tls.with_client_certificate(selected);
        }

        let key = CacheKey::direct(is_https, options.local_address, &tls);
        self.direct_agents
            .get_or_create(key, || self.direct_factory.build(is_https, options, &tls))
    }

    pub fn proxy_agents(&self) -> &AgentCache {
        &self.proxy_agents
    }

    pub fn direct_agents(&self) -> &AgentCache {
        &self.direct_agents
    }

    pub fn stats(&self) -> SelectorStats {
        SelectorStats {
            proxy: self.proxy_agents.stats(),
            direct: self.direct_agents.stats(),
        }
    }
}

impl Default for AgentSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AgentSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSelector")
            .field("proxy_agents", &self.proxy_agents)
            .field("direct_agents", &self.direct_agents)
            .finish()
    }
}
