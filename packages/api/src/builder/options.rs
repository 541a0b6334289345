//! Fluent construction of connection options

use std::net::IpAddr;

use mesh_agent_client::config::ConfigResult;
use mesh_agent_client::{ClientCertificate, ConnectionOptions, NoProxy};

/// Builder for [`ConnectionOptions`].
///
/// Starts from the defaults: no proxy, strict certificate checks, 50
/// sockets, no timeout.
///
/// # Examples
/// ```
/// use mesh_agent::OptionsBuilder;
///
/// let options = OptionsBuilder::new()
///     .proxy("http://proxy.local:3128")
///     .no_proxy("localhost")
///     .max_sockets(16)
///     .build();
/// assert!(options.has_proxy());
/// assert_eq!(options.max_sockets(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: ConnectionOptions,
}

impl OptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            options: ConnectionOptions::from_env(),
        }
    }

    /// Start from existing options.
    #[must_use]
    pub fn from_options(options: ConnectionOptions) -> Self {
        Self { options }
    }

    /// Proxy for `http` targets
    #[must_use]
    pub fn http_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options.http_proxy = Some(proxy.into());
        self
    }

    /// Proxy for every other target scheme
    #[must_use]
    pub fn https_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options.https_proxy = Some(proxy.into());
        self
    }

    /// Same proxy for all targets
    #[must_use]
    pub fn proxy(self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.http_proxy(proxy.clone()).https_proxy(proxy)
    }

    /// Bypass rule: `true`, `false`, or a comma separated host list
    #[must_use]
    pub fn no_proxy(mut self, rule: impl Into<NoProxy>) -> Self {
        self.options.no_proxy = Some(rule.into());
        self
    }

    /// Add a trusted PEM certificate authority
    #[must_use]
    pub fn ca(mut self, pem: impl Into<String>) -> Self {
        self.options.ca.push(pem.into());
        self
    }

    /// Add a PEM client certificate
    #[must_use]
    pub fn cert(mut self, pem: impl Into<String>) -> Self {
        self.options.cert.push(pem.into());
        self
    }

    /// PEM client private key
    #[must_use]
    pub fn key(mut self, pem: impl Into<String>) -> Self {
        self.options.key = Some(pem.into());
        self
    }

    #[must_use]
    pub fn strict_ssl(mut self, strict: bool) -> Self {
        self.options.strict_ssl = strict;
        self
    }

    #[must_use]
    pub fn max_sockets(mut self, max: usize) -> Self {
        self.options.max_sockets = Some(max);
        self
    }

    #[must_use]
    pub fn local_address(mut self, address: IpAddr) -> Self {
        self.options.local_address = Some(address);
        self
    }

    /// Timeout in milliseconds; `0` disables it
    #[must_use]
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Client certificate for targets under the registry URL `prefix`
    #[must_use]
    pub fn client_certificate(mut self, prefix: impl Into<String>, certificate: ClientCertificate) -> Self {
        self.options
            .client_certificates
            .insert(prefix.into(), certificate);
        self
    }

    /// Fill proxy settings that are still unset from the environment.
    #[must_use]
    pub fn env_fallback(mut self) -> Self {
        self.options = self.options.with_env_fallback();
        self
    }

    #[must_use]
    pub fn build(self) -> ConnectionOptions {
        self.options
    }

    /// Build and validate.
    ///
    /// # Errors
    ///
    /// See [`ConnectionOptions::validate`].
    pub fn try_build(self) -> ConfigResult<ConnectionOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
