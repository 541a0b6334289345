//! Agents that connect straight to the origin

use super::types::{Agent, AgentKind, AgentSettings};
use crate::config::ConnectionOptions;
use crate::connect::{AgentConnector, Handshake, Route};
use crate::tls::TlsSettings;

/// Builds keep-alive agents without a proxy.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectAgentFactory;

impl DirectAgentFactory {
    /// Build an `Https` agent applying `tls`, or an `Http` agent that
    /// ignores it. Never fails: unusable TLS material is reported when a
    /// connection is attempted.
    #[must_use]
    pub fn build(&self, is_https: bool, options: &ConnectionOptions, tls: &TlsSettings) -> Agent {
        let settings = AgentSettings::new(options, is_https, None);
        let (kind, origin_tls) = if is_https {
            (AgentKind::Https, Handshake::from_settings(tls))
        } else {
            (AgentKind::Http, Handshake::Disabled)
        };

        let connector = AgentConnector::new(settings.dialer(), Route::Direct, origin_tls);
        Agent::new(kind, settings, connector, None)
    }
}
