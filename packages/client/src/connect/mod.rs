//! Connection establishment for agents
//!
//! An [`AgentConnector`] dials the first hop with a [`Dialer`], runs the
//! proxy handshake its [`Route`] calls for, then the origin TLS handshake
//! for https targets. HTTP CONNECT and SOCKS wire handling is delegated to
//! `hyper_util`'s proxy connectors.

pub mod connection;
pub mod connector;
pub mod dialer;
pub mod handshake;

pub use connection::{AsyncIo, BoxIo, Conn};
pub use connector::{AgentConnector, Route, SocksVersion};
pub use dialer::Dialer;
pub use handshake::Handshake;
