//! Proxy bypass rules and proxy URI resolution
//!
//! This module decides whether a target goes through a proxy at all
//! ([`NoProxy`]) and, if so, which proxy ([`resolve_proxy_uri`]).

pub mod no_proxy;
pub mod resolver;

pub use no_proxy::{NoProxy, bypass};
pub use resolver::{DEFAULT_SOCKS_PORT, ResolvedProxy, resolve_proxy_uri};
