//! Fluent builders for connection options and single calls
//!
//! [`OptionsBuilder`] assembles [`ConnectionOptions`](mesh_agent_client::ConnectionOptions);
//! [`MeshBuilder`] assembles one call and runs it through an agent selector.

pub mod auth;
pub mod body;
pub mod core;
pub mod headers;
pub mod methods;
pub mod options;

pub use self::core::*;
pub use headers::*;
pub use options::*;
