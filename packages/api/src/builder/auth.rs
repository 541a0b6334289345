//! Authentication headers for calls
//!
//! Registry tokens and basic credentials. These authenticate against the
//! origin; proxy credentials belong in the proxy URL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use http::header::AUTHORIZATION;

use crate::builder::core::MeshBuilder;

impl<S> MeshBuilder<S> {
    /// Set basic authentication header
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    ///
    /// let builder = Mesh::json().basic_auth("user", "password");
    /// ```
    #[must_use]
    pub fn basic_auth(self, user: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{user}:{password}"));
        self.authorization(&format!("Basic {encoded}"))
    }

    /// Set bearer token authentication header
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    ///
    /// let builder = Mesh::json().bearer_auth("npm_token");
    /// ```
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.authorization(&format!("Bearer {token}"))
    }

    fn authorization(self, credentials: &str) -> Self {
        match HeaderValue::from_str(credentials) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.header(AUTHORIZATION, value)
            }
            Err(_) => {
                tracing::warn!(target: "mesh_agent::builder", "Skipping invalid Authorization value");
                self
            }
        }
    }
}
