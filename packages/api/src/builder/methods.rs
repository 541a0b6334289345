//! Terminal methods that execute the call
//!
//! Each verb resolves the agent for the URL, sends the request and returns
//! once the response head arrives.

use http::Method;
use mesh_agent_client::{AgentSelector, FetchResponse, Result, fetch_with_timeout};

use crate::builder::core::{BodyNotSet, BodySet, MeshBuilder};
use crate::global_selector;

impl MeshBuilder<BodyNotSet> {
    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    ///
    /// # async fn run() -> mesh_agent::Result<()> {
    /// let response = Mesh::json().get("https://registry.npmjs.org/pkg").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::GET).execute(url).await
    }

    /// Execute a HEAD request
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    pub async fn head(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::HEAD).execute(url).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    pub async fn delete(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::DELETE).execute(url).await
    }
}

impl MeshBuilder<BodySet> {
    /// Execute a POST request with the configured body
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    pub async fn post(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::POST).execute(url).await
    }

    /// Execute a PUT request with the configured body
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    pub async fn put(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::PUT).execute(url).await
    }

    /// Execute a PATCH request with the configured body
    ///
    /// # Errors
    ///
    /// See [`mesh_agent_client::fetch_with_timeout`].
    pub async fn patch(self, url: &str) -> Result<FetchResponse> {
        self.with_method(Method::PATCH).execute(url).await
    }
}

impl<S> MeshBuilder<S> {
    async fn execute(self, url: &str) -> Result<FetchResponse> {
        if self.debug_enabled {
            tracing::debug!(
                target: "mesh_agent::builder",
                "{} {} (timeout={:?}, proxy={})",
                self.fetch.method,
                url,
                self.fetch.connection.timeout,
                self.fetch.connection.has_proxy()
            );
        }

        let selector: &AgentSelector = match &self.selector {
            Some(selector) => selector.as_ref(),
            None => global_selector(),
        };
        fetch_with_timeout(selector, url, self.fetch).await
    }
}
