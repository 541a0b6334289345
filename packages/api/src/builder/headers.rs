//! Header management for calls
//!
//! Provides methods for setting common headers like Content-Type, Accept
//! and User-Agent, and arbitrary custom headers.

use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::builder::core::{ContentType, MeshBuilder};

/// Helper type for accept method that can handle both strings and ContentType enums
#[derive(Debug, Clone)]
pub enum AcceptValue {
    /// String representation of content type
    String(String),
    /// ContentType enum variant
    ContentType(ContentType),
}

impl AcceptValue {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AcceptValue::String(s) => s,
            AcceptValue::ContentType(ct) => ct.as_str(),
        }
    }
}

impl From<&str> for AcceptValue {
    fn from(s: &str) -> Self {
        AcceptValue::String(s.to_string())
    }
}

impl From<String> for AcceptValue {
    fn from(s: String) -> Self {
        AcceptValue::String(s)
    }
}

impl From<ContentType> for AcceptValue {
    fn from(ct: ContentType) -> Self {
        AcceptValue::ContentType(ct)
    }
}

impl<S> MeshBuilder<S> {
    /// Add a custom header to the call, replacing any previous value
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    /// use http::{HeaderName, HeaderValue};
    ///
    /// let builder = Mesh::json().header(
    ///     HeaderName::from_static("npm-command"),
    ///     HeaderValue::from_static("install"),
    /// );
    /// ```
    #[must_use]
    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.fetch.headers.insert(key, value);
        self
    }

    /// Merge `headers` into the call; later values replace earlier ones
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.fetch.headers.extend(headers);
        self
    }

    /// Set the Content-Type header
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()))
    }

    /// Set the Accept header
    ///
    /// Values that are not valid header text are skipped.
    #[must_use]
    pub fn accept<T: Into<AcceptValue>>(self, accept: T) -> Self {
        let accept = accept.into();
        match HeaderValue::from_str(accept.as_str()) {
            Ok(value) => self.header(ACCEPT, value),
            Err(_) => {
                tracing::warn!(target: "mesh_agent::builder", "Skipping invalid Accept value");
                self
            }
        }
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        match HeaderValue::from_str(user_agent) {
            Ok(value) => self.header(USER_AGENT, value),
            Err(_) => {
                tracing::warn!(target: "mesh_agent::builder", "Skipping invalid User-Agent value");
                self
            }
        }
    }

    /// Headers the call will send
    pub fn headers_ref(&self) -> &HeaderMap {
        &self.fetch.headers
    }
}
