//! Request body handling
//!
//! A body moves the builder into the `BodySet` state, where only verbs that
//! carry a body remain.

use bytes::Bytes;
use serde::Serialize;

use crate::builder::core::{BodyNotSet, BodySet, ContentType, MeshBuilder};

impl MeshBuilder<BodyNotSet> {
    /// Serialize `body` as JSON and set the JSON Content-Type
    ///
    /// # Errors
    ///
    /// Returns the serializer error when `body` cannot be represented as JSON.
    ///
    /// # Examples
    /// ```no_run
    /// use mesh_agent::Mesh;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Publish {
    ///     name: String,
    /// }
    ///
    /// let builder = Mesh::json().json_body(&Publish { name: "pkg".to_string() })?;
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn json_body<T: Serialize>(self, body: &T) -> serde_json::Result<MeshBuilder<BodySet>> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self.content_type(ContentType::ApplicationJson).body(bytes))
    }

    /// Set raw body bytes, leaving Content-Type as configured
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> MeshBuilder<BodySet> {
        self.fetch.body = body.into();
        MeshBuilder {
            selector: self.selector,
            fetch: self.fetch,
            debug_enabled: self.debug_enabled,
            state: BodySet,
        }
    }
}
