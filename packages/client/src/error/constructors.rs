use super::types::{AbortReason, Error, Kind};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for a proxy string that failed to parse. `raw` is the
/// exact string handed to the URL parser.
pub fn invalid_proxy_url<E: Into<BoxError>>(raw: &str, e: E) -> Error {
    Error::new(Kind::InvalidProxyUrl).with(e).with_link(raw)
}

/// Creates an `Error` for a target URL that failed to parse.
pub fn invalid_url<E: Into<BoxError>>(raw: &str, e: E) -> Error {
    Error::new(Kind::InvalidUrl).with(e).with_link(raw)
}

/// Creates an `Error` for a call aborted by cancellation or timeout.
pub fn aborted(resource: &str, reason: AbortReason) -> Error {
    Error::new(Kind::Abort(reason)).with_link(resource)
}

/// Creates an `Error` for a request error.
pub fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e)
}
