use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Boxed error used for lower-level failures (connector, body stream).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by [`HttpClient`](crate::HttpClient).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL scheme is refused by the client's [`SchemePolicy`](crate::SchemePolicy).
    #[error("scheme of '{url}' is not permitted")]
    SchemeNotAllowed { url: String },

    #[error("invalid User-Agent: {0}")]
    UserAgent(#[from] http::header::InvalidHeaderValue),

    #[error("could not assemble request: {0}")]
    Request(#[from] http::Error),

    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Connecting, writing the request, or reading response headers failed.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] BoxError),

    /// The body stream broke after the status line arrived.
    #[error("response body interrupted: {0}")]
    Body(#[source] BoxError),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Non-2xx status where a success was required. `body` holds at most
    /// [`STATUS_BODY_LIMIT`](crate::STATUS_BODY_LIMIT) bytes, lossily decoded.
    #[error("server answered {status}")]
    Status { status: StatusCode, body: String },

    /// The request queue worker is gone.
    #[error("request queue closed")]
    QueueClosed,
}

impl HttpError {
    /// `true` when no complete HTTP response was obtained.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HttpError::Timeout(_)
                | HttpError::Connect(_)
                | HttpError::Tls(_)
                | HttpError::Body(_)
                | HttpError::QueueClosed
        )
    }
}
