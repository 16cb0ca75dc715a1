use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Collected, LengthLimitError, Limited};
use serde::de::DeserializeOwned;

use crate::error::{BoxError, HttpError};

/// At most this many bytes of a failed response are kept in `HttpError::Status`.
pub const STATUS_BODY_LIMIT: usize = 8 * 1024;

pub type ResponseBody = BoxBody<Bytes, BoxError>;

/// Status plus an unread body. Every read is capped at the client's body limit.
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    body: ResponseBody,
    body_limit: usize,
}

impl HttpResponse {
    pub(crate) fn new(response: Response<ResponseBody>, body_limit: usize) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            body,
            body_limit,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw body, whatever the status.
    ///
    /// # Errors
    /// `HttpError::BodyTooLarge` past the limit, `HttpError::Body` if the stream breaks.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect_limited(self.body, self.body_limit).await
    }

    /// Decode a 2xx body as JSON.
    ///
    /// # Errors
    /// `HttpError::Status` (with a body preview) for non-2xx, otherwise the
    /// errors of [`bytes`](Self::bytes) or `HttpError::Decode`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        if !self.status.is_success() {
            let limit = self.body_limit.min(STATUS_BODY_LIMIT);
            let body = match collect_limited(self.body, limit).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::debug!(error = %e, "failed response body not captured");
                    String::new()
                }
            };
            return Err(HttpError::Status {
                status: self.status,
                body,
            });
        }

        let bytes = collect_limited(self.body, self.body_limit).await?;
        serde_json::from_slice(&bytes).map_err(HttpError::Decode)
    }
}

async fn collect_limited(body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    // Boxed so `Send` is proven on the concrete type; holding it unboxed inside
    // `Send` futures trips a higher-ranked lifetime inference limitation.
    let collect: Pin<Box<dyn Future<Output = Result<Collected<Bytes>, BoxError>> + Send>> =
        Box::pin(Limited::new(body, limit).collect());
    match collect.await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(HttpError::BodyTooLarge { limit }),
        Err(e) => Err(HttpError::Body(e)),
    }
}

#[cfg(test)]
mod tests {
    use crate::{HttpClient, HttpError};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client() -> HttpClient {
        HttpClient::builder().allow_plain_http().build().unwrap()
    }

    #[derive(Debug, serde::Deserialize)]
    struct Hello {
        message: String,
    }

    #[tokio::test]
    async fn json_decodes_success_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/api/v1/hello");
            then.status(200).json_body(json!({"message": "Hello from API"}));
        });

        let hello: Hello = client()
            .get(&server.url("/api/v1/hello"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(hello.message, "Hello from API");
    }

    #[tokio::test]
    async fn json_on_failure_status_carries_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/api/v1/users");
            then.status(422).body(r#"{"errors":["Email is invalid"]}"#);
        });

        let err = client()
            .get(&server.url("/api/v1/users"))
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();

        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("Email is invalid"));
            }
            other => panic!("expected status error, got {other}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/api/v1/hello");
            then.status(200).body("<html>oops</html>");
        });

        let err = client()
            .get(&server.url("/api/v1/hello"))
            .send()
            .await
            .unwrap()
            .json::<Hello>()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn bytes_ignores_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/v1/users");
            then.status(400).body("bad");
        });

        let body = client()
            .post(&server.url("/api/v1/users"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();

        assert_eq!(&body[..], b"bad");
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/large");
            then.status(200).body("x".repeat(8 * 1024));
        });

        let small = HttpClient::builder()
            .allow_plain_http()
            .body_limit(1024)
            .build()
            .unwrap();
        let err = small
            .get(&server.url("/large"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::BodyTooLarge { limit: 1024 }));
    }
}
