use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;

use crate::client::HttpClient;
use crate::error::HttpError;
use crate::response::HttpResponse;

/// A request being prepared; nothing is sent until [`send`](Self::send).
///
/// URLs are taken as final strings; build them with `url::Url` beforehand.
#[must_use = "a request is only sent by .send()"]
#[derive(Debug)]
pub struct RequestBuilder {
    client: HttpClient,
    method: Method,
    url: String,
    json_body: Option<Bytes>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: Method, url: &str) -> Self {
        Self {
            client,
            method,
            url: url.to_owned(),
            json_body: None,
        }
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    /// `HttpError::Encode` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        let encoded = serde_json::to_vec(body).map_err(HttpError::Encode)?;
        self.json_body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Send the request once.
    ///
    /// Any status, 4xx and 5xx included, comes back as `Ok`.
    ///
    /// # Errors
    /// URL or scheme problems, or a transport failure (connection, TLS, timeout).
    #[tracing::instrument(level = "debug", skip_all, fields(method = %self.method, url = %self.url))]
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let uri = absolute_uri(&self.url)?;
        if !self.client.schemes.permits(&uri) {
            return Err(HttpError::SchemeNotAllowed { url: self.url });
        }

        let mut request = Request::builder().method(self.method).uri(uri);
        if self.json_body.is_some() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        let request = request.body(Full::new(self.json_body.unwrap_or_default()))?;

        let response = self.client.execute(request).await?;
        tracing::debug!(status = %response.status(), "response received");
        Ok(response)
    }
}

fn absolute_uri(url: &str) -> Result<Uri, HttpError> {
    let invalid = |reason: String| HttpError::InvalidUrl {
        url: url.to_owned(),
        reason,
    };
    let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(invalid("expected an absolute URL".to_owned()));
    }
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::builder().allow_plain_http().build().unwrap()
    }

    #[tokio::test]
    async fn relative_url_is_rejected_before_sending() {
        let err = client().get("/api/v1/users").send().await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { .. }), "got {err}");
    }

    #[tokio::test]
    async fn non_http_scheme_is_refused() {
        let err = client().get("ftp://example.com/users").send().await.unwrap_err();
        assert!(matches!(err, HttpError::SchemeNotAllowed { .. }));
    }

    #[tokio::test]
    async fn plain_http_needs_opt_in() {
        let https_only = HttpClient::builder().build().unwrap();
        let err = https_only
            .get("http://localhost:3001/api/v1/users")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::SchemeNotAllowed { .. }));
        assert!(!err.is_transport());
    }

    #[test]
    fn absolute_uri_accepts_host_and_port() {
        let uri = absolute_uri("http://localhost:3001/api/v1/hello").unwrap();
        assert_eq!(uri.port_u16(), Some(3001));
    }
}
