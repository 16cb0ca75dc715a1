use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use tower::buffer::Buffer;
use tower::{Service, ServiceExt};

use crate::builder::HttpClientBuilder;
use crate::config::SchemePolicy;
use crate::error::{BoxError, HttpError};
use crate::request::RequestBuilder;
use crate::response::{HttpResponse, ResponseBody};

type StackFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

type Queue = Buffer<Request<Full<Bytes>>, StackFuture>;

/// One-shot HTTP client over a buffered tower stack.
///
/// Each request is a single round trip with no retry. Clones share the
/// connection pool and the queue, so adapters hold it by value.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) queue: Queue,
    pub(crate) body_limit: usize,
    pub(crate) schemes: SchemePolicy,
}

impl HttpClient {
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::DELETE, url)
    }

    pub(crate) async fn execute(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<HttpResponse, HttpError> {
        let mut queue = self.queue.clone();
        let response = queue
            .ready()
            .await
            .map_err(queue_error)?
            .call(request)
            .await
            .map_err(queue_error)?;
        Ok(HttpResponse::new(response, self.body_limit))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("body_limit", &self.body_limit)
            .field("schemes", &self.schemes)
            .finish_non_exhaustive()
    }
}

/// The queue passes stack errors through; anything else means its worker died.
fn queue_error(err: BoxError) -> HttpError {
    err.downcast::<HttpError>().map_or_else(
        |err| {
            tracing::error!(error = %err, "request queue worker stopped");
            HttpError::QueueClosed
        },
        |err| *err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn local_client() -> HttpClient {
        HttpClient::builder().allow_plain_http().build().unwrap()
    }

    #[tokio::test]
    async fn each_verb_reaches_the_server_once() {
        let server = MockServer::start();
        let get = server.mock(|when, then| {
            when.method(Method::GET).path("/api/v1/users");
            then.status(200).json_body(json!([]));
        });
        let put = server.mock(|when, then| {
            when.method(Method::PUT).path("/api/v1/users/7");
            then.status(200);
        });
        let delete = server.mock(|when, then| {
            when.method(Method::DELETE).path("/api/v1/users/7");
            then.status(204);
        });

        let client = local_client();
        let users = server.url("/api/v1/users");
        let member = server.url("/api/v1/users/7");

        assert_eq!(client.get(&users).send().await.unwrap().status(), 200);
        assert_eq!(client.put(&member).send().await.unwrap().status(), 200);
        assert_eq!(client.delete(&member).send().await.unwrap().status(), 204);

        get.assert_hits(1);
        put.assert_hits(1);
        delete.assert_hits(1);
    }

    #[tokio::test]
    async fn post_sends_json_with_content_type() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/api/v1/users")
                .header("content-type", "application/json")
                .json_body(json!({"user": {"name": "Ann", "email": "ann@x.com"}}));
            then.status(201);
        });

        let response = local_client()
            .post(&server.url("/api/v1/users"))
            .json(&json!({"user": {"name": "Ann", "email": "ann@x.com"}}))
            .unwrap()
            .send()
            .await
            .unwrap();

        create.assert();
        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn server_errors_are_returned_not_retried() {
        let server = MockServer::start();
        let flaky = server.mock(|when, then| {
            when.method(Method::GET).path("/flaky");
            then.status(503);
        });

        let response = local_client().get(&server.url("/flaky")).send().await.unwrap();

        assert_eq!(response.status(), 503);
        flaky.assert_hits(1);
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start();
        let ua = server.mock(|when, then| {
            when.method(Method::GET).header("user-agent", "roster/test");
            then.status(200);
        });

        let client = HttpClient::builder()
            .allow_plain_http()
            .user_agent("roster/test")
            .build()
            .unwrap();
        client.get(&server.url("/")).send().await.unwrap();

        ua.assert();
    }

    #[tokio::test]
    async fn slow_server_hits_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        });

        let client = HttpClient::builder()
            .allow_plain_http()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.get(&server.url("/slow")).send().await.unwrap_err();

        assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_millis(50)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn refused_connection_is_transport_failure() {
        // Nothing listens on the discard port on test hosts
        let err = local_client()
            .get("http://127.0.0.1:9/api/v1/users")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Connect(_)), "got {err}");
        assert!(err.is_transport());
    }
}
