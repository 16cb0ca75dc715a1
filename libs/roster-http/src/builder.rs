use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::USER_AGENT;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::util::BoxCloneService;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::set_header::SetRequestHeaderLayer;

use crate::client::HttpClient;
use crate::config::{ClientSettings, SchemePolicy};
use crate::error::{BoxError, HttpError};
use crate::response::ResponseBody;

/// Requests that may wait for the stack before callers see backpressure.
const QUEUE_DEPTH: usize = 64;

type Stack = BoxCloneService<Request<Full<Bytes>>, Response<ResponseBody>, HttpError>;

/// Fluent construction of an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    settings: ClientSettings,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail requests that get no response within `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.settings.body_limit = bytes;
        self
    }

    /// Accept `http://` URLs as well as `https://`.
    #[must_use]
    pub fn allow_plain_http(mut self) -> Self {
        self.settings.schemes = SchemePolicy::AllowPlainHttp;
        self
    }

    /// Assemble the service stack.
    ///
    /// Must run inside a Tokio runtime: the request queue spawns its worker here.
    ///
    /// # Errors
    /// `HttpError::UserAgent` for an unusable header value, `HttpError::Tls`
    /// when the TLS connector cannot be set up.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let settings = self.settings;
        if settings.schemes == SchemePolicy::AllowPlainHttp {
            tracing::warn!("plain http:// allowed; traffic to such URLs is unencrypted");
        }

        let user_agent = HeaderValue::try_from(settings.user_agent.as_str())?;
        let connector = https_connector(settings.schemes)?;

        let mut pool = Client::builder(TokioExecutor::new());
        pool.pool_timer(TokioTimer::new())
            .pool_idle_timeout(settings.idle_timeout);
        let hyper_client = pool.build::<_, Full<Bytes>>(connector);

        // Every status is a successful call here; only missing responses are errors
        let base = ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(USER_AGENT, user_agent))
            .service(hyper_client)
            .map_response(box_body)
            .map_err(|e| HttpError::Connect(Box::new(e)));

        let stack: Stack = match settings.timeout {
            None => BoxCloneService::new(base),
            Some(limit) => BoxCloneService::new(
                ServiceBuilder::new()
                    .layer(TimeoutLayer::new(limit))
                    .service(base)
                    .map_err(move |e| timeout_error(e, limit)),
            ),
        };

        Ok(HttpClient {
            queue: Buffer::new(stack, QUEUE_DEPTH),
            body_limit: settings.body_limit,
            schemes: settings.schemes,
        })
    }
}

fn timeout_error(err: BoxError, limit: Duration) -> HttpError {
    if err.is::<Elapsed>() {
        return HttpError::Timeout(limit);
    }
    match err.downcast::<HttpError>() {
        Ok(err) => *err,
        Err(other) => HttpError::Connect(other),
    }
}

fn box_body(response: Response<Incoming>) -> Response<ResponseBody> {
    response.map(|body| body.map_err(Into::into).boxed())
}

/// Webpki roots on the process-wide rustls provider, or aws-lc-rs if none is installed.
fn https_connector(schemes: SchemePolicy) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let provider = rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

    let builder = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(provider)
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    Ok(match schemes {
        SchemePolicy::HttpsOnly => builder.https_only().enable_all_versions().build(),
        SchemePolicy::AllowPlainHttp => builder.https_or_http().enable_all_versions().build(),
    })
}
