use std::time::Duration;

use http::Uri;

/// Sent when the caller does not set a User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("roster-http/", env!("CARGO_PKG_VERSION"));

/// Upper bound on response bytes buffered in memory (10 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Which URL schemes a client will send requests to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicy {
    #[default]
    HttpsOnly,
    /// Also accept plain `http://`, e.g. a backend on localhost.
    AllowPlainHttp,
}

impl SchemePolicy {
    #[must_use]
    pub fn permits(self, uri: &Uri) -> bool {
        match uri.scheme_str() {
            Some("https") => true,
            Some("http") => self == SchemePolicy::AllowPlainHttp,
            _ => false,
        }
    }
}

/// Settings collected by [`HttpClientBuilder`](crate::HttpClientBuilder).
///
/// No retry setting exists: a request is sent exactly once.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub body_limit: usize,
    pub schemes: SchemePolicy,
    /// How long an unused pooled connection is kept.
    pub idle_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            body_limit: DEFAULT_BODY_LIMIT,
            schemes: SchemePolicy::HttpsOnly,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}
