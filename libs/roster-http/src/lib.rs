//! HTTP client for the roster workspace.
//!
//! A hyper client (rustls, webpki roots) behind a small tower stack:
//! User-Agent injection, an optional timeout and a request queue that makes
//! the client cheap to clone. There is no retry layer; each call is one
//! round trip, and any status is a successful `send()`.
//!
//! ```ignore
//! let client = roster_http::HttpClient::builder()
//!     .allow_plain_http()
//!     .build()?;
//! let hello: Hello = client
//!     .get("http://localhost:3001/api/v1/hello")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_BODY_LIMIT, DEFAULT_USER_AGENT, SchemePolicy};
pub use error::{BoxError, HttpError};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody, STATUS_BODY_LIMIT};
