pub mod error_body;
pub mod http_greeting_client;
pub mod http_user_store;

pub use http_greeting_client::HttpGreetingClient;
pub use http_user_store::HttpUserStore;

use roster_http::HttpError;
use users_sdk::Failure;

/// Classify a client error: no response at all is a network failure,
/// anything the server answered is a rejection.
pub(crate) fn failure_from_http(err: &HttpError) -> Failure {
    if err.is_transport() {
        Failure::network(err.to_string())
    } else {
        Failure::rejected(err.to_string())
    }
}
