//! Users SDK
//!
//! Transport-agnostic contract between the users module and its consumers:
//! the record models, the normalized [`Failure`] type, and the async client
//! traits implemented by the HTTP adapters.

pub mod api;
pub mod errors;
pub mod models;

pub use api::{GreetingClient, UserStoreClient};
pub use errors::{Failure, FailureKind};
pub use models::{Greeting, MutationPayload, User, UserDraft, UserId};
