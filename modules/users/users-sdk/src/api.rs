//! Async client boundary for the users module.
//!
//! Object-safe so consumers hold `Arc<dyn UserStoreClient>` and tests can
//! substitute an in-memory store.

use async_trait::async_trait;

use crate::errors::Failure;
use crate::models::{Greeting, MutationPayload, User, UserId};

/// Remote user store: one network round trip per call, no retries.
#[async_trait]
pub trait UserStoreClient: Send + Sync {
    /// Read the full listing in server order.
    async fn list_users(&self) -> Result<Vec<User>, Failure>;

    /// Create a record. On rejection the message joins the server's errors,
    /// defaulting to "Create failed".
    async fn create_user(&self, payload: &MutationPayload) -> Result<(), Failure>;

    /// Update an existing record. Default rejection message is "Update failed".
    async fn update_user(&self, id: UserId, payload: &MutationPayload) -> Result<(), Failure>;

    /// Delete a record. Rejections carry no message.
    async fn delete_user(&self, id: UserId) -> Result<(), Failure>;
}

/// Source of the greeting banner.
#[async_trait]
pub trait GreetingClient: Send + Sync {
    async fn fetch_greeting(&self) -> Result<Greeting, Failure>;
}
