use async_trait::async_trait;
use roster_http::HttpClient;
use serde::Serialize;
use tracing::instrument;
use url::Url;
use users_sdk::{Failure, MutationPayload, User, UserId, UserStoreClient};

use super::error_body::rejection_message;
use super::failure_from_http;

pub const LIST_FAILED: &str = "List failed";
pub const CREATE_FAILED: &str = "Create failed";
pub const UPDATE_FAILED: &str = "Update failed";

/// Request envelope: `{ "user": { "name": .., "email": .. } }`.
#[derive(Serialize)]
struct UserEnvelope<'a> {
    user: &'a MutationPayload,
}

/// REST adapter implementing [`UserStoreClient`] against `/api/v1/users`.
///
/// `HttpClient` is `Clone + Send + Sync`, so no external locking is needed.
pub struct HttpUserStore {
    client: HttpClient,
    /// `{base}/api/v1/users`
    collection: Url,
}

impl HttpUserStore {
    #[must_use]
    pub fn new(client: HttpClient, collection: Url) -> Self {
        Self { client, collection }
    }

    /// `{collection}/{id}`; `UsersConfig::validate` guarantees the base can carry a path.
    fn member_url(&self, id: UserId) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    async fn send_mutation(
        &self,
        request: roster_http::RequestBuilder,
        payload: &MutationPayload,
        default_message: &str,
    ) -> Result<(), Failure> {
        let response = request
            .json(&UserEnvelope { user: payload })
            .map_err(|e| failure_from_http(&e))?
            .send()
            .await
            .map_err(|e| failure_from_http(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // An unreadable body still counts as a rejection with the default message
        let body = response.bytes().await.unwrap_or_default();
        let message = rejection_message(&body, default_message);
        tracing::warn!(%status, %message, "user mutation rejected");
        Err(Failure::rejected(message))
    }
}

#[async_trait]
impl UserStoreClient for HttpUserStore {
    #[instrument(skip_all, fields(url = %self.collection))]
    async fn list_users(&self) -> Result<Vec<User>, Failure> {
        let response = self
            .client
            .get(self.collection.as_str())
            .send()
            .await
            .map_err(|e| failure_from_http(&e))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "user listing rejected");
            return Err(Failure::rejected(LIST_FAILED));
        }

        let users: Vec<User> = response.json().await.map_err(|e| failure_from_http(&e))?;
        tracing::debug!(count = users.len(), "user listing fetched");
        Ok(users)
    }

    #[instrument(skip_all, fields(url = %self.collection))]
    async fn create_user(&self, payload: &MutationPayload) -> Result<(), Failure> {
        let request = self.client.post(self.collection.as_str());
        self.send_mutation(request, payload, CREATE_FAILED).await
    }

    #[instrument(skip_all, fields(user_id = id))]
    async fn update_user(&self, id: UserId, payload: &MutationPayload) -> Result<(), Failure> {
        let request = self.client.put(self.member_url(id).as_str());
        self.send_mutation(request, payload, UPDATE_FAILED).await
    }

    #[instrument(skip_all, fields(user_id = id))]
    async fn delete_user(&self, id: UserId) -> Result<(), Failure> {
        let response = self
            .client
            .delete(self.member_url(id).as_str())
            .send()
            .await
            .map_err(|e| failure_from_http(&e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            tracing::warn!(status = %response.status(), "user deletion rejected");
            Err(Failure::rejected_silently())
        }
    }
}
