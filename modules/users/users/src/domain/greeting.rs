use std::sync::Arc;

use users_sdk::GreetingClient;

/// Shown while no greeting is available.
pub const GREETING_PLACEHOLDER: &str = "Loading...";

/// Loads the greeting banner; never fails.
pub struct GreetingService {
    client: Arc<dyn GreetingClient>,
}

impl GreetingService {
    #[must_use]
    pub fn new(client: Arc<dyn GreetingClient>) -> Self {
        Self { client }
    }

    /// The server message, or [`GREETING_PLACEHOLDER`] when it is empty or
    /// the fetch fails (the failure is logged).
    pub async fn load(&self) -> String {
        match self.client.fetch_greeting().await {
            Ok(greeting) if !greeting.message.is_empty() => greeting.message,
            Ok(_) => GREETING_PLACEHOLDER.to_owned(),
            Err(failure) => {
                tracing::warn!(error = %failure, kind = ?failure.kind, "greeting fetch failed");
                GREETING_PLACEHOLDER.to_owned()
            }
        }
    }
}
