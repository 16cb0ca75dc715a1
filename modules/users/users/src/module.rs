//! Wiring for the users module.

use std::sync::Arc;

use tracing::{debug, info};
use users_sdk::{GreetingClient, UserStoreClient};

use crate::config::{ConfigError, UsersConfig};
use crate::domain::controller::UserListController;
use crate::domain::greeting::GreetingService;
use crate::domain::ports::{ConfirmPrompt, Notifier};
use crate::infra::{HttpGreetingClient, HttpUserStore};

/// Assembled users module: one shared HTTP client behind the store and the
/// greeting adapter, plus the controller and greeting service on top.
#[derive(Clone)]
pub struct UsersModule {
    controller: Arc<UserListController>,
    greeting: Arc<GreetingService>,
}

impl UsersModule {
    /// Build the module from config and the interaction ports.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unusable base URL or HTTP client setup failure.
    pub fn init(
        cfg: &UsersConfig,
        confirm: Arc<dyn ConfirmPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        info!(base_url = %cfg.base_url, "Initializing users module");

        let client = cfg.http_client()?;
        let users_url = cfg.endpoint(&["api", "v1", "users"])?;
        let hello_url = cfg.endpoint(&["api", "v1", "hello"])?;
        debug!(%users_url, %hello_url, timeout = ?cfg.request_timeout, "users endpoints resolved");

        let store: Arc<dyn UserStoreClient> = Arc::new(HttpUserStore::new(client.clone(), users_url));
        let greeting_client: Arc<dyn GreetingClient> =
            Arc::new(HttpGreetingClient::new(client, hello_url));

        Ok(Self::from_parts(store, greeting_client, confirm, notifier))
    }

    /// Build the module around existing clients.
    #[must_use]
    pub fn from_parts(
        store: Arc<dyn UserStoreClient>,
        greeting_client: Arc<dyn GreetingClient>,
        confirm: Arc<dyn ConfirmPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let controller = Arc::new(UserListController::new(store, confirm, notifier));
        let greeting = Arc::new(GreetingService::new(greeting_client));
        Self {
            controller,
            greeting,
        }
    }

    #[must_use]
    pub fn controller(&self) -> Arc<UserListController> {
        self.controller.clone()
    }

    #[must_use]
    pub fn greeting(&self) -> Arc<GreetingService> {
        self.greeting.clone()
    }
}
