//! Users Module Implementation
//!
//! The public API is defined in `roster-users-sdk` and re-exported here.

pub use users_sdk::{
    Failure, FailureKind, Greeting, GreetingClient, MutationPayload, User, UserDraft, UserId,
    UserStoreClient,
};

pub mod module;
pub use module::UsersModule;

pub mod config;
pub use config::{ConfigError, UsersConfig};

pub mod domain;
pub use domain::controller::{DeleteOutcome, UserListController};
pub use domain::greeting::{GREETING_PLACEHOLDER, GreetingService};
pub use domain::ports::{ConfirmPrompt, Notifier};
pub use domain::state::{FormMode, FormState, UserListState};

#[doc(hidden)]
pub mod infra;
