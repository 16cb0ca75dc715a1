//! Public models for the users module.

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier. Immutable after creation.
pub type UserId = i64;

/// A user record as owned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl UserDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Draft prefilled from an existing record (edit flow).
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }

    /// Trim both fields and reject blanks.
    ///
    /// Returns `None` when either field is empty after trimming.
    #[must_use]
    pub fn validate(&self) -> Option<MutationPayload> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return None;
        }
        Some(MutationPayload {
            name: name.to_owned(),
            email: email.to_owned(),
        })
    }
}

/// Validated, trimmed fields sent on create and update. Never carries an id.
///
/// Only obtainable through [`UserDraft::validate`], so a payload in hand is
/// always non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationPayload {
    name: String,
    email: String,
}

impl MutationPayload {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Body of the greeting endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Greeting {
    pub message: String,
}
