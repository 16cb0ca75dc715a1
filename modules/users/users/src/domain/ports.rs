//! Interaction capabilities injected into the controller.
//!
//! The controller never talks to a terminal or a window directly; it asks
//! these ports, which keeps every decision deterministic under test.

use async_trait::async_trait;

/// Asks the user to approve a destructive action.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// `true` only on an affirmative answer.
    async fn confirm(&self, message: &str) -> bool;
}

/// Any `Fn(&str) -> bool` works as a prompt.
#[async_trait]
impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Blocking, alert-level notification for failures without form context.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

