//! Terminal implementations of the controller's interaction ports.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use users::{ConfirmPrompt, Notifier};

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

#[async_trait]
impl ConfirmPrompt for StdinConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_owned();
        tokio::task::spawn_blocking(move || ask(&message))
            .await
            .unwrap_or(false)
    }
}

fn ask(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    io::stderr().flush().ok();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read confirmation");
            false
        }
    }
}

/// Pre-approved confirmation for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmPrompt for AlwaysConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Only `y` or `yes`, in any case, counts as approval.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES\n", "  yes  \r\n"] {
            assert!(is_affirmative(answer), "answer: {answer}");
        }
        for answer in ["", "\n", "n", "no", "yep", "y e s"] {
            assert!(!is_affirmative(answer), "answer: {answer}");
        }
    }

    #[tokio::test]
    async fn always_confirm_approves() {
        assert!(AlwaysConfirm.confirm("Delete this user?").await);
    }
}
