use thiserror::Error;

/// What went wrong, independent of transport details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Local input check failed; no request was issued.
    Validation,
    /// The server answered with a non-2xx status or an unusable body.
    RemoteRejection,
    /// The request never produced a response (connection, TLS, timeout).
    Network,
}

/// Normalized outcome of a failed users operation.
///
/// `message` is human-readable text suitable for display, when there is any.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", display_text(.kind, .message))]
pub struct Failure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

#[allow(clippy::ref_option)]
fn display_text<'a>(kind: &FailureKind, message: &'a Option<String>) -> &'a str {
    message.as_deref().unwrap_or(kind.label())
}

impl FailureKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FailureKind::Validation => "validation failed",
            FailureKind::RemoteRejection => "request rejected by server",
            FailureKind::Network => "network failure",
        }
    }
}

impl Failure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RemoteRejection,
            message: Some(message.into()),
        }
    }

    /// Rejection without any detail (used by delete).
    #[must_use]
    pub fn rejected_silently() -> Self {
        Self {
            kind: FailureKind::RemoteRejection,
            message: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_message() {
        assert_eq!(
            Failure::rejected("Email is invalid").to_string(),
            "Email is invalid"
        );
        assert_eq!(
            Failure::rejected_silently().to_string(),
            "request rejected by server"
        );
    }
}
