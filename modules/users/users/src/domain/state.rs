use users_sdk::{User, UserDraft};

/// Which form, if any, is open.
///
/// Editing carries its target, so "editing target implies form visible"
/// cannot be violated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Creating,
    Editing(User),
}

/// Form contents: current input plus the error shown above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: UserDraft,
    pub error: Option<String>,
}

impl FormState {
    pub(crate) fn creating() -> Self {
        Self {
            mode: FormMode::Creating,
            ..Self::default()
        }
    }

    pub(crate) fn editing(target: User) -> Self {
        Self {
            draft: UserDraft::from_user(&target),
            mode: FormMode::Editing(target),
            error: None,
        }
    }
}

/// Everything the user list screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListState {
    /// Last successful listing, in server order.
    pub users: Vec<User>,
    pub loading: bool,
    pub form: FormState,
}

impl UserListState {
    #[must_use]
    pub fn form_visible(&self) -> bool {
        !matches!(self.form.mode, FormMode::Closed)
    }

    #[must_use]
    pub fn editing_target(&self) -> Option<&User> {
        match &self.form.mode {
            FormMode::Editing(user) => Some(user),
            FormMode::Closed | FormMode::Creating => None,
        }
    }
}
