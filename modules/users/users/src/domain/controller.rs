//! Controller behind the user management screen.
//!
//! Owns the only copy of [`UserListState`], talks to the remote store, and
//! re-reads the whole listing after every successful mutation. The listing is
//! always replaced wholesale, never patched from local input.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};
use tracing::instrument;
use users_sdk::{Failure, User, UserDraft, UserId, UserStoreClient};

use super::ports::{ConfirmPrompt, Notifier};
use super::state::{FormMode, FormState, UserListState};

/// Local validation message for blank name or email.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and email are required.";
/// Form error used when a failure carries no message of its own.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed";
pub const DELETE_CONFIRMATION: &str = "Delete this user?";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete the user.";

/// Result of a delete gesture that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; no request was sent.
    Cancelled,
    Deleted,
}

#[derive(Default)]
struct Inner {
    view: UserListState,
    /// Ticket of the listing currently shown
    applied_ticket: u64,
    /// Refreshes started but not finished
    in_flight: usize,
}

impl Inner {
    fn finish_refresh(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.view.loading = self.in_flight > 0;
    }
}

/// One outstanding refresh. Dropping it unsettled, e.g. when the refresh
/// future is cancelled, still releases its share of `loading`.
struct InFlight<'a> {
    ctl: &'a UserListController,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn start(ctl: &'a UserListController) -> Self {
        let mut inner = ctl.inner.lock();
        inner.in_flight += 1;
        inner.view.loading = true;
        Self { ctl, armed: true }
    }

    /// Release the slot and keep the lock for applying the result.
    fn settle(mut self) -> MutexGuard<'a, Inner> {
        self.armed = false;
        let mut inner = self.ctl.inner.lock();
        inner.finish_refresh();
        inner
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && !self.ctl.is_detached() {
            self.ctl.inner.lock().finish_refresh();
        }
    }
}

/// Stateful orchestrator for list, create, update and delete.
///
/// Methods take `&self`, so gestures may overlap; the state lock is never
/// held across an `.await`.
pub struct UserListController {
    store: Arc<dyn UserStoreClient>,
    confirm: Arc<dyn ConfirmPrompt>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
    next_ticket: AtomicU64,
    detached: AtomicBool,
}

impl UserListController {
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStoreClient>,
        confirm: Arc<dyn ConfirmPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            confirm,
            notifier,
            inner: Mutex::new(Inner::default()),
            next_ticket: AtomicU64::new(0),
            detached: AtomicBool::new(false),
        }
    }

    /// Copy of the current screen state.
    #[must_use]
    pub fn snapshot(&self) -> UserListState {
        self.inner.lock().view.clone()
    }

    /// Open an empty form for a new record.
    pub fn request_new(&self) {
        self.update(|view| view.form = FormState::creating());
    }

    /// Open the form prefilled with `target`.
    pub fn request_edit(&self, target: User) {
        self.update(|view| view.form = FormState::editing(target));
    }

    /// Close the form and discard its input.
    pub fn cancel(&self) {
        self.update(|view| view.form = FormState::default());
    }

    /// Record in-progress input while the form is open.
    pub fn update_draft(&self, draft: UserDraft) {
        self.update(|view| {
            if view.form_visible() {
                view.form.draft = draft;
            }
        });
    }

    /// Stop applying results. In-flight calls finish without touching state.
    pub fn teardown(&self) {
        self.detached.store(true, Ordering::SeqCst);
        tracing::debug!("user list controller detached");
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Re-read the listing and replace `users` wholesale.
    ///
    /// `loading` stays true while any refresh is outstanding. A listing that
    /// was requested before the one currently shown is discarded, so the view
    /// never regresses to older data.
    ///
    /// # Errors
    /// Returns the store failure; the previous listing is kept.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<(), Failure> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let slot = (!self.is_detached()).then(|| InFlight::start(self));

        let result = self.store.list_users().await;

        let Some(slot) = slot else {
            return result.map(drop);
        };
        if self.is_detached() {
            return result.map(drop);
        }
        let mut inner = slot.settle();

        match result {
            Ok(users) => {
                if ticket > inner.applied_ticket {
                    inner.applied_ticket = ticket;
                    tracing::debug!(count = users.len(), ticket, "user listing applied");
                    inner.view.users = users;
                } else {
                    tracing::debug!(
                        ticket,
                        applied = inner.applied_ticket,
                        "stale user listing discarded"
                    );
                }
                Ok(())
            }
            Err(failure) => {
                tracing::warn!(error = %failure, kind = ?failure.kind, "user listing failed");
                Err(failure)
            }
        }
    }

    /// Validate and save `draft`: update when `target_id` is set, create otherwise.
    ///
    /// Blank name or email fails locally without any request. On success the
    /// form closes, unless another form was opened meanwhile, and the listing
    /// is refreshed (a failed refresh is logged and
    /// keeps the previous listing). On failure the form stays open with the
    /// input intact and the failure message shown.
    ///
    /// # Errors
    /// Returns the validation or store failure.
    #[instrument(skip_all, fields(target_id = ?target_id))]
    pub async fn submit(&self, draft: UserDraft, target_id: Option<UserId>) -> Result<(), Failure> {
        let Some(payload) = draft.validate() else {
            self.update(|view| {
                view.form.draft = draft;
                view.form.error = Some(REQUIRED_FIELDS_MESSAGE.to_owned());
            });
            return Err(Failure::validation(REQUIRED_FIELDS_MESSAGE));
        };

        let mut submitted_mode = FormMode::Closed;
        self.update(|view| {
            view.form.draft = draft;
            view.form.error = None;
            submitted_mode = view.form.mode.clone();
        });

        let result = match target_id {
            Some(id) => self.store.update_user(id, &payload).await,
            None => self.store.create_user(&payload).await,
        };

        if let Err(failure) = result {
            let message = failure
                .message
                .clone()
                .unwrap_or_else(|| SUBMISSION_FAILED_MESSAGE.to_owned());
            self.update(|view| view.form.error = Some(message));
            return Err(failure);
        }

        if self.is_detached() {
            return Ok(());
        }
        self.update(|view| {
            if view.form.mode == submitted_mode {
                view.form = FormState::default();
            }
        });
        if let Err(failure) = self.refresh().await {
            tracing::warn!(error = %failure, "refresh after save failed; keeping previous listing");
        }
        Ok(())
    }

    /// Submit the open form, targeting the record being edited if any.
    ///
    /// # Errors
    /// Same as [`submit`](Self::submit).
    pub async fn submit_form(&self, draft: UserDraft) -> Result<(), Failure> {
        let target_id = self.inner.lock().view.editing_target().map(|u| u.id);
        self.submit(draft, target_id).await
    }

    /// Delete `id` after explicit confirmation, then refresh.
    ///
    /// A declined confirmation sends nothing. A failed deletion raises an
    /// alert through the notifier.
    ///
    /// # Errors
    /// Returns the store failure when the deletion is rejected.
    #[instrument(skip_all, fields(user_id = id))]
    pub async fn delete_user(&self, id: UserId) -> Result<DeleteOutcome, Failure> {
        if !self.confirm.confirm(DELETE_CONFIRMATION).await {
            tracing::info!("deletion cancelled by user");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(failure) = self.store.delete_user(id).await {
            if !self.is_detached() {
                self.notifier.alert(DELETE_FAILED_MESSAGE);
            }
            return Err(failure);
        }

        if !self.is_detached()
            && let Err(failure) = self.refresh().await
        {
            tracing::warn!(error = %failure, "refresh after delete failed; keeping previous listing");
        }
        Ok(DeleteOutcome::Deleted)
    }

    fn update(&self, f: impl FnOnce(&mut UserListState)) {
        if self.is_detached() {
            return;
        }
        f(&mut self.inner.lock().view);
    }
}
