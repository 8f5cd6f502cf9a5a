//! Delete and update workflows.
//!
//! Neither workflow touches the roster before the store has answered, and
//! the session lock is never held across a store call or a prompt.

use std::sync::Arc;

use shared::domain::VolunteerId;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    edit::{EditDraft, EditSession},
    error::StoreError,
    notify::{NoticeKind, NotificationGateway},
    store::{acknowledged, RecordStore},
    SessionState,
};

pub const CONFIRM_DELETE_TITLE: &str = "Are you sure?";
pub const CONFIRM_DELETE_BODY: &str = "You won't be able to revert this!";
pub const DELETED_TITLE: &str = "Deleted!";
pub const DELETED_BODY: &str = "The volunteer has been deleted.";
pub const UPDATED_TITLE: &str = "Updated!";
pub const UPDATED_BODY: &str = "The volunteer has been updated.";
pub const ERROR_TITLE: &str = "Error";
pub const DELETE_FAILED_BODY: &str = "There was an error deleting the volunteer";
pub const UPDATE_FAILED_BODY: &str = "There was an error updating the volunteer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The prompt was declined or dismissed; nothing was sent.
    Declined,
    /// The store deleted the record. `removed` is false when the roster no
    /// longer held it by the time the answer arrived.
    Applied { removed: bool },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No draft was open.
    NothingToSubmit,
    /// The open draft is already with the store.
    AlreadySubmitting,
    /// The store accepted the draft. `merged` is false when the roster no
    /// longer held the record.
    Applied { id: VolunteerId, merged: bool },
    /// The store refused or could not be reached; the draft is editable again.
    Failed { message: String },
    /// The modal was closed while the draft was with the store. The roster
    /// still follows the store's answer; nothing is shown to the user.
    Dismissed { id: VolunteerId, applied: bool },
}

fn failure_message(err: &StoreError, generic: &str) -> String {
    err.store_message().unwrap_or(generic).to_string()
}

pub struct MutationCoordinator {
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn NotificationGateway>,
}

impl MutationCoordinator {
    pub fn new(store: Arc<dyn RecordStore>, gateway: Arc<dyn NotificationGateway>) -> Self {
        Self { store, gateway }
    }

    pub(crate) async fn delete(&self, state: &Mutex<SessionState>, id: VolunteerId) -> DeleteOutcome {
        let confirmation = self
            .gateway
            .confirm(CONFIRM_DELETE_TITLE, CONFIRM_DELETE_BODY)
            .await;
        if !confirmation.confirmed {
            debug!(volunteer_id = %id, "delete declined");
            return DeleteOutcome::Declined;
        }

        let result = self
            .store
            .delete_volunteer(id)
            .await
            .and_then(acknowledged);

        match result {
            Ok(_) => {
                let removed = state.lock().await.roster.remove(id);
                info!(volunteer_id = %id, removed, "volunteer deleted");
                self.gateway
                    .notify(DELETED_TITLE, DELETED_BODY, NoticeKind::Success);
                DeleteOutcome::Applied { removed }
            }
            Err(err) => {
                warn!(volunteer_id = %id, error = %err, "volunteer delete failed");
                let message = failure_message(&err, DELETE_FAILED_BODY);
                self.gateway.notify(ERROR_TITLE, &message, NoticeKind::Error);
                DeleteOutcome::Failed { message }
            }
        }
    }

    pub(crate) async fn submit(&self, state: &Mutex<SessionState>) -> UpdateOutcome {
        let (draft, ticket) = {
            let mut guard = state.lock().await;
            match std::mem::take(&mut guard.edit) {
                EditSession::Closed => return UpdateOutcome::NothingToSubmit,
                submitting @ EditSession::Submitting { .. } => {
                    guard.edit = submitting;
                    return UpdateOutcome::AlreadySubmitting;
                }
                EditSession::Editing(draft) => {
                    guard.submissions = guard.submissions.wrapping_add(1);
                    let ticket = guard.submissions;
                    guard.edit = EditSession::Submitting {
                        draft: draft.clone(),
                        ticket,
                    };
                    (draft, ticket)
                }
            }
        };
        let id = draft.id();

        let result = self
            .store
            .update_volunteer(draft.patch())
            .await
            .and_then(acknowledged);

        let mut guard = state.lock().await;
        let still_open = is_submitting(&guard.edit, ticket);
        match result {
            Ok(message) => {
                let merged = guard.roster.merge_patch(draft.patch());
                if !still_open {
                    info!(volunteer_id = %id, merged, "update applied after the edit was dismissed");
                    return UpdateOutcome::Dismissed { id, applied: true };
                }
                guard.edit = EditSession::Closed;
                drop(guard);

                info!(volunteer_id = %id, merged, "volunteer updated");
                let body = if message.trim().is_empty() {
                    UPDATED_BODY
                } else {
                    message.as_str()
                };
                self.gateway.notify(UPDATED_TITLE, body, NoticeKind::Success);
                UpdateOutcome::Applied { id, merged }
            }
            Err(err) => {
                if !still_open {
                    warn!(volunteer_id = %id, error = %err, "update failed after the edit was dismissed");
                    return UpdateOutcome::Dismissed { id, applied: false };
                }
                guard.edit = EditSession::Editing(draft);
                drop(guard);

                warn!(volunteer_id = %id, error = %err, "volunteer update failed");
                let message = failure_message(&err, UPDATE_FAILED_BODY);
                self.gateway.notify(ERROR_TITLE, &message, NoticeKind::Error);
                UpdateOutcome::Failed { message }
            }
        }
    }
}

/// True while the modal still waits on the submission holding `ticket`.
/// A reopened modal on the same record carries a newer ticket.
fn is_submitting(session: &EditSession, ticket: u64) -> bool {
    matches!(session, EditSession::Submitting { ticket: current, .. } if *current == ticket)
}

/// Replaces whatever the modal held with a fresh draft.
pub(crate) fn open_draft(session: &mut EditSession, draft: EditDraft) {
    if let EditSession::Submitting { draft: previous, .. } = session {
        debug!(volunteer_id = %previous.id(), "leaving an in-flight update behind");
    }
    *session = EditSession::Editing(draft);
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
