use std::sync::Arc;

use shared::{
    domain::VolunteerId,
    protocol::{HealthCenterRecord, VolunteerRecord},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

pub mod coordinator;
pub mod dates;
pub mod edit;
pub mod error;
pub mod notify;
pub mod pagination;
pub mod render;
pub mod roster;
pub mod store;

pub use coordinator::{DeleteOutcome, MutationCoordinator, UpdateOutcome};
pub use edit::{DraftField, EditDraft, EditSession};
pub use error::{DraftError, StoreError};
pub use notify::{Confirmation, NoticeKind, NotificationGateway};
pub use pagination::{PageCursor, PageView, QueryState, DEFAULT_PAGE_SIZE};
pub use render::{RenderedPage, RosterRow};
pub use roster::Roster;
pub use store::{HttpRecordStore, MissingRecordStore, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Rows per page, fixed for the whole session.
    pub page_size: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Something a front end should re-render for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    RosterLoaded { count: usize },
    HealthCentersLoaded { count: usize },
    VolunteerRemoved { id: VolunteerId },
    VolunteerUpdated { id: VolunteerId },
    QueryChanged,
    PageChanged { page: usize },
    EditOpened { id: VolunteerId },
    EditClosed,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) roster: Roster,
    pub(crate) query: QueryState,
    pub(crate) cursor: PageCursor,
    pub(crate) health_centers: Vec<HealthCenterRecord>,
    pub(crate) edit: EditSession,
    /// Last ticket handed to a submission.
    pub(crate) submissions: u64,
}

/// One console session over the volunteer roster.
///
/// Owns the roster, search text, page cursor, health centers and the edit
/// modal. The roster is written only by the mutation workflows, query and
/// cursor only by their setters; everything shown is re-derived from them.
pub struct RecordBrowser {
    store: Arc<dyn RecordStore>,
    coordinator: MutationCoordinator,
    state: Mutex<SessionState>,
    events: broadcast::Sender<BrowserEvent>,
}

impl RecordBrowser {
    pub fn new(
        config: BrowserConfig,
        store: Arc<dyn RecordStore>,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            coordinator: MutationCoordinator::new(Arc::clone(&store), gateway),
            store,
            state: Mutex::new(SessionState {
                cursor: PageCursor::new(config.page_size),
                ..SessionState::default()
            }),
            events,
        })
    }

    fn emit(&self, event: BrowserEvent) {
        let _ = self.events.send(event);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BrowserEvent> {
        self.events.subscribe()
    }

    /// Fetches volunteers and health centers side by side.
    ///
    /// A failed volunteer fetch leaves the roster empty and is returned; a
    /// failed health center fetch is only logged, the selection list stays
    /// empty.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let (users, centers) =
            tokio::join!(self.store.list_volunteers(), self.store.list_health_centers());

        match centers {
            Ok(centers) => {
                let count = centers.len();
                self.state.lock().await.health_centers = centers;
                info!(count, "health centers loaded");
                self.emit(BrowserEvent::HealthCentersLoaded { count });
            }
            Err(err) => warn!(error = %err, "failed to load health centers"),
        }

        let users = users.map_err(|err| {
            error!(error = %err, "failed to load volunteers");
            err
        })?;
        let fetched = users.len();
        let roster = Roster::from_listing(users);
        let count = roster.len();
        self.state.lock().await.roster = roster;
        info!(fetched, count, "volunteer roster loaded");
        self.emit(BrowserEvent::RosterLoaded { count });
        Ok(count)
    }

    /// Replaces the search text. The page cursor is left where it is.
    pub async fn set_query(&self, text: impl Into<String>) {
        self.state.lock().await.query = QueryState::new(text);
        self.emit(BrowserEvent::QueryChanged);
    }

    /// Moves to `page`; the search text is kept. Page 0 is refused.
    pub async fn go_to_page(&self, page: usize) -> bool {
        let moved = self.state.lock().await.cursor.set_page(page);
        if moved {
            self.emit(BrowserEvent::PageChanged { page });
        }
        moved
    }

    pub async fn current_page(&self) -> PageView {
        let guard = self.state.lock().await;
        pagination::derive_page(&guard.roster, &guard.query, &guard.cursor)
    }

    pub async fn rendered_page(&self) -> RenderedPage {
        let guard = self.state.lock().await;
        let view = pagination::derive_page(&guard.roster, &guard.query, &guard.cursor);
        RenderedPage::from_view(&view, &guard.health_centers)
    }

    pub async fn cursor(&self) -> PageCursor {
        self.state.lock().await.cursor
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query.as_str().to_string()
    }

    pub async fn roster(&self) -> Roster {
        self.state.lock().await.roster.clone()
    }

    pub async fn volunteer(&self, id: VolunteerId) -> Option<VolunteerRecord> {
        self.state.lock().await.roster.get(id).cloned()
    }

    pub async fn health_centers(&self) -> Vec<HealthCenterRecord> {
        self.state.lock().await.health_centers.clone()
    }

    /// Runs the delete workflow for `id`: confirm, call the store, then drop
    /// the row only if the store agreed.
    pub async fn delete(&self, id: VolunteerId) -> DeleteOutcome {
        let outcome = self.coordinator.delete(&self.state, id).await;
        if matches!(outcome, DeleteOutcome::Applied { removed: true }) {
            self.emit(BrowserEvent::VolunteerRemoved { id });
        }
        outcome
    }

    /// Opens the edit modal on the roster row `id`. Returns `None` when the
    /// row is not in the roster.
    pub async fn open_edit(&self, id: VolunteerId) -> Option<EditDraft> {
        let draft = {
            let mut guard = self.state.lock().await;
            let draft = EditDraft::begin(guard.roster.get(id)?);
            coordinator::open_draft(&mut guard.edit, draft.clone());
            draft
        };
        self.emit(BrowserEvent::EditOpened { id });
        Some(draft)
    }

    /// Applies one form change to the open draft. Only an editable draft
    /// accepts input; the roster is never touched.
    pub async fn edit_field(&self, field: DraftField, value: &str) -> Result<EditDraft, DraftError> {
        let mut guard = self.state.lock().await;
        let EditSession::Editing(draft) = &guard.edit else {
            return Err(DraftError::NotEditing);
        };
        let next = draft.set_field(field, value)?;
        guard.edit = EditSession::Editing(next.clone());
        Ok(next)
    }

    /// Closes the modal and throws the draft away. An update already sent
    /// keeps going.
    pub async fn close_edit(&self) {
        let previous = std::mem::take(&mut self.state.lock().await.edit);
        if previous.is_open() {
            self.emit(BrowserEvent::EditClosed);
        }
    }

    pub async fn edit_session(&self) -> EditSession {
        self.state.lock().await.edit.clone()
    }

    /// Sends the open draft to the store and merges it on success.
    pub async fn submit_edit(&self) -> UpdateOutcome {
        let outcome = self.coordinator.submit(&self.state).await;
        match outcome {
            UpdateOutcome::Applied { id, .. } => {
                self.emit(BrowserEvent::VolunteerUpdated { id });
                self.emit(BrowserEvent::EditClosed);
            }
            UpdateOutcome::Dismissed { id, applied: true } => {
                self.emit(BrowserEvent::VolunteerUpdated { id });
            }
            _ => {}
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
