use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use shared::{
    domain::{Credential, Department, HealthCenterId, RoleCode, VolunteerId},
    protocol::{HealthCenterRecord, HealthCenterRef, StoreAck, VolunteerPatch, VolunteerRecord},
};
use tokio::sync::{oneshot, Mutex};

use crate::{
    error::StoreError,
    notify::{Confirmation, NoticeKind, NotificationGateway},
    store::RecordStore,
    BrowserConfig, RecordBrowser,
};

pub(crate) fn volunteer(id: i64) -> VolunteerRecord {
    VolunteerRecord {
        id: VolunteerId(id),
        full_name: format!("Volunteer {id}"),
        national_id: format!("4000000{id}"),
        address: format!("Calle {id}"),
        email: format!("v{id}@example.org"),
        birth_date: Some("1990-05-01".to_string()),
        department: Some(Department::Lima),
        health_center_id: Some(HealthCenterId(1)),
        health_center: Some(HealthCenterRef {
            id: HealthCenterId(1),
            name: "Centro Miraflores".to_string(),
        }),
        role: Some(RoleCode::VOLUNTEER),
        password: Some(Credential::new(format!("pw{id}"))),
    }
}

pub(crate) fn with_role(mut record: VolunteerRecord, role: i64) -> VolunteerRecord {
    record.role = Some(RoleCode(role));
    record
}

pub(crate) fn centers() -> Vec<HealthCenterRecord> {
    vec![
        HealthCenterRecord {
            id: HealthCenterId(1),
            name: "Centro Miraflores".to_string(),
        },
        HealthCenterRecord {
            id: HealthCenterId(2),
            name: "Posta Surquillo".to_string(),
        },
    ]
}

type ScriptedUpdate = (oneshot::Receiver<()>, Result<StoreAck, StoreError>);

pub(crate) struct FakeStore {
    users: Vec<VolunteerRecord>,
    centers: Vec<HealthCenterRecord>,
    list_error: Option<StoreError>,
    centers_error: Option<StoreError>,
    delete_reply: Mutex<Result<StoreAck, StoreError>>,
    update_reply: Mutex<Result<StoreAck, StoreError>>,
    delete_gates: Mutex<HashMap<VolunteerId, oneshot::Receiver<()>>>,
    update_gate: Mutex<Option<oneshot::Receiver<()>>>,
    scripted_updates: Mutex<VecDeque<ScriptedUpdate>>,
    pub(crate) deletes: Mutex<Vec<VolunteerId>>,
    pub(crate) updates: Mutex<Vec<VolunteerPatch>>,
}

impl FakeStore {
    pub(crate) fn with_users(users: Vec<VolunteerRecord>) -> Self {
        Self {
            users,
            centers: centers(),
            list_error: None,
            centers_error: None,
            delete_reply: Mutex::new(Ok(StoreAck::ok("deleted"))),
            update_reply: Mutex::new(Ok(StoreAck::ok("Usuario actualizado"))),
            delete_gates: Mutex::new(HashMap::new()),
            update_gate: Mutex::new(None),
            scripted_updates: Mutex::new(VecDeque::new()),
            deletes: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_listing(err: StoreError) -> Self {
        let mut store = Self::with_users(Vec::new());
        store.list_error = Some(err);
        store
    }

    pub(crate) fn without_centers(mut self, err: StoreError) -> Self {
        self.centers_error = Some(err);
        self
    }

    pub(crate) fn delete_replies(self, reply: Result<StoreAck, StoreError>) -> Self {
        Self {
            delete_reply: Mutex::new(reply),
            ..self
        }
    }

    pub(crate) fn update_replies(self, reply: Result<StoreAck, StoreError>) -> Self {
        Self {
            update_reply: Mutex::new(reply),
            ..self
        }
    }

    /// Holds the delete of `id` until the returned sender fires.
    pub(crate) async fn gate_delete(&self, id: VolunteerId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.delete_gates.lock().await.insert(id, rx);
        tx
    }

    pub(crate) async fn gate_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.update_gate.lock().await = Some(rx);
        tx
    }

    /// Queues the answer for the next update call; it is held until the
    /// returned sender fires. Queued answers are used in call order.
    pub(crate) async fn script_update(
        &self,
        reply: Result<StoreAck, StoreError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripted_updates.lock().await.push_back((rx, reply));
        tx
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>, StoreError> {
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.users.clone()),
        }
    }

    async fn list_health_centers(&self) -> Result<Vec<HealthCenterRecord>, StoreError> {
        match &self.centers_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.centers.clone()),
        }
    }

    async fn update_volunteer(&self, patch: &VolunteerPatch) -> Result<StoreAck, StoreError> {
        self.updates.lock().await.push(patch.clone());
        let scripted = self.scripted_updates.lock().await.pop_front();
        if let Some((gate, reply)) = scripted {
            let _ = gate.await;
            return reply;
        }
        let gate = self.update_gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.update_reply.lock().await.clone()
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> Result<StoreAck, StoreError> {
        self.deletes.lock().await.push(id);
        let gate = self.delete_gates.lock().await.remove(&id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.delete_reply.lock().await.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) kind: NoticeKind,
}

pub(crate) struct RecordingGateway {
    answer: bool,
    pub(crate) prompts: std::sync::Mutex<Vec<(String, String)>>,
    pub(crate) notices: std::sync::Mutex<Vec<Notice>>,
}

impl RecordingGateway {
    pub(crate) fn answering(confirmed: bool) -> Self {
        Self {
            answer: confirmed,
            prompts: std::sync::Mutex::new(Vec::new()),
            notices: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices").clone()
    }

    pub(crate) fn prompt_count(&self) -> usize {
        self.prompts.lock().expect("prompts").len()
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn confirm(&self, title: &str, body: &str) -> Confirmation {
        self.prompts
            .lock()
            .expect("prompts")
            .push((title.to_string(), body.to_string()));
        Confirmation {
            confirmed: self.answer,
        }
    }

    fn notify(&self, title: &str, body: &str, kind: NoticeKind) {
        self.notices.lock().expect("notices").push(Notice {
            title: title.to_string(),
            body: body.to_string(),
            kind,
        });
    }
}

pub(crate) async fn loaded_browser(
    page_size: usize,
    store: FakeStore,
    gateway: RecordingGateway,
) -> (Arc<RecordBrowser>, Arc<FakeStore>, Arc<RecordingGateway>) {
    let store = Arc::new(store);
    let gateway = Arc::new(gateway);
    let browser = RecordBrowser::new(
        BrowserConfig { page_size },
        Arc::clone(&store) as Arc<dyn RecordStore>,
        Arc::clone(&gateway) as Arc<dyn NotificationGateway>,
    );
    browser.load().await.expect("load roster");
    (browser, store, gateway)
}
