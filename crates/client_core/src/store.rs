use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::VolunteerId,
    protocol::{HealthCenterRecord, StoreAck, VolunteerPatch, VolunteerRecord},
};
use tracing::debug;
use url::Url;

use crate::error::StoreError;

/// Remote record store holding users and health centers.
///
/// `Err` means the call itself failed. A completed call that the store
/// refused comes back as `Ok` with `success: false`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>, StoreError>;
    async fn list_health_centers(&self) -> Result<Vec<HealthCenterRecord>, StoreError>;
    async fn update_volunteer(&self, patch: &VolunteerPatch) -> Result<StoreAck, StoreError>;
    async fn delete_volunteer(&self, id: VolunteerId) -> Result<StoreAck, StoreError>;
}

/// Collapses an acknowledgement into the store's message or a rejection.
pub fn acknowledged(ack: StoreAck) -> Result<String, StoreError> {
    if ack.success {
        Ok(ack.message)
    } else {
        Err(StoreError::rejected(ack.message))
    }
}

pub struct MissingRecordStore;

#[async_trait]
impl RecordStore for MissingRecordStore {
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn list_health_centers(&self) -> Result<Vec<HealthCenterRecord>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn update_volunteer(&self, _patch: &VolunteerPatch) -> Result<StoreAck, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn delete_volunteer(&self, _id: VolunteerId) -> Result<StoreAck, StoreError> {
        Err(StoreError::Unavailable)
    }
}

pub struct HttpRecordStore {
    http: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn volunteer_url(&self, id: VolunteerId) -> String {
        format!("{}/usuarios/{id}", self.base_url)
    }
}

async fn read_ack(response: Response) -> Result<StoreAck, StoreError> {
    let status = response.status();
    let body = response.bytes().await?;
    match serde_json::from_slice::<StoreAck>(&body) {
        Ok(mut ack) => {
            if !status.is_success() {
                ack.success = false;
            }
            Ok(ack)
        }
        Err(err) if status.is_success() => Err(StoreError::transport(format!(
            "undecodable acknowledgement: {err}"
        ))),
        Err(_) => Err(StoreError::transport(format!(
            "record store answered {status}"
        ))),
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>, StoreError> {
        let users: Vec<VolunteerRecord> = self
            .http
            .get(format!("{}/usuarios", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    async fn list_health_centers(&self) -> Result<Vec<HealthCenterRecord>, StoreError> {
        let centers: Vec<HealthCenterRecord> = self
            .http
            .get(format!("{}/centros", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = centers.len(), "fetched health centers");
        Ok(centers)
    }

    async fn update_volunteer(&self, patch: &VolunteerPatch) -> Result<StoreAck, StoreError> {
        let response = self
            .http
            .put(self.volunteer_url(patch.id))
            .json(patch)
            .send()
            .await?;
        read_ack(response).await
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> Result<StoreAck, StoreError> {
        let response = self.http.delete(self.volunteer_url(id)).send().await?;
        read_ack(response).await
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
