//! `/transfers` endpoints

use reqwest::Method;
use serde_json::Value;
use crate::models::{NewTransfer, Transfer, TransferQuery, TransferUpdate, TransfersPage};
use crate::utils::errors::Result;
use crate::utils::helpers::build_query;
use super::{optional_field, segment, ApiClient};

pub struct TransfersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TransfersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &TransferQuery) -> Result<TransfersPage> {
        let endpoint = format!("/transfers{}", build_query(&query.to_params()));
        self.client.get(&endpoint).await
    }

    /// Transfers assigned to one driver, with guest and event populated
    pub async fn by_driver(&self, driver_id: &str) -> Result<TransfersPage> {
        self.client
            .get(&format!("/transfers/driver/{}", segment(driver_id)))
            .await
    }

    pub async fn by_event(&self, event_id: &str) -> Result<TransfersPage> {
        self.client
            .get(&format!("/transfers/event/{}", segment(event_id)))
            .await
    }

    /// Assign a driver to a guest. The backend may omit the created record.
    pub async fn create(&self, transfer: &NewTransfer) -> Result<Option<Transfer>> {
        let data: Value = self.client.post("/transfers", transfer).await?;
        optional_field(data, "transfer")
    }

    pub async fn update(&self, id: &str, update: &TransferUpdate) -> Result<Option<Transfer>> {
        let data: Value = self
            .client
            .put(&format!("/transfers/{}", segment(id)), update)
            .await?;
        optional_field(data, "transfer")
    }

    /// Remove whatever transfer currently exists for a guest
    pub async fn delete_for_guest(&self, guest_id: &str) -> Result<()> {
        self.client
            .execute::<()>(
                Method::DELETE,
                &format!("/transfers/guest/{}", segment(guest_id)),
                None,
            )
            .await
    }
}
