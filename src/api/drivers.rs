//! `/drivers` endpoints

use reqwest::Method;
use serde::Deserialize;
use crate::models::{
    BusyStatusUpdate, Driver, DriverForm, DriverQuery, DriverStats, DriverUpdate, DriversPage,
    PasswordChange,
};
use crate::utils::errors::Result;
use crate::utils::helpers::build_query;
use super::{segment, ApiClient};

#[derive(Deserialize)]
struct DriverEnvelope {
    driver: Driver,
}

pub struct DriversApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DriversApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &DriverQuery) -> Result<DriversPage> {
        let endpoint = format!("/drivers{}", build_query(&query.to_params()));
        self.client.get(&endpoint).await
    }

    pub async fn create(&self, form: &DriverForm) -> Result<Driver> {
        let envelope: DriverEnvelope = self.client.post("/drivers", form).await?;
        Ok(envelope.driver)
    }

    pub async fn update(&self, id: &str, update: &DriverUpdate) -> Result<Driver> {
        let envelope: DriverEnvelope = self
            .client
            .put(&format!("/drivers/{}", segment(id)), update)
            .await?;
        Ok(envelope.driver)
    }

    pub async fn change_password(&self, id: &str, change: &PasswordChange) -> Result<()> {
        self.client
            .execute(
                Method::PUT,
                &format!("/drivers/{}/change-password", segment(id)),
                Some(change),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute::<()>(Method::DELETE, &format!("/drivers/{}", segment(id)), None)
            .await
    }

    pub async fn stats(&self) -> Result<DriverStats> {
        self.client.get("/drivers/dashboard/stats").await
    }

    /// Toggle the calling driver between available and offline
    pub async fn update_busy_status(&self, update: &BusyStatusUpdate) -> Result<Driver> {
        let envelope: DriverEnvelope = self.client.put("/drivers/me/busy-status", update).await?;
        Ok(envelope.driver)
    }
}
