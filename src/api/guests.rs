//! `/guests` endpoints

use reqwest::Method;
use serde::Deserialize;
use crate::models::{Guest, GuestForm, GuestQuery, GuestUpdate, GuestsPage};
use crate::utils::errors::Result;
use crate::utils::helpers::build_query;
use super::{segment, ApiClient};

#[derive(Deserialize)]
struct GuestEnvelope {
    guest: Guest,
}

pub struct GuestsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> GuestsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &GuestQuery) -> Result<GuestsPage> {
        let endpoint = format!("/guests{}", build_query(&query.to_params()));
        self.client.get(&endpoint).await
    }

    pub async fn create(&self, form: &GuestForm) -> Result<Guest> {
        let envelope: GuestEnvelope = self.client.post("/guests", form).await?;
        Ok(envelope.guest)
    }

    pub async fn update(&self, id: &str, update: &GuestUpdate) -> Result<Guest> {
        let envelope: GuestEnvelope = self
            .client
            .put(&format!("/guests/{}", segment(id)), update)
            .await?;
        Ok(envelope.guest)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute::<()>(Method::DELETE, &format!("/guests/{}", segment(id)), None)
            .await
    }
}
