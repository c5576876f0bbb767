//! `/events` endpoints

use reqwest::Method;
use serde::Deserialize;
use crate::models::{DashboardStats, Event, EventDetail, EventForm, EventQuery, EventUpdate, EventsPage};
use crate::utils::errors::Result;
use crate::utils::helpers::build_query;
use super::{segment, ApiClient};

#[derive(Deserialize)]
struct EventEnvelope {
    event: Event,
}

pub struct EventsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EventsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &EventQuery) -> Result<EventsPage> {
        let endpoint = format!("/events{}", build_query(&query.to_params()));
        self.client.get(&endpoint).await
    }

    /// An event with its guest roster
    pub async fn get(&self, id: &str) -> Result<EventDetail> {
        self.client.get(&format!("/events/{}", segment(id))).await
    }

    pub async fn create(&self, form: &EventForm) -> Result<Event> {
        let envelope: EventEnvelope = self.client.post("/events", form).await?;
        Ok(envelope.event)
    }

    pub async fn update(&self, id: &str, update: &EventUpdate) -> Result<Event> {
        let envelope: EventEnvelope = self
            .client
            .put(&format!("/events/{}", segment(id)), update)
            .await?;
        Ok(envelope.event)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute::<()>(Method::DELETE, &format!("/events/{}", segment(id)), None)
            .await
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.client.get("/events/dashboard/stats").await
    }
}
