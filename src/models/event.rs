//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::utils::errors::ValidationError;
use super::reference::Entity;
use super::status::EventStatus;
use super::guest::Guest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub guest_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body for creating an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub name: String,
    pub date: String,
    pub time: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EventForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("name", &self.name),
            ("date", &self.date),
            ("time", &self.time),
            ("address", &self.address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
        }
        Ok(())
    }
}

/// Partial update for an event; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl EventUpdate {
    /// Copy the submitted fields onto a local record
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(ref name) = self.name {
            event.name = name.clone();
        }
        if let Some(ref date) = self.date {
            event.date = date.clone();
        }
        if let Some(ref time) = self.time {
            event.time = time.clone();
        }
        if let Some(ref address) = self.address {
            event.address = address.clone();
        }
        if let Some(ref notes) = self.notes {
            event.notes = Some(notes.clone());
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }
}

/// Filters for listing events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub status: Option<EventStatus>,
    pub date: Option<String>,
}

impl EventQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("limit", self.limit.map(|l| l.to_string())),
            ("sort", self.sort.clone()),
            ("status", self.status.map(|s| s.to_string())),
            ("date", self.date.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub total: u64,
}

/// An event together with its guest roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    pub event: Event,
    #[serde(default)]
    pub guests: Vec<Guest>,
}
