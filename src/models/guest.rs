//! Guest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::utils::errors::ValidationError;
use super::driver::Driver;
use super::event::Event;
use super::reference::{Entity, Ref};
use super::status::GuestStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Ref<Event>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub dropoff_address: String,
    #[serde(default)]
    pub assigned_driver_id: Option<Ref<Driver>>,
    #[serde(default)]
    pub status: GuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Guest {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Guest {
    pub fn assigned_driver(&self) -> Option<&Driver> {
        self.assigned_driver_id.as_ref().and_then(Ref::resolved)
    }

    pub fn has_assigned_driver(&self) -> bool {
        self.assigned_driver_id.is_some()
    }
}

/// Body for adding a guest to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestForm {
    pub name: String,
    pub phone: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl GuestForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("pickupAddress", &self.pickup_address),
            ("dropoffAddress", &self.dropoff_address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GuestUpdate {
    pub fn apply_to(&self, guest: &mut Guest) {
        if let Some(ref name) = self.name {
            guest.name = name.clone();
        }
        if let Some(ref phone) = self.phone {
            guest.phone = phone.clone();
        }
        if let Some(ref pickup) = self.pickup_address {
            guest.pickup_address = pickup.clone();
        }
        if let Some(ref dropoff) = self.dropoff_address {
            guest.dropoff_address = dropoff.clone();
        }
        if let Some(ref notes) = self.notes {
            guest.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestQuery {
    pub event_id: Option<String>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

impl GuestQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("eventId", self.event_id.clone()),
            ("limit", self.limit.map(|l| l.to_string())),
            ("sort", self.sort.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestsPage {
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assigned_driver_as_bare_id() {
        let guest: Guest = serde_json::from_value(json!({
            "id": "g1", "eventId": "e1", "name": "Leyla", "phone": "+994",
            "pickupAddress": "Airport", "dropoffAddress": "Hotel",
            "assignedDriverId": "d1", "status": "assigned"
        }))
        .unwrap();
        assert!(guest.has_assigned_driver());
        assert!(guest.assigned_driver().is_none());
        assert_eq!(guest.assigned_driver_id.as_ref().map(|r| r.id()), Some("d1"));
        assert_eq!(guest.event_id.as_ref().map(|r| r.id()), Some("e1"));
    }

    #[test]
    fn test_assigned_driver_populated() {
        let guest: Guest = serde_json::from_value(json!({
            "id": "g1", "name": "Leyla",
            "assignedDriverId": {"id": "d1", "name": "Rauf", "phone": "+994 50"},
            "status": "accepted"
        }))
        .unwrap();
        assert_eq!(guest.assigned_driver().map(|d| d.name.as_str()), Some("Rauf"));
    }

    #[test]
    fn test_unassigned_guest() {
        let guest: Guest = serde_json::from_value(json!({
            "id": "g2", "name": "Kamal", "assignedDriverId": null
        }))
        .unwrap();
        assert!(!guest.has_assigned_driver());
        assert_eq!(guest.status, GuestStatus::Pending);
    }

    #[test]
    fn test_form_validation() {
        let form = GuestForm {
            name: "Leyla".into(),
            phone: "".into(),
            pickup_address: "Airport".into(),
            dropoff_address: "Hotel".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::Required { field: "phone" }));
    }
}
