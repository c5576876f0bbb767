//! Transfer model and the driver-side status progression

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::driver::Driver;
use super::event::Event;
use super::guest::Guest;
use super::reference::{Entity, Ref};
use super::status::TransferStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub guest_id: Ref<Guest>,
    pub driver_id: Ref<Driver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Ref<Event>>,
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Transfer {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Transfer {
    pub fn guest(&self) -> Option<&Guest> {
        self.guest_id.resolved()
    }

    pub fn event(&self) -> Option<&Event> {
        self.event_id.as_ref().and_then(Ref::resolved)
    }

    /// Address the driver should head to right now, if any
    pub fn current_destination(&self) -> Option<&str> {
        let guest = self.guest()?;
        match self.status {
            TransferStatus::Accepted | TransferStatus::Arrived => Some(guest.pickup_address.as_str()),
            TransferStatus::InProgress => Some(guest.dropoff_address.as_str()),
            _ => None,
        }
    }
}

impl TransferStatus {
    /// The status a driver advances to from here
    pub fn next(&self) -> Option<TransferStatus> {
        match self {
            TransferStatus::Pending => Some(TransferStatus::Accepted),
            TransferStatus::Accepted => Some(TransferStatus::Arrived),
            TransferStatus::Arrived => Some(TransferStatus::InProgress),
            TransferStatus::InProgress => Some(TransferStatus::Completed),
            TransferStatus::Completed | TransferStatus::Declined => None,
        }
    }

    /// Still on the driver's task list
    pub fn is_active(&self) -> bool {
        !matches!(self, TransferStatus::Completed | TransferStatus::Declined)
    }

    /// Only offers that have not been accepted can be declined
    pub fn can_decline(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }

    /// Translation key for the button that advances from this status
    pub fn action_label_key(&self) -> Option<&'static str> {
        match self {
            TransferStatus::Pending => Some("driver.accept"),
            TransferStatus::Accepted => Some("driver.markAsArrived"),
            TransferStatus::Arrived => Some("driver.markAsPickedUp"),
            TransferStatus::InProgress => Some("driver.markAsCompleted"),
            _ => None,
        }
    }
}

/// Body for assigning a driver to a guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub guest_id: String,
    pub driver_id: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransferStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferQuery {
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

impl TransferQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("limit", self.limit.map(|l| l.to_string())),
            ("sort", self.sort.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransfersPage {
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_progression() {
        let mut status = TransferStatus::Pending;
        let mut visited = vec![status];
        while let Some(next) = status.next() {
            status = next;
            visited.push(status);
        }
        assert_eq!(
            visited,
            vec![
                TransferStatus::Pending,
                TransferStatus::Accepted,
                TransferStatus::Arrived,
                TransferStatus::InProgress,
                TransferStatus::Completed,
            ]
        );
        assert_eq!(TransferStatus::Declined.next(), None);
    }

    #[test]
    fn test_active_and_decline_rules() {
        assert!(TransferStatus::Arrived.is_active());
        assert!(!TransferStatus::Declined.is_active());
        assert!(!TransferStatus::Completed.is_active());
        assert!(TransferStatus::Pending.can_decline());
        assert!(!TransferStatus::Accepted.can_decline());
        assert_eq!(TransferStatus::Completed.action_label_key(), None);
    }

    #[test]
    fn test_destination_follows_status() {
        let mut transfer: Transfer = serde_json::from_value(json!({
            "id": "t1",
            "guestId": {"id": "g1", "name": "Leyla", "pickupAddress": "Airport", "dropoffAddress": "Hotel"},
            "driverId": "d1",
            "eventId": {"id": "e1", "name": "Gala", "date": "2025-01-01", "time": "19:00"},
            "status": "accepted"
        }))
        .unwrap();
        assert_eq!(transfer.current_destination(), Some("Airport"));
        transfer.status = TransferStatus::InProgress;
        assert_eq!(transfer.current_destination(), Some("Hotel"));
        transfer.status = TransferStatus::Pending;
        assert_eq!(transfer.current_destination(), None);
        assert_eq!(transfer.event().map(|e| e.time.as_str()), Some("19:00"));
    }
}
