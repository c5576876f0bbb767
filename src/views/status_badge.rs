//! Status badges: colour tone plus translated label for every status value

use crate::i18n::I18n;
use crate::models::{DriverStatus, EventStatus, GuestStatus, TransferStatus};
use crate::utils::errors::{Result, TransferError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Muted,
    Accent,
    Success,
    Warning,
    Danger,
}

impl BadgeTone {
    pub fn background(&self) -> &'static str {
        match self {
            BadgeTone::Muted => "bg-muted",
            BadgeTone::Accent => "bg-accent/20",
            BadgeTone::Success => "bg-success/20",
            BadgeTone::Warning => "bg-warning/20",
            BadgeTone::Danger => "bg-destructive/20",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            BadgeTone::Muted => "text-muted-foreground",
            BadgeTone::Accent => "text-accent",
            BadgeTone::Success => "text-success",
            BadgeTone::Warning => "text-warning",
            BadgeTone::Danger => "text-destructive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub tone: BadgeTone,
    pub label_key: &'static str,
}

impl Badge {
    const fn new(tone: BadgeTone, label_key: &'static str) -> Self {
        Self { tone, label_key }
    }

    pub fn background(&self) -> &'static str {
        self.tone.background()
    }

    pub fn text(&self) -> &'static str {
        self.tone.text()
    }

    pub fn label(&self, i18n: &I18n, lang: &str) -> String {
        i18n.t(self.label_key, lang, None)
    }
}

const PLANNING: Badge = Badge::new(BadgeTone::Muted, "status.planning");
const IN_PROGRESS: Badge = Badge::new(BadgeTone::Accent, "status.inProgress");
const COMPLETED: Badge = Badge::new(BadgeTone::Success, "status.completed");
const PENDING: Badge = Badge::new(BadgeTone::Muted, "status.pending");
const ASSIGNED: Badge = Badge::new(BadgeTone::Accent, "status.assigned");
const ACCEPTED: Badge = Badge::new(BadgeTone::Accent, "status.accepted");
const ARRIVED: Badge = Badge::new(BadgeTone::Warning, "status.arrived");
const PICKED_UP: Badge = Badge::new(BadgeTone::Warning, "status.pickedUp");
const AVAILABLE: Badge = Badge::new(BadgeTone::Success, "status.available");
const ON_TRIP: Badge = Badge::new(BadgeTone::Accent, "status.onTrip");
const OFFLINE: Badge = Badge::new(BadgeTone::Muted, "status.offline");
const DECLINED: Badge = Badge::new(BadgeTone::Danger, "status.declined");

pub trait HasBadge {
    fn badge(&self) -> Badge;
}

impl HasBadge for EventStatus {
    fn badge(&self) -> Badge {
        match self {
            EventStatus::Planning => PLANNING,
            EventStatus::InProgress => IN_PROGRESS,
            EventStatus::Completed => COMPLETED,
        }
    }
}

impl HasBadge for GuestStatus {
    fn badge(&self) -> Badge {
        match self {
            GuestStatus::Pending => PENDING,
            GuestStatus::Assigned => ASSIGNED,
            GuestStatus::Accepted => ACCEPTED,
            GuestStatus::Arrived => ARRIVED,
            GuestStatus::PickedUp => PICKED_UP,
            GuestStatus::Completed => COMPLETED,
        }
    }
}

impl HasBadge for DriverStatus {
    fn badge(&self) -> Badge {
        match self {
            DriverStatus::Available => AVAILABLE,
            DriverStatus::OnTrip => ON_TRIP,
            DriverStatus::Offline => OFFLINE,
        }
    }
}

impl HasBadge for TransferStatus {
    fn badge(&self) -> Badge {
        match self {
            TransferStatus::Pending => PENDING,
            TransferStatus::Accepted => ACCEPTED,
            TransferStatus::Arrived => ARRIVED,
            TransferStatus::InProgress => IN_PROGRESS,
            TransferStatus::Completed => COMPLETED,
            TransferStatus::Declined => DECLINED,
        }
    }
}

/// Badge for a raw status string; unknown values are an error
pub fn badge_for_str(raw: &str) -> Result<Badge> {
    if let Ok(status) = raw.parse::<EventStatus>() {
        return Ok(status.badge());
    }
    if let Ok(status) = raw.parse::<GuestStatus>() {
        return Ok(status.badge());
    }
    if let Ok(status) = raw.parse::<DriverStatus>() {
        return Ok(status.badge());
    }
    if let Ok(status) = raw.parse::<TransferStatus>() {
        return Ok(status.badge());
    }
    Err(TransferError::UnknownStatus(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_every_typed_status_has_a_badge() {
        for status in EventStatus::ALL {
            assert!(status.badge().label_key.starts_with("status."));
        }
        for status in GuestStatus::ALL {
            assert!(status.badge().label_key.starts_with("status."));
        }
        for status in DriverStatus::ALL {
            assert!(status.badge().label_key.starts_with("status."));
        }
        for status in TransferStatus::ALL {
            assert!(status.badge().label_key.starts_with("status."));
        }
    }

    #[test]
    fn test_raw_lookup_agrees_with_typed_tables() {
        for status in TransferStatus::ALL {
            assert_eq!(badge_for_str(status.as_str()).unwrap(), status.badge());
        }
        for status in GuestStatus::ALL {
            assert_eq!(badge_for_str(status.as_str()).unwrap(), status.badge());
        }
        assert_eq!(badge_for_str("on-trip").unwrap().background(), "bg-accent/20");
        assert_eq!(badge_for_str("picked-up").unwrap().label_key, "status.pickedUp");
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert_matches!(badge_for_str("teleported"), Err(TransferError::UnknownStatus(s)) if s == "teleported");
        assert!(badge_for_str("").is_err());
    }
}
