//! Status and enumeration values shared with the backend
//!
//! Every enum serializes to the exact kebab-case string the backend emits.
//! Parsing an unknown string is an error, never a silent default.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::errors::TransferError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TransferError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(TransferError::UnknownStatus(other.to_string())),
                }
            }
        }
    };
}

wire_enum! {
    /// Lifecycle of an event
    EventStatus {
        Planning => "planning",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

wire_enum! {
    /// Where a guest is in their transfer
    GuestStatus {
        Pending => "pending",
        Assigned => "assigned",
        Accepted => "accepted",
        Arrived => "arrived",
        PickedUp => "picked-up",
        Completed => "completed",
    }
}

wire_enum! {
    /// Driver availability
    DriverStatus {
        Available => "available",
        OnTrip => "on-trip",
        Offline => "offline",
    }
}

wire_enum! {
    /// State of a single driver/guest transfer
    TransferStatus {
        Pending => "pending",
        Accepted => "accepted",
        Arrived => "arrived",
        InProgress => "in-progress",
        Completed => "completed",
        Declined => "declined",
    }
}

wire_enum! {
    VehicleType {
        Sedan => "sedan",
        Suv => "suv",
        Minivan => "minivan",
        Bus => "bus",
    }
}

wire_enum! {
    UserRole {
        Admin => "admin",
        User => "user",
        Driver => "driver",
    }
}

wire_enum! {
    /// Values a driver may set on themselves through the busy toggle
    BusyStatus {
        Available => "available",
        Offline => "offline",
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Planning
    }
}

impl Default for GuestStatus {
    fn default() -> Self {
        GuestStatus::Pending
    }
}

impl Default for DriverStatus {
    fn default() -> Self {
        DriverStatus::Available
    }
}

impl Default for VehicleType {
    fn default() -> Self {
        VehicleType::Sedan
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}
