//! Backend payload fixtures, in the shape the server sends them

use serde_json::{json, Value};

pub const EVENT_ID: &str = "65f0c0ffee0000000000e001";
pub const GUEST_ID: &str = "65f0c0ffee0000000000a001";
pub const DRIVER_ID: &str = "65f0c0ffee0000000000d001";
pub const OTHER_DRIVER_ID: &str = "65f0c0ffee0000000000d002";
pub const TRANSFER_ID: &str = "65f0c0ffee0000000000f001";
pub const USER_ID: &str = "65f0c0ffee0000000000b001";

pub fn event_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "date": "2026-06-01",
        "time": "19:00",
        "address": "Baku Crystal Hall",
        "status": "planning",
        "guestCount": 1,
        "createdAt": "2026-05-01T10:00:00Z"
    })
}

pub fn driver_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "phone": "+994501112233",
        "email": format!("{}@example.com", name.to_lowercase()),
        "vehicleType": "sedan",
        "vehicleModel": "Mercedes S-Class",
        "licensePlate": "10-AA-001",
        "status": status
    })
}

/// Guest with an optional populated driver
pub fn guest_json(id: &str, name: &str, driver: Option<Value>) -> Value {
    let status = if driver.is_some() { "assigned" } else { "pending" };
    json!({
        "_id": id,
        "eventId": EVENT_ID,
        "name": name,
        "phone": "+994551234567",
        "pickupAddress": "Heydar Aliyev Airport",
        "dropoffAddress": "Baku Crystal Hall",
        "assignedDriverId": driver,
        "status": status
    })
}

pub fn event_detail_json(guests: Vec<Value>) -> Value {
    json!({
        "event": event_json(EVENT_ID, "Gala"),
        "guests": guests
    })
}

pub fn transfer_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "guestId": guest_json(GUEST_ID, "Leyla", None),
        "driverId": DRIVER_ID,
        "eventId": EVENT_ID,
        "status": status
    })
}

pub fn user_json(id: &str, email: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "name": "Nigar",
        "email": email,
        "role": role,
        "isActive": true
    })
}
