//! Driver model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::utils::errors::ValidationError;
use super::guest::Guest;
use super::reference::{Entity, Ref};
use super::status::{BusyStatus, DriverStatus, VehicleType};

/// Minimum accepted password length for driver and user accounts
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub status: DriverStatus,
    #[serde(default)]
    pub busy_reason: Option<String>,
    #[serde(default)]
    pub current_task_id: Option<Ref<Guest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Driver {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Check a new password and its confirmation
pub fn validate_new_password(password: &str, repeat: &str) -> Result<(), ValidationError> {
    if password != repeat {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LENGTH });
    }
    Ok(())
}

/// Body for creating a driver account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub vehicle_type: VehicleType,
    pub vehicle_model: String,
    pub license_plate: String,
}

/// What the add-driver dialog collects, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
    pub vehicle_type: VehicleType,
    pub vehicle_model: String,
    pub license_plate: String,
}

impl DriverDraft {
    /// Validate the draft and turn it into a request body
    pub fn into_form(self) -> Result<DriverForm, ValidationError> {
        validate_new_password(&self.password, &self.repeat_password)?;
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("licensePlate", &self.license_plate),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
        }

        Ok(DriverForm {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password: Some(self.password),
            vehicle_type: self.vehicle_type,
            vehicle_model: self.vehicle_model,
            license_plate: self.license_plate,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
}

impl DriverUpdate {
    pub fn apply_to(&self, driver: &mut Driver) {
        if let Some(ref name) = self.name {
            driver.name = name.clone();
        }
        if let Some(ref email) = self.email {
            driver.email = email.clone();
        }
        if let Some(ref phone) = self.phone {
            driver.phone = phone.clone();
        }
        if let Some(vehicle_type) = self.vehicle_type {
            driver.vehicle_type = vehicle_type;
        }
        if let Some(ref model) = self.vehicle_model {
            driver.vehicle_model = model.clone();
        }
        if let Some(ref plate) = self.license_plate {
            driver.license_plate = plate.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyStatusUpdate {
    pub status: BusyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverQuery {
    pub status: Option<DriverStatus>,
    pub limit: Option<u32>,
}

impl DriverQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("status", self.status.map(|s| s.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriversPage {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub total: u64,
}
