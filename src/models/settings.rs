//! Account settings records: login sessions and audit trail

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub id: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub last_active: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Download handle returned by the audit export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditExport {
    pub url: String,
}

/// Time windows the audit export accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditRange {
    Today,
    Week,
    Month,
    All,
}

impl AuditRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditRange::Today => "today",
            AuditRange::Week => "week",
            AuditRange::Month => "month",
            AuditRange::All => "all",
        }
    }
}

impl std::str::FromStr for AuditRange {
    type Err = crate::utils::errors::TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(AuditRange::Today),
            "week" => Ok(AuditRange::Week),
            "month" => Ok(AuditRange::Month),
            "all" => Ok(AuditRange::All),
            other => Err(crate::utils::errors::TransferError::Config(format!(
                "Unknown audit range: {}",
                other
            ))),
        }
    }
}
