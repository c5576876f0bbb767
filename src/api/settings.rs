//! `/settings` endpoints: sessions and audit logs

use reqwest::Method;
use serde::Deserialize;
use crate::models::{AuditExport, AuditLog, AuditRange, LoginSession};
use crate::utils::errors::Result;
use crate::utils::helpers::build_query;
use super::{segment, ApiClient};

/// Audit entries fetched when no limit is given
pub const DEFAULT_AUDIT_LIMIT: u32 = 20;

#[derive(Deserialize)]
struct SessionsEnvelope {
    #[serde(default)]
    sessions: Vec<LoginSession>,
}

#[derive(Deserialize)]
struct LogsEnvelope {
    #[serde(default)]
    logs: Vec<AuditLog>,
}

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn sessions(&self) -> Result<Vec<LoginSession>> {
        let envelope: SessionsEnvelope = self.client.get("/settings/sessions").await?;
        Ok(envelope.sessions)
    }

    pub async fn terminate_session(&self, id: &str) -> Result<()> {
        self.client
            .execute::<()>(Method::DELETE, &format!("/settings/sessions/{}", segment(id)), None)
            .await
    }

    pub async fn audit_logs(&self, limit: Option<u32>) -> Result<Vec<AuditLog>> {
        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
        let endpoint = format!(
            "/settings/audit-logs{}",
            build_query(&[("limit", Some(limit.to_string()))])
        );
        let envelope: LogsEnvelope = self.client.get(&endpoint).await?;
        Ok(envelope.logs)
    }

    pub async fn export_audit_logs(&self, range: AuditRange) -> Result<AuditExport> {
        let endpoint = format!(
            "/settings/audit-logs/export{}",
            build_query(&[("range", Some(range.as_str().to_string()))])
        );
        self.client.get(&endpoint).await
    }
}
