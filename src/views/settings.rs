//! Account settings: active login sessions and the audit trail

use crate::models::{AuditLog, AuditRange, LoginSession};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::ViewContext;

pub struct SettingsView {
    ctx: ViewContext,
}

impl SettingsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    pub async fn sessions(&self) -> Result<Vec<LoginSession>> {
        self.ctx.api.settings().sessions().await.map_err(|e| {
            self.ctx.error("settings.sessionsError");
            e
        })
    }

    pub async fn terminate_session(&self, id: &str) -> Result<()> {
        match self.ctx.api.settings().terminate_session(id).await {
            Ok(()) => {
                log_user_action(None, "terminate_session", Some(id));
                self.ctx.success("settings.sessionTerminated");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "settings.sessionTerminateError");
                Err(e)
            }
        }
    }

    /// Most recent audit entries; the backend default limit applies when `None`
    pub async fn audit_logs(&self, limit: Option<u32>) -> Result<Vec<AuditLog>> {
        self.ctx.api.settings().audit_logs(limit).await.map_err(|e| {
            self.ctx.error("settings.auditError");
            e
        })
    }

    /// Request an export and return its download URL
    pub async fn export(&self, range: AuditRange) -> Result<String> {
        match self.ctx.api.settings().export_audit_logs(range).await {
            Ok(export) => {
                self.ctx.success("settings.exportReady");
                Ok(export.url)
            }
            Err(e) => {
                self.ctx.backend_error(&e, "settings.exportError");
                Err(e)
            }
        }
    }
}
