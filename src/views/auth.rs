//! Sign-in page flows: login, first-admin setup and password recovery

use std::sync::Arc;
use tracing::warn;
use crate::models::{ResetPasswordRequest, SetupData, User, UserRole};
use crate::session::{AuthContext, Landing};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::{SubmitGuard, ViewContext};

pub struct AuthFlows {
    ctx: ViewContext,
    auth: Arc<AuthContext>,
    submit: SubmitGuard,
}

impl AuthFlows {
    pub fn new(ctx: ViewContext, auth: Arc<AuthContext>) -> Self {
        Self {
            ctx,
            auth,
            submit: SubmitGuard::default(),
        }
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    /// Whether the first admin exists. An unreachable backend counts as set up
    /// so the login form is shown instead of the setup form.
    pub async fn setup_status(&self) -> bool {
        match self.ctx.api.auth().setup_status().await {
            Ok(status) => status.is_setup_complete,
            Err(e) => {
                warn!(error = %e, "Setup status check failed, assuming setup is complete");
                true
            }
        }
    }

    /// Sign in and report where the account lands
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
        remember_me: bool,
    ) -> Result<(User, Landing)> {
        let _ticket = self.submit.begin()?;
        match self.auth.login(email, password, role, remember_me).await {
            Ok(user) => {
                let landing = Landing::for_role(user.role);
                Ok((user, landing))
            }
            Err(e) => {
                self.ctx.error("login.invalidCredentials");
                Err(e)
            }
        }
    }

    /// Create the first admin and sign in as them
    pub async fn setup(&self, name: &str, email: &str, password: &str, repeat: &str) -> Result<User> {
        let _ticket = self.submit.begin()?;
        let data = match SetupData::from_draft(name, email, password, repeat) {
            Ok(data) => data,
            Err(e) => {
                self.ctx.validation_error(&e, "setup");
                return Err(e.into());
            }
        };

        match self.ctx.api.auth().setup(&data).await {
            Ok(payload) => {
                self.auth.adopt(&payload.token, payload.user.clone(), false)?;
                log_user_action(Some(payload.user.id.as_str()), "setup_admin", None);
                Ok(payload.user)
            }
            Err(e) => {
                self.ctx.backend_error(&e, "setup.error");
                Err(e)
            }
        }
    }

    /// Ask for a reset link, mailed in the current interface language
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        let language = self.ctx.language();
        match self.ctx.api.auth().forgot_password(email, &language).await {
            Ok(()) => {
                self.ctx.success("forgot.successMessage");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "forgot.error");
                Err(e)
            }
        }
    }

    pub async fn reset_password(&self, token: &str, password: &str, repeat: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        let request = match ResetPasswordRequest::from_draft(token, password, repeat) {
            Ok(request) => request,
            Err(e) => {
                self.ctx.validation_error(&e, "reset");
                return Err(e.into());
            }
        };

        match self.ctx.api.auth().reset_password(&request).await {
            Ok(()) => {
                self.ctx.success("reset.success");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "reset.invalidToken");
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.auth.logout()
    }
}
