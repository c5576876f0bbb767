//! Authentication context: who is signed in, and where they land

use std::sync::{PoisonError, RwLock};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use crate::api::ApiClient;
use crate::models::{LoginCredentials, User, UserRole};
use crate::utils::errors::{Result, TransferError};

/// Section of the product a role is sent to after login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    AdminConsole,
    DriverPortal,
}

impl Landing {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Driver => Landing::DriverPortal,
            UserRole::Admin | UserRole::User => Landing::AdminConsole,
        }
    }
}

pub struct AuthContext {
    api: ApiClient,
    user: RwLock<Option<User>>,
    token_ttl: Duration,
}

impl AuthContext {
    pub fn new(api: ApiClient, token_ttl: Duration) -> Self {
        Self {
            api,
            user: RwLock::new(None),
            token_ttl,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn landing(&self) -> Option<Landing> {
        self.current_user().map(|user| Landing::for_role(user.role))
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Re-establish the session from a stored token
    pub async fn restore(&self) -> Result<Option<User>> {
        self.restore_at(Utc::now()).await
    }

    pub async fn restore_at(&self, now: DateTime<Utc>) -> Result<Option<User>> {
        let session = self.api.session();
        if session.token().is_none() {
            return Ok(None);
        }

        if session.is_expired(now) {
            info!("Stored session expired");
            session.clear()?;
            self.set_user(None);
            return Ok(None);
        }

        match self.api.auth().me().await {
            Ok(user) => {
                // Tokens saved before expiry stamps existed get one now
                if session.expiry().is_none() && session.has_persistent_token() {
                    session.set_expiry(now + self.token_ttl)?;
                }
                info!(user_id = %user.id, role = %user.role, "Session restored");
                self.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected, clearing");
                session.clear()?;
                self.set_user(None);
                Ok(None)
            }
        }
    }

    /// Sign in; `remember_me` keeps the token across restarts for the configured TTL
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
        remember_me: bool,
    ) -> Result<User> {
        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let payload = self
            .api
            .auth()
            .login(&credentials)
            .await
            .map_err(rejected_credentials)?;

        self.api
            .session()
            .store_token(&payload.token, remember_me, self.token_ttl, Utc::now())?;
        info!(user_id = %payload.user.id, role = %payload.user.role, remember_me = remember_me, "Logged in");
        self.set_user(Some(payload.user.clone()));
        Ok(payload.user)
    }

    /// Adopt a token obtained outside `login`, e.g. from first-admin setup
    pub fn adopt(&self, token: &str, user: User, remember_me: bool) -> Result<()> {
        self.api
            .session()
            .store_token(token, remember_me, self.token_ttl, Utc::now())?;
        self.set_user(Some(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.set_user(None);
        self.api.session().clear()?;
        info!("Logged out");
        Ok(())
    }
}

/// A 400/401/403 from login means the credentials were refused
fn rejected_credentials(error: TransferError) -> TransferError {
    match error {
        TransferError::Api {
            status: 400 | 401 | 403,
            message,
        } => TransferError::Authentication(message),
        other => other,
    }
}
