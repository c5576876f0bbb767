//! `/auth` endpoints

use reqwest::Method;
use serde::Deserialize;
use crate::models::{
    AuthPayload, ForgotPasswordRequest, LoginCredentials, ResetPasswordRequest, SetupData,
    SetupStatus, User,
};
use crate::utils::errors::Result;
use super::ApiClient;

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload> {
        self.client.post("/auth/login", credentials).await
    }

    /// Create the first admin account on a fresh installation
    pub async fn setup(&self, data: &SetupData) -> Result<AuthPayload> {
        self.client.post("/auth/setup", data).await
    }

    pub async fn setup_status(&self) -> Result<SetupStatus> {
        self.client.get("/auth/setup-status").await
    }

    /// The account behind the stored token
    pub async fn me(&self) -> Result<User> {
        let envelope: UserEnvelope = self.client.get("/auth/me").await?;
        Ok(envelope.user)
    }

    pub async fn forgot_password(&self, email: &str, language: &str) -> Result<()> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
            language: language.to_string(),
        };
        self.client
            .execute(Method::POST, "/auth/forgot-password", Some(&body))
            .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        self.client
            .execute(Method::POST, "/auth/reset-password", Some(request))
            .await
    }
}
