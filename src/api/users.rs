//! `/users` endpoints

use reqwest::Method;
use serde::Deserialize;
use crate::models::{NewUser, User, UserUpdate};
use crate::utils::errors::Result;
use super::{segment, ApiClient};

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<User>,
}

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let envelope: UsersEnvelope = self.client.get("/users").await?;
        Ok(envelope.users)
    }

    pub async fn create(&self, user: &NewUser) -> Result<User> {
        let envelope: UserEnvelope = self.client.post("/users", user).await?;
        Ok(envelope.user)
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<User> {
        let envelope: UserEnvelope = self
            .client
            .put(&format!("/users/{}", segment(id)), update)
            .await?;
        Ok(envelope.user)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute::<()>(Method::DELETE, &format!("/users/{}", segment(id)), None)
            .await
    }
}
