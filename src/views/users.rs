//! Users page: console accounts and their module access

use std::sync::{Arc, RwLock};
use crate::models::{Entity, User, UserDraft, UserUpdate};
use crate::utils::errors::{Result, TransferError};
use crate::utils::helpers::matches_search;
use crate::utils::logging::{log_poll_failure, log_user_action};
use super::{read, write, SubmitGuard, ViewContext};

/// Fragments of the backend's duplicate-email message across its languages
const DUPLICATE_EMAIL_MARKERS: &[&str] = &["already exists", "artıq", "уже", "zaten"];

#[derive(Debug, Clone, Default)]
pub struct UsersState {
    pub users: Vec<User>,
    pub loading: bool,
    pub search: String,
}

pub struct UsersView {
    ctx: ViewContext,
    state: Arc<RwLock<UsersState>>,
    submit: SubmitGuard,
}

impl UsersView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(RwLock::new(UsersState::default())),
            submit: SubmitGuard::default(),
        }
    }

    pub async fn load(&self) -> Result<()> {
        write(&self.state).loading = true;
        let result = self.ctx.api.users().list().await;
        let mut state = write(&self.state);
        state.loading = false;
        match result {
            Ok(users) => {
                state.users = users;
                Ok(())
            }
            Err(e) => {
                drop(state);
                self.ctx.error("users.fetchError");
                Err(e)
            }
        }
    }

    async fn reload_quietly(&self) {
        match self.ctx.api.users().list().await {
            Ok(users) => write(&self.state).users = users,
            Err(e) => log_poll_failure("users", &e),
        }
    }

    pub fn state(&self) -> UsersState {
        read(&self.state).clone()
    }

    pub fn set_search(&self, query: &str) {
        write(&self.state).search = query.to_string();
    }

    pub fn visible_users(&self) -> Vec<User> {
        let state = read(&self.state);
        state
            .users
            .iter()
            .filter(|u| matches_search(&state.search, &[u.name.as_str(), u.email.as_str()]))
            .cloned()
            .collect()
    }

    /// Create an account; module access defaults from the role when not chosen
    pub async fn create_user(&self, draft: UserDraft) -> Result<User> {
        let _ticket = self.submit.begin()?;
        let new_user = match draft.into_new_user() {
            Ok(user) => user,
            Err(e) => {
                self.ctx.validation_error(&e, "users");
                return Err(e.into());
            }
        };

        match self.ctx.api.users().create(&new_user).await {
            Ok(user) => {
                log_user_action(None, "create_user", Some(user.id()));
                self.ctx.success("users.createSuccess");
                self.reload_quietly().await;
                Ok(user)
            }
            Err(e) => {
                let key = if is_duplicate_email(&e) {
                    "users.emailExists"
                } else {
                    "users.createError"
                };
                self.ctx.error(key);
                Err(e)
            }
        }
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.users().update(id, &update).await {
            Ok(_) => {
                if let Some(user) = write(&self.state).users.iter_mut().find(|u| u.id == id) {
                    update.apply_to(user);
                }
                self.ctx.success("users.updateSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.error("users.updateError");
                Err(e)
            }
        }
    }

    /// Flip an account between active and inactive
    pub async fn toggle_active(&self, id: &str) -> Result<bool> {
        let current = read(&self.state)
            .users
            .iter()
            .find(|u| u.id == id)
            .map(User::active)
            .ok_or_else(|| TransferError::NotFound(format!("user {}", id)))?;
        let update = UserUpdate {
            is_active: Some(!current),
            ..Default::default()
        };

        match self.ctx.api.users().update(id, &update).await {
            Ok(_) => {
                if let Some(user) = write(&self.state).users.iter_mut().find(|u| u.id == id) {
                    update.apply_to(user);
                }
                log_user_action(None, "toggle_user_active", Some(id));
                self.ctx.success("users.statusUpdated");
                Ok(!current)
            }
            Err(e) => {
                self.ctx.error("users.statusUpdateError");
                Err(e)
            }
        }
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        match self.ctx.api.users().delete(id).await {
            Ok(()) => {
                log_user_action(None, "delete_user", Some(id));
                self.ctx.success("users.deleteSuccess");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("users.deleteError");
                Err(e)
            }
        }
    }
}

fn is_duplicate_email(error: &TransferError) -> bool {
    error
        .backend_message()
        .map(|message| {
            let message = message.to_lowercase();
            DUPLICATE_EMAIL_MARKERS.iter().any(|marker| message.contains(marker))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_detection_across_languages() {
        for message in [
            "User with this email already exists",
            "Bu e-poçt artıq mövcuddur",
            "Пользователь уже существует",
            "Bu e-posta zaten kayıtlı",
        ] {
            assert!(is_duplicate_email(&TransferError::api(400, Some(message.into()))), "{}", message);
        }
        assert!(!is_duplicate_email(&TransferError::api(500, None)));
    }
}
