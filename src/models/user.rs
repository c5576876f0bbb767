//! User account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::utils::errors::ValidationError;
use super::driver::validate_new_password;
use super::reference::Entity;
use super::status::UserRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_access: Option<ModuleAccess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    /// Accounts without an explicit flag are active
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    pub fn can_access(&self, module: Module) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Driver => false,
            UserRole::User => self
                .module_access
                .as_ref()
                .map(|access| access.allows(module))
                .unwrap_or(module == Module::Dashboard),
        }
    }
}

/// Admin console sections a user can be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Dashboard,
    Events,
    Drivers,
    Reports,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccess {
    pub dashboard: bool,
    pub events: bool,
    pub drivers: bool,
    pub reports: bool,
    pub users: bool,
}

impl ModuleAccess {
    /// Defaults applied when a role is picked: admins get everything
    pub fn for_role(role: UserRole) -> Self {
        let all = role == UserRole::Admin;
        Self {
            dashboard: true,
            events: all,
            drivers: all,
            reports: all,
            users: all,
        }
    }

    pub fn allows(&self, module: Module) -> bool {
        match module {
            Module::Dashboard => self.dashboard,
            Module::Events => self.events,
            Module::Drivers => self.drivers,
            Module::Reports => self.reports,
            Module::Users => self.users,
        }
    }
}

/// Body for creating a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub module_access: ModuleAccess,
}

/// What the add-user dialog collects, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub module_access: Option<ModuleAccess>,
}

impl UserDraft {
    pub fn into_new_user(self) -> Result<NewUser, ValidationError> {
        validate_new_password(&self.password, &self.repeat_password)?;
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::Required { field: "email" });
        }

        let module_access = self
            .module_access
            .unwrap_or_else(|| ModuleAccess::for_role(self.role));

        Ok(NewUser {
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            is_active: self.is_active,
            module_access,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_access: Option<ModuleAccess>,
}

impl UserUpdate {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.clone();
        }
        if let Some(ref email) = self.email {
            user.email = email.clone();
        }
        if let Some(ref phone) = self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(active) = self.is_active {
            user.is_active = Some(active);
        }
        if let Some(access) = self.module_access {
            user.module_access = Some(access);
        }
    }
}
