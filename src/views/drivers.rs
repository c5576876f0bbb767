//! Drivers page: fleet list, onboarding and account maintenance

use std::sync::{Arc, RwLock};
use crate::models::{
    validate_new_password, Driver, DriverDraft, DriverQuery, DriverStatus, DriverUpdate, Entity,
    PasswordChange,
};
use crate::sync::Subscription;
use crate::utils::errors::{Result, TransferError};
use crate::utils::helpers::matches_search;
use crate::utils::logging::{log_poll_failure, log_user_action};
use super::{read, write, SortOrder, SubmitGuard, ViewContext};

pub const DRIVERS_PAGE_LIMIT: u32 = 100;

/// Backend codes for duplicate driver fields, and their messages
const DUPLICATE_CODES: &[(&str, &str)] = &[
    ("DRIVER_EMAIL_EXISTS", "drivers.emailExists"),
    ("DRIVER_PLATE_EXISTS", "drivers.plateExists"),
];

#[derive(Debug, Clone, Default)]
pub struct DriversState {
    pub drivers: Vec<Driver>,
    pub loading: bool,
    pub search: String,
    pub sort: SortOrder,
}

impl DriversState {
    pub fn count_with_status(&self, status: DriverStatus) -> usize {
        self.drivers.iter().filter(|d| d.status == status).count()
    }
}

pub struct DriversView {
    ctx: ViewContext,
    state: Arc<RwLock<DriversState>>,
    submit: SubmitGuard,
}

fn page_query() -> DriverQuery {
    DriverQuery {
        status: None,
        limit: Some(DRIVERS_PAGE_LIMIT),
    }
}

impl DriversView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(RwLock::new(DriversState::default())),
            submit: SubmitGuard::default(),
        }
    }

    pub fn mount(&self) -> Subscription {
        write(&self.state).loading = true;

        let api = self.ctx.api.clone();
        let state = self.state.clone();
        let failed_state = self.state.clone();
        let ctx = self.ctx.clone();

        self.ctx
            .poller("drivers", move || {
                let api = api.clone();
                async move { api.drivers().list(&page_query()).await }
            })
            .on_initial_error(move |_| {
                write(&failed_state).loading = false;
                ctx.error("drivers.fetchError");
            })
            .subscribe(move |page| {
                let mut state = write(&state);
                state.drivers = page.drivers;
                state.loading = false;
            })
    }

    pub fn state(&self) -> DriversState {
        read(&self.state).clone()
    }

    pub fn set_search(&self, query: &str) {
        write(&self.state).search = query.to_string();
    }

    pub fn set_sort(&self, sort: SortOrder) {
        write(&self.state).sort = sort;
    }

    /// Drivers matching name, vehicle model or plate, in the chosen order
    pub fn visible_drivers(&self) -> Vec<Driver> {
        let state = read(&self.state);
        let mut drivers: Vec<Driver> = state
            .drivers
            .iter()
            .filter(|d| {
                matches_search(
                    &state.search,
                    &[d.name.as_str(), d.vehicle_model.as_str(), d.license_plate.as_str()],
                )
            })
            .cloned()
            .collect();
        state.sort.apply(&mut drivers, |d| d.name.as_str(), |d| d.created_at);
        drivers
    }

    pub async fn reload(&self) -> Result<()> {
        let page = self.ctx.api.drivers().list(&page_query()).await?;
        write(&self.state).drivers = page.drivers;
        Ok(())
    }

    async fn reload_quietly(&self) {
        if let Err(e) = self.reload().await {
            log_poll_failure("drivers", &e);
        }
    }

    /// Create a driver account. Password rules are checked before any request.
    pub async fn add_driver(&self, draft: DriverDraft) -> Result<Driver> {
        let _ticket = self.submit.begin()?;
        let form = match draft.into_form() {
            Ok(form) => form,
            Err(e) => {
                self.ctx.validation_error(&e, "drivers");
                return Err(e.into());
            }
        };

        match self.ctx.api.drivers().create(&form).await {
            Ok(driver) => {
                log_user_action(None, "add_driver", Some(driver.id()));
                self.ctx.success("drivers.addSuccess");
                self.reload_quietly().await;
                Ok(driver)
            }
            Err(e) => {
                self.ctx.error(duplicate_message_key(&e).unwrap_or("drivers.addError"));
                Err(e)
            }
        }
    }

    /// Save edits and patch the local record
    pub async fn update_driver(&self, id: &str, update: DriverUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.drivers().update(id, &update).await {
            Ok(_) => {
                if let Some(driver) = write(&self.state).drivers.iter_mut().find(|d| d.id == id) {
                    update.apply_to(driver);
                }
                self.ctx.success("drivers.updateSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.error(duplicate_message_key(&e).unwrap_or("drivers.updateError"));
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, id: &str, new_password: &str, repeat: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        if let Err(e) = validate_new_password(new_password, repeat) {
            self.ctx.validation_error(&e, "drivers");
            return Err(e.into());
        }

        let change = PasswordChange {
            current_password: None,
            new_password: new_password.to_string(),
        };
        match self.ctx.api.drivers().change_password(id, &change).await {
            Ok(()) => {
                log_user_action(None, "change_driver_password", Some(id));
                self.ctx.success("drivers.passwordUpdated");
                Ok(())
            }
            Err(e) => {
                self.ctx.error("drivers.passwordUpdateError");
                Err(e)
            }
        }
    }

    pub async fn delete_driver(&self, id: &str) -> Result<()> {
        match self.ctx.api.drivers().delete(id).await {
            Ok(()) => {
                log_user_action(None, "delete_driver", Some(id));
                self.ctx.success("drivers.deleteSuccess");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("drivers.deleteError");
                Err(e)
            }
        }
    }
}

/// Exact-code match on the backend message
fn duplicate_message_key(error: &TransferError) -> Option<&'static str> {
    let message = error.backend_message()?;
    DUPLICATE_CODES
        .iter()
        .find(|(code, _)| *code == message)
        .map(|(_, key)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_codes_match_exactly() {
        assert_eq!(
            duplicate_message_key(&TransferError::api(409, Some("DRIVER_EMAIL_EXISTS".into()))),
            Some("drivers.emailExists")
        );
        assert_eq!(
            duplicate_message_key(&TransferError::api(409, Some("DRIVER_PLATE_EXISTS".into()))),
            Some("drivers.plateExists")
        );
        assert_eq!(
            duplicate_message_key(&TransferError::api(409, Some("driver_email_exists".into()))),
            None
        );
        assert_eq!(duplicate_message_key(&TransferError::NotFound("x".into())), None);
    }
}
