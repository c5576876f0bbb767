//! All-guests page. Loaded on demand, not polled.

use std::sync::{Arc, RwLock};
use crate::models::{Entity, Event, EventQuery, Guest, GuestForm, GuestQuery, GuestStatus, GuestUpdate};
use crate::utils::errors::{Result, TransferError, ValidationError};
use crate::utils::helpers::matches_search;
use crate::utils::logging::{log_poll_failure, log_user_action};
use super::{read, write, SubmitGuard, ViewContext};

pub const GUESTS_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct GuestsState {
    pub guests: Vec<Guest>,
    /// Events offered when adding a guest
    pub events: Vec<Event>,
    pub loading: bool,
    pub search: String,
    pub status_filter: Option<GuestStatus>,
}

pub struct GuestsView {
    ctx: ViewContext,
    state: Arc<RwLock<GuestsState>>,
    submit: SubmitGuard,
}

impl GuestsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(RwLock::new(GuestsState::default())),
            submit: SubmitGuard::default(),
        }
    }

    /// Initial load; a guest fetch failure raises a notice, events fail silently
    pub async fn load(&self) -> Result<()> {
        write(&self.state).loading = true;
        let guests_query = GuestQuery {
            limit: Some(GUESTS_PAGE_LIMIT),
            ..Default::default()
        };
        let events_query = EventQuery {
            limit: Some(GUESTS_PAGE_LIMIT),
            ..Default::default()
        };
        let guests_api = self.ctx.api.guests();
        let events_api = self.ctx.api.events();
        let (guests, events) = tokio::join!(guests_api.list(&guests_query), events_api.list(&events_query));

        let mut state = write(&self.state);
        state.loading = false;
        match events {
            Ok(page) => state.events = page.events,
            Err(e) => log_poll_failure("events", &e),
        }
        match guests {
            Ok(page) => {
                state.guests = page.guests;
                Ok(())
            }
            Err(e) => {
                drop(state);
                self.ctx.error("guests.fetchError");
                Err(e)
            }
        }
    }

    async fn reload_guests(&self) {
        let query = GuestQuery {
            limit: Some(GUESTS_PAGE_LIMIT),
            ..Default::default()
        };
        match self.ctx.api.guests().list(&query).await {
            Ok(page) => write(&self.state).guests = page.guests,
            Err(e) => log_poll_failure("guests", &e),
        }
    }

    pub fn state(&self) -> GuestsState {
        read(&self.state).clone()
    }

    pub fn set_search(&self, query: &str) {
        write(&self.state).search = query.to_string();
    }

    pub fn set_status_filter(&self, status: Option<GuestStatus>) {
        write(&self.state).status_filter = status;
    }

    /// Guests matching the search (name, phone) and status filter
    pub fn visible_guests(&self) -> Vec<Guest> {
        let state = read(&self.state);
        state
            .guests
            .iter()
            .filter(|g| matches_search(&state.search, &[g.name.as_str(), g.phone.as_str()]))
            .filter(|g| state.status_filter.map_or(true, |status| g.status == status))
            .cloned()
            .collect()
    }

    /// Name of the event a guest belongs to, when known
    pub fn event_name(&self, guest: &Guest) -> Option<String> {
        let event_ref = guest.event_id.as_ref()?;
        if let Some(event) = event_ref.resolved() {
            return Some(event.name.clone());
        }
        read(&self.state)
            .events
            .iter()
            .find(|e| e.id == event_ref.id())
            .map(|e| e.name.clone())
    }

    pub async fn add_guest(&self, form: GuestForm) -> Result<Guest> {
        let _ticket = self.submit.begin()?;
        let validation = match form.event_id.as_deref() {
            Some(id) if !id.trim().is_empty() => form.validate(),
            _ => Err(ValidationError::Required { field: "eventId" }),
        };
        if let Err(e) = validation {
            self.ctx.validation_error(&e, "guests");
            return Err(TransferError::from(e));
        }

        match self.ctx.api.guests().create(&form).await {
            Ok(guest) => {
                log_user_action(None, "add_guest", Some(guest.id()));
                self.ctx.success("guests.addSuccess");
                self.reload_guests().await;
                Ok(guest)
            }
            Err(e) => {
                self.ctx.error("guests.addError");
                Err(e)
            }
        }
    }

    pub async fn update_guest(&self, guest_id: &str, update: GuestUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.guests().update(guest_id, &update).await {
            Ok(_) => {
                self.ctx.success("guests.updateSuccess");
                self.reload_guests().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("guests.updateError");
                Err(e)
            }
        }
    }

    pub async fn delete_guest(&self, guest_id: &str) -> Result<()> {
        match self.ctx.api.guests().delete(guest_id).await {
            Ok(()) => {
                log_user_action(None, "delete_guest", Some(guest_id));
                self.ctx.success("guests.deleteSuccess");
                self.reload_guests().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("guests.deleteError");
                Err(e)
            }
        }
    }
}
