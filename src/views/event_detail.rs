//! Event detail page: event info, guest roster and driver assignment

use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use crate::models::{
    Driver, DriverQuery, DriverStatus, Entity, Event, EventUpdate, Guest, GuestForm, GuestStatus,
    GuestUpdate, NewTransfer,
};
use crate::sync::Subscription;
use crate::utils::errors::{Result, TransferError};
use crate::utils::helpers::matches_search;
use crate::utils::logging::{log_poll_failure, log_user_action};
use super::{read, write, SortOrder, SubmitGuard, ViewContext};

#[derive(Debug, Clone, Default)]
pub struct EventDetailState {
    pub event: Option<Event>,
    pub guests: Vec<Guest>,
    /// Drivers currently free to take a guest
    pub drivers: Vec<Driver>,
    pub loading: bool,
    pub search: String,
    pub status_filter: Option<GuestStatus>,
    pub sort: SortOrder,
    /// Message to forward to the guest after the last assignment
    pub sms_preview: Option<String>,
}

pub struct EventDetailView {
    ctx: ViewContext,
    event_id: String,
    state: Arc<RwLock<EventDetailState>>,
    submit: SubmitGuard,
}

fn available_drivers() -> DriverQuery {
    DriverQuery {
        status: Some(DriverStatus::Available),
        limit: None,
    }
}

impl EventDetailView {
    pub fn new(ctx: ViewContext, event_id: impl Into<String>) -> Self {
        Self {
            ctx,
            event_id: event_id.into(),
            state: Arc::new(RwLock::new(EventDetailState::default())),
            submit: SubmitGuard::default(),
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Poll the event with its guests, and the available drivers alongside
    pub fn mount(&self) -> Vec<Subscription> {
        write(&self.state).loading = true;

        let detail = {
            let api = self.ctx.api.clone();
            let id = self.event_id.clone();
            let state = self.state.clone();
            let failed_state = self.state.clone();
            let ctx = self.ctx.clone();
            self.ctx
                .poller("event_detail", move || {
                    let api = api.clone();
                    let id = id.clone();
                    async move { api.events().get(&id).await }
                })
                .on_initial_error(move |_| {
                    write(&failed_state).loading = false;
                    ctx.error("events.fetchError");
                })
                .subscribe(move |detail| {
                    let mut state = write(&state);
                    state.event = Some(detail.event);
                    state.guests = detail.guests;
                    state.loading = false;
                })
        };

        // Driver availability refreshes silently, even on the first load
        let drivers = {
            let api = self.ctx.api.clone();
            let state = self.state.clone();
            self.ctx
                .poller("available_drivers", move || {
                    let api = api.clone();
                    async move { api.drivers().list(&available_drivers()).await }
                })
                .subscribe(move |page| {
                    write(&state).drivers = page.drivers;
                })
        };

        vec![detail, drivers]
    }

    pub fn state(&self) -> EventDetailState {
        read(&self.state).clone()
    }

    pub fn set_search(&self, query: &str) {
        write(&self.state).search = query.to_string();
    }

    pub fn set_status_filter(&self, status: Option<GuestStatus>) {
        write(&self.state).status_filter = status;
    }

    pub fn set_sort(&self, sort: SortOrder) {
        write(&self.state).sort = sort;
    }

    /// Guests after search (name, phone, pickup), status filter and sort
    pub fn visible_guests(&self) -> Vec<Guest> {
        let state = read(&self.state);
        let mut guests: Vec<Guest> = state
            .guests
            .iter()
            .filter(|g| {
                matches_search(
                    &state.search,
                    &[g.name.as_str(), g.phone.as_str(), g.pickup_address.as_str()],
                )
            })
            .filter(|g| state.status_filter.map_or(true, |status| g.status == status))
            .cloned()
            .collect();
        state.sort.apply(&mut guests, |g| g.name.as_str(), |g| g.created_at);
        guests
    }

    /// Refetch the event, its guests and the available drivers
    pub async fn reload(&self) -> Result<()> {
        let events = self.ctx.api.events();
        let drivers = self.ctx.api.drivers();
        let query = available_drivers();
        let (detail, drivers) = tokio::join!(events.get(&self.event_id), drivers.list(&query));

        let detail = detail?;
        let mut state = write(&self.state);
        state.event = Some(detail.event);
        state.guests = detail.guests;
        match drivers {
            Ok(page) => state.drivers = page.drivers,
            Err(e) => log_poll_failure("available_drivers", &e),
        }
        Ok(())
    }

    async fn reload_quietly(&self) {
        if let Err(e) = self.reload().await {
            log_poll_failure("event_detail", &e);
        }
    }

    fn loaded_event(&self) -> Result<Event> {
        read(&self.state)
            .event
            .clone()
            .ok_or_else(|| TransferError::NotFound(format!("event {}", self.event_id)))
    }

    fn guest(&self, guest_id: &str) -> Result<Guest> {
        read(&self.state)
            .guests
            .iter()
            .find(|g| g.id == guest_id)
            .cloned()
            .ok_or_else(|| TransferError::NotFound(format!("guest {}", guest_id)))
    }

    fn driver(&self, driver_id: &str) -> Result<Driver> {
        read(&self.state)
            .drivers
            .iter()
            .find(|d| d.id == driver_id)
            .cloned()
            .ok_or_else(|| TransferError::NotFound(format!("driver {}", driver_id)))
    }

    /// Add a guest to this event; an empty drop-off defaults to the event address
    pub async fn add_guest(&self, mut form: GuestForm) -> Result<Guest> {
        let _ticket = self.submit.begin()?;
        let event = self.loaded_event()?;
        if form.dropoff_address.trim().is_empty() {
            form.dropoff_address = event.address.clone();
        }
        form.event_id = Some(event.id.clone());

        if let Err(e) = form.validate() {
            self.ctx.validation_error(&e, "guests");
            return Err(e.into());
        }

        match self.ctx.api.guests().create(&form).await {
            Ok(guest) => {
                log_user_action(None, "add_guest", Some(guest.id()));
                self.ctx.success("guests.addSuccess");
                self.reload_quietly().await;
                Ok(guest)
            }
            Err(e) => {
                self.ctx.backend_error(&e, "guests.addError");
                Err(e)
            }
        }
    }

    pub async fn update_guest(&self, guest_id: &str, update: GuestUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.guests().update(guest_id, &update).await {
            Ok(_) => {
                if let Some(guest) = write(&self.state).guests.iter_mut().find(|g| g.id == guest_id) {
                    update.apply_to(guest);
                }
                self.ctx.success("guests.updateSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "guests.updateError");
                Err(e)
            }
        }
    }

    pub async fn delete_guest(&self, guest_id: &str) -> Result<()> {
        match self.ctx.api.guests().delete(guest_id).await {
            Ok(()) => {
                log_user_action(None, "delete_guest", Some(guest_id));
                self.ctx.success("guests.deleteSuccess");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "guests.deleteError");
                Err(e)
            }
        }
    }

    /// Assign a driver to a guest, replacing any existing assignment.
    ///
    /// Returns the SMS text to forward to the guest.
    pub async fn assign_driver(&self, guest_id: &str, driver_id: &str) -> Result<String> {
        let _ticket = self.submit.begin()?;
        let event = self.loaded_event()?;
        let guest = self.guest(guest_id)?;
        let driver = self.driver(driver_id)?;
        let transfers = self.ctx.api.transfers();

        // The backend keeps one transfer per guest; the old one must go first
        if guest.has_assigned_driver() {
            if let Err(e) = transfers.delete_for_guest(&guest.id).await {
                self.ctx.backend_error(&e, "guests.unassignError");
                return Err(e);
            }
            debug!(guest_id = %guest.id, "Removed previous transfer");
        }

        let transfer = NewTransfer {
            guest_id: guest.id.clone(),
            driver_id: driver.id.clone(),
            event_id: event.id.clone(),
            pickup_time: Some(event.time.clone()),
        };
        if let Err(e) = transfers.create(&transfer).await {
            self.ctx.backend_error(&e, "guests.assignError");
            return Err(e);
        }

        info!(guest_id = %guest.id, driver_id = %driver.id, "Driver assigned");
        self.ctx.success("guests.assignSuccess");

        let sms = self.sms_message(&guest, &event, &driver);
        write(&self.state).sms_preview = Some(sms.clone());
        self.reload_quietly().await;
        Ok(sms)
    }

    pub async fn unassign_driver(&self, guest_id: &str) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.transfers().delete_for_guest(guest_id).await {
            Ok(()) => {
                log_user_action(None, "unassign_driver", Some(guest_id));
                self.ctx.success("guests.unassignSuccess");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "guests.unassignError");
                Err(e)
            }
        }
    }

    /// Text the guest receives once a driver is assigned
    pub fn sms_message(&self, guest: &Guest, event: &Event, driver: &Driver) -> String {
        format!(
            "{} {} {}. {} {}. {} {} ({}). {} {}.",
            self.ctx.t("events.smsMessage.transferArranged"),
            self.ctx.t("events.smsMessage.pickup"),
            guest.pickup_address,
            self.ctx.t("events.smsMessage.time"),
            event.time,
            self.ctx.t("events.smsMessage.driver"),
            driver.name,
            driver.phone,
            self.ctx.t("events.smsMessage.vehicle"),
            driver.vehicle_model,
        )
    }

    pub async fn update_event(&self, update: EventUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.events().update(&self.event_id, &update).await {
            Ok(_) => {
                if let Some(event) = write(&self.state).event.as_mut() {
                    update.apply_to(event);
                }
                self.ctx.success("events.updateSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "events.updateError");
                Err(e)
            }
        }
    }

    /// Delete the event itself; the caller leaves the page on success
    pub async fn delete_event(&self) -> Result<()> {
        match self.ctx.api.events().delete(&self.event_id).await {
            Ok(()) => {
                log_user_action(None, "delete_event", Some(&self.event_id));
                self.ctx.success("events.deleteSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.backend_error(&e, "events.deleteError");
                Err(e)
            }
        }
    }
}
