//! Events list page

use std::sync::{Arc, RwLock};
use tracing::debug;
use crate::models::{Entity, Event, EventForm, EventQuery, EventUpdate};
use crate::sync::Subscription;
use crate::utils::errors::Result;
use crate::utils::helpers::matches_search;
use crate::utils::logging::{log_poll_failure, log_user_action};
use super::{read, write, SortOrder, SubmitGuard, ViewContext};

/// Events fetched per list request
pub const EVENTS_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct EventsState {
    pub events: Vec<Event>,
    pub loading: bool,
    pub search: String,
    pub sort: SortOrder,
}

pub struct EventsView {
    ctx: ViewContext,
    state: Arc<RwLock<EventsState>>,
    submit: SubmitGuard,
}

impl EventsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(RwLock::new(EventsState::default())),
            submit: SubmitGuard::default(),
        }
    }

    fn query() -> EventQuery {
        EventQuery {
            limit: Some(EVENTS_PAGE_LIMIT),
            ..Default::default()
        }
    }

    /// Start the list poller; dropping the subscription stops it
    pub fn mount(&self) -> Subscription {
        write(&self.state).loading = true;

        let api = self.ctx.api.clone();
        let state = self.state.clone();
        let failed_state = self.state.clone();
        let ctx = self.ctx.clone();

        self.ctx
            .poller("events", move || {
                let api = api.clone();
                async move { api.events().list(&Self::query()).await }
            })
            .on_initial_error(move |_| {
                write(&failed_state).loading = false;
                ctx.error("events.fetchError");
            })
            .subscribe(move |page| {
                let mut state = write(&state);
                state.events = page.events;
                state.loading = false;
            })
    }

    pub fn state(&self) -> EventsState {
        read(&self.state).clone()
    }

    pub fn set_search(&self, query: &str) {
        write(&self.state).search = query.to_string();
    }

    pub fn set_sort(&self, sort: SortOrder) {
        write(&self.state).sort = sort;
    }

    /// Events after search (name, address) and sort
    pub fn visible_events(&self) -> Vec<Event> {
        let state = read(&self.state);
        let mut events: Vec<Event> = state
            .events
            .iter()
            .filter(|e| matches_search(&state.search, &[e.name.as_str(), e.address.as_str()]))
            .cloned()
            .collect();
        state.sort.apply(&mut events, |e| e.name.as_str(), |e| e.created_at);
        events
    }

    /// Fetch the list now and replace it
    pub async fn reload(&self) -> Result<()> {
        let page = self.ctx.api.events().list(&Self::query()).await?;
        write(&self.state).events = page.events;
        Ok(())
    }

    async fn reload_quietly(&self) {
        if let Err(e) = self.reload().await {
            log_poll_failure("events", &e);
        }
    }

    pub async fn create_event(&self, form: EventForm) -> Result<Event> {
        let _ticket = self.submit.begin()?;
        if let Err(e) = form.validate() {
            self.ctx.validation_error(&e, "events");
            return Err(e.into());
        }

        match self.ctx.api.events().create(&form).await {
            Ok(event) => {
                log_user_action(None, "create_event", Some(event.id()));
                self.ctx.success("events.createSuccess");
                self.reload_quietly().await;
                Ok(event)
            }
            Err(e) => {
                self.ctx.error("events.createError");
                Err(e)
            }
        }
    }

    /// Save edits and patch the local record without refetching
    pub async fn update_event(&self, id: &str, update: EventUpdate) -> Result<()> {
        let _ticket = self.submit.begin()?;
        match self.ctx.api.events().update(id, &update).await {
            Ok(_) => {
                if let Some(event) = write(&self.state).events.iter_mut().find(|e| e.id == id) {
                    update.apply_to(event);
                }
                debug!(event_id = %id, "Patched local event");
                self.ctx.success("events.updateSuccess");
                Ok(())
            }
            Err(e) => {
                self.ctx.error("events.updateError");
                Err(e)
            }
        }
    }

    pub async fn delete_event(&self, id: &str) -> Result<()> {
        match self.ctx.api.events().delete(id).await {
            Ok(()) => {
                log_user_action(None, "delete_event", Some(id));
                self.ctx.success("events.deleteSuccess");
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                self.ctx.error("events.deleteError");
                Err(e)
            }
        }
    }
}
