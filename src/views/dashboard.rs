//! Admin dashboard: headline stats, today's events and drivers on the road

use chrono::Utc;
use crate::models::{DashboardStats, Driver, DriverQuery, DriverStatus, Event, EventQuery};
use crate::utils::errors::Result;
use crate::utils::helpers::today_iso;
use crate::utils::logging::log_poll_failure;
use super::ViewContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub today_events: Vec<Event>,
    pub drivers_on_trip: Vec<Driver>,
}

pub struct DashboardView {
    ctx: ViewContext,
}

impl DashboardView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    pub async fn load(&self) -> Result<DashboardSnapshot> {
        let today = EventQuery {
            date: Some(today_iso(Utc::now())),
            ..Default::default()
        };
        let on_trip = DriverQuery {
            status: Some(DriverStatus::OnTrip),
            ..Default::default()
        };
        let events = self.ctx.api.events();
        let drivers = self.ctx.api.drivers();
        let (stats, today_events, drivers_on_trip) =
            tokio::join!(events.stats(), events.list(&today), drivers.list(&on_trip));

        let mut snapshot = DashboardSnapshot::default();
        match stats {
            Ok(stats) => snapshot.stats = stats,
            Err(e) => log_poll_failure("dashboard.stats", &e),
        }
        match today_events {
            Ok(page) => snapshot.today_events = page.events,
            Err(e) => log_poll_failure("dashboard.events", &e),
        }
        match drivers_on_trip {
            Ok(page) => snapshot.drivers_on_trip = page.drivers,
            Err(e) => log_poll_failure("dashboard.drivers", &e),
        }
        Ok(snapshot)
    }
}
