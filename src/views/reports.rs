//! Reports page: weekly performance, fleet mix and recent guest activity

use crate::models::{DriverStats, Guest, GuestQuery, Trends, VehicleType};
use crate::utils::errors::Result;
use crate::utils::logging::log_poll_failure;
use super::ViewContext;

const RECENT_GUESTS_LIMIT: u32 = 5;

/// Order in which the fleet breakdown is always shown
const VEHICLE_ORDER: [VehicleType; 4] = [
    VehicleType::Sedan,
    VehicleType::Suv,
    VehicleType::Minivan,
    VehicleType::Bus,
];

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSlice {
    pub vehicle_type: VehicleType,
    pub count: u64,
}

/// One day of the weekly chart with its label already translated
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBar {
    pub label: String,
    pub transfers: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub completed_transfers: u64,
    pub total_guests_served: u64,
    pub active_events: u64,
    pub completed_events: u64,
    pub in_progress_events: u64,
    pub planning_events: u64,
    pub weekly: Vec<WeeklyBar>,
    pub trends: Trends,
    pub drivers_working_today: u64,
    pub available_drivers: u64,
    pub vehicles: Vec<VehicleSlice>,
    pub recent_guests: Vec<Guest>,
}

pub struct ReportsView {
    ctx: ViewContext,
}

impl ReportsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    /// Fetch the three report sources in parallel.
    ///
    /// A failing source leaves its part of the summary at zero; failures are
    /// only logged.
    pub async fn load(&self) -> Result<ReportSummary> {
        let recent_query = GuestQuery {
            limit: Some(RECENT_GUESTS_LIMIT),
            sort: Some("-updatedAt".to_string()),
            ..Default::default()
        };
        let events = self.ctx.api.events();
        let drivers = self.ctx.api.drivers();
        let guests = self.ctx.api.guests();
        let (event_stats, driver_stats, recent) =
            tokio::join!(events.stats(), drivers.stats(), guests.list(&recent_query));

        let mut summary = ReportSummary {
            vehicles: vehicle_slices(&DriverStats::default()),
            ..Default::default()
        };

        match event_stats {
            Ok(stats) => {
                summary.completed_transfers = stats.weekly_data.iter().map(|d| d.transfers).sum();
                summary.total_guests_served = stats.total_guests;
                summary.active_events = stats.in_progress_events + stats.today_events;
                summary.completed_events = stats.completed_events;
                summary.in_progress_events = stats.in_progress_events;
                summary.planning_events = stats.upcoming_events;
                summary.weekly = stats
                    .weekly_data
                    .iter()
                    .map(|point| WeeklyBar {
                        label: self.ctx.t(&format!("days.{}", point.day)),
                        transfers: point.transfers,
                    })
                    .collect();
                summary.trends = stats.trends;
            }
            Err(e) => log_poll_failure("reports.events", &e),
        }

        match driver_stats {
            Ok(stats) => {
                summary.drivers_working_today = stats.drivers_on_route;
                summary.available_drivers = stats.available_drivers;
                summary.vehicles = vehicle_slices(&stats);
            }
            Err(e) => log_poll_failure("reports.drivers", &e),
        }

        match recent {
            Ok(page) => summary.recent_guests = page.guests,
            Err(e) => log_poll_failure("reports.guests", &e),
        }

        Ok(summary)
    }

    /// Localized name for a fleet slice
    pub fn vehicle_label(&self, vehicle_type: VehicleType) -> String {
        self.ctx.t(&format!("drivers.{}", vehicle_type.as_str()))
    }
}

/// Fixed-order fleet breakdown; backend type names match case-insensitively
fn vehicle_slices(stats: &DriverStats) -> Vec<VehicleSlice> {
    VEHICLE_ORDER
        .iter()
        .map(|&vehicle_type| VehicleSlice {
            vehicle_type,
            count: stats
                .vehicle_distribution
                .iter()
                .filter(|v| v.vehicle_type.to_lowercase() == vehicle_type.as_str())
                .map(|v| v.count)
                .sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleCount;

    #[test]
    fn test_vehicle_slices_keep_fixed_order() {
        let stats = DriverStats {
            vehicle_distribution: vec![
                VehicleCount { vehicle_type: "Bus".into(), count: 1 },
                VehicleCount { vehicle_type: "SEDAN".into(), count: 4 },
                VehicleCount { vehicle_type: "limo".into(), count: 9 },
            ],
            ..Default::default()
        };
        let slices = vehicle_slices(&stats);
        let counts: Vec<_> = slices.iter().map(|s| (s.vehicle_type, s.count)).collect();
        assert_eq!(
            counts,
            vec![
                (VehicleType::Sedan, 4),
                (VehicleType::Suv, 0),
                (VehicleType::Minivan, 0),
                (VehicleType::Bus, 1),
            ]
        );
    }
}
