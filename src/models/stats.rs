//! Dashboard and report aggregates computed by the backend

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_events: u64,
    pub completed_events: u64,
    pub in_progress_events: u64,
    pub upcoming_events: u64,
    pub today_events: u64,
    pub total_guests: u64,
    pub active_transfers: u64,
    pub drivers_on_route: u64,
    pub available_drivers: u64,
    pub weekly_data: Vec<WeeklyPoint>,
    pub trends: Trends,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyPoint {
    pub day: String,
    pub transfers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trends {
    pub guests: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trend {
    pub value: f64,
    pub positive: bool,
}

impl Default for Trend {
    fn default() -> Self {
        Self {
            value: 0.0,
            positive: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverStats {
    pub total_drivers: u64,
    pub available_drivers: u64,
    pub drivers_on_route: u64,
    pub drivers_active_today: u64,
    pub vehicle_distribution: Vec<VehicleCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleCount {
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_stats_payload() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalEvents": 4,
            "weeklyData": [{"day": "Mon", "transfers": 3}]
        }))
        .unwrap();
        assert_eq!(stats.total_events, 4);
        assert_eq!(stats.weekly_data[0].transfers, 3);
        assert!(stats.trends.guests.positive);
    }

    #[test]
    fn test_vehicle_count_type_field() {
        let stats: DriverStats = serde_json::from_value(json!({
            "vehicleDistribution": [{"type": "SUV", "count": 2}]
        }))
        .unwrap();
        assert_eq!(stats.vehicle_distribution[0].vehicle_type, "SUV");
    }
}
