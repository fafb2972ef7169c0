use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Derived session statistics. Recomputed wholly from the current
/// trail/polygon snapshot on every applied poll, never merged with a
/// previous value.
#[serde_with::skip_serializing_none]
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct TrailStatistics {
    pub point_count: usize,
    pub polygon_count: usize,
    pub trail_length_km: f64,
    pub average_speed_kmh: f64,
    pub area_covered_km2: f64,
    pub elapsed_seconds: i64,
    pub last_update: Option<DateTime<Local>>,
}

impl TrailStatistics {
    pub fn zeroed() -> Self {
        Self::default()
    }
}
