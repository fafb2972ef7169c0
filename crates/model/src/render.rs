use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    statistics::TrailStatistics,
    trail::{Bounds, Polygon, Trail},
    BackendStatus, DetectionMode,
};

/// Input contract of the map renderer. The full overlay is redrawn from this
/// on every change: the complete validated trail and polygon list, no
/// incremental diffing. An empty trail renders nothing, a single point
/// renders a marker, and `bounds` is present exactly when there are at least
/// 2 points to fit the view to.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub mode: DetectionMode,
    pub streaming: bool,
    pub backend_status: BackendStatus,
    pub trail: Trail,
    pub polygons: Vec<Polygon>,
    pub bounds: Option<Bounds>,
    pub statistics: TrailStatistics,
}
