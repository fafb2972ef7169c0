use axum::{
    extract::{OriginalUri, State},
    http::Method,
    Json,
};
use model::{
    render::RenderSnapshot, statistics::TrailStatistics, BackendStatus,
    DetectionMode,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    common::{RouteErrorResponse, RouteResult},
    WebState,
};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModeBody {
    mode: DetectionMode,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BaseLocationBody {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthDto {
    backend_status: BackendStatus,
    backend_online: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BaseLocationDto {
    status: String,
    lat: f64,
    lon: f64,
}

pub(crate) async fn health(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
) -> RouteResult<HealthDto> {
    let backend_status = controller.backend_status().await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    Ok(Json(HealthDto {
        backend_online: backend_status.is_online(),
        backend_status,
    }))
}

pub(crate) async fn start(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
    Json(body): Json<ModeBody>,
) -> RouteResult<RenderSnapshot> {
    let attach_context = |why: tracking::TrackingError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    controller.start(body.mode).await.map_err(attach_context)?;
    controller
        .snapshot()
        .await
        .map(Json)
        .map_err(attach_context)
}

pub(crate) async fn stop(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
) -> RouteResult<RenderSnapshot> {
    let attach_context = |why: tracking::TrackingError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    controller.stop().await.map_err(attach_context)?;
    controller
        .snapshot()
        .await
        .map(Json)
        .map_err(attach_context)
}

pub(crate) async fn reset(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
) -> RouteResult<RenderSnapshot> {
    let attach_context = |why: tracking::TrackingError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    controller.reset().await.map_err(attach_context)?;
    controller
        .snapshot()
        .await
        .map(Json)
        .map_err(attach_context)
}

pub(crate) async fn switch_mode(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
    Json(body): Json<ModeBody>,
) -> RouteResult<RenderSnapshot> {
    let attach_context = |why: tracking::TrackingError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    controller
        .switch_mode(body.mode)
        .await
        .map_err(attach_context)?;
    controller
        .snapshot()
        .await
        .map(Json)
        .map_err(attach_context)
}

pub(crate) async fn snapshot(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
) -> RouteResult<RenderSnapshot> {
    controller.snapshot().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

pub(crate) async fn statistics(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
) -> RouteResult<TrailStatistics> {
    controller.statistics().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

pub(crate) async fn set_base_location(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { controller }): State<WebState>,
    Json(body): Json<BaseLocationBody>,
) -> RouteResult<BaseLocationDto> {
    let ack = controller
        .set_base_location(body.lat, body.lon)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })?;
    Ok(Json(BaseLocationDto {
        status: ack.status,
        lat: ack.lat,
        lon: ack.lon,
    }))
}
