use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use model::DetectionMode;
use serde::Deserialize;

use crate::{common::RouteErrorResponse, WebState};

const MJPEG_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StreamParams {
    #[serde(default)]
    mode: Option<DetectionMode>,
}

/// Relays the backend's annotated MJPEG stream to the dashboard. The bytes
/// pass through untouched; the browser consumes this as an image source.
pub(crate) async fn passthrough(
    State(WebState { controller }): State<WebState>,
    Query(params): Query<StreamParams>,
) -> Result<Response, RouteErrorResponse> {
    let mode = params.mode.unwrap_or(DetectionMode::Trail);
    let upstream =
        controller.client().open_stream(mode).await.map_err(|why| {
            log::warn!("could not open the {} stream: {}", mode, why);
            RouteErrorResponse::new(StatusCode::BAD_GATEWAY)
                .with_message(format!("{}", why))
        })?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(MJPEG_CONTENT_TYPE)
        .to_owned();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|why| {
            RouteErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_message(why.to_string())
        })
}
