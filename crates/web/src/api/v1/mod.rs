use axum::{
    routing::{get, on, post},
    Router,
};
use model::{render::RenderSnapshot, statistics::TrailStatistics};

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    WebState,
};

mod session;
mod stream;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/health", get(session::health))
        .route("/session/start", post(session::start))
        .route("/session/stop", post(session::stop))
        .route("/session/reset", post(session::reset))
        .route("/session/mode", post(session::switch_mode))
        .route("/session/snapshot", get(session::snapshot))
        .route("/session/snapshot/schema", get(schema::<RenderSnapshot>))
        .route("/session/statistics", get(session::statistics))
        .route("/session/statistics/schema", get(schema::<TrailStatistics>))
        .route("/base-location", post(session::set_base_location))
        .route("/stream", get(stream::passthrough))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
