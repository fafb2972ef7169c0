pub use crate::common::RouteResult;

use axum::{routing::get_service, Router};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracking::controller::SessionController;

pub mod api;
pub mod common;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct WebState {
    pub controller: SessionController,
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let routes = Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router());

    let bind_addr = std::env::var("SKYWEAVE_DASHBOARD_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
    log::info!("dashboard api listening on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router() -> Router {
    // dashboard bundle; unknown paths fall back to the SPA entry point
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new("./resources/www/")
                .not_found_service(ServeFile::new("./resources/www/index.html")),
        ),
    )
}
