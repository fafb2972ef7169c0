use tracking::controller::{SessionController, TrackingConfig};
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = TrackingConfig::from_env();
    log::info!("using detection backend at {}", config.backend.base_url);

    // the monitor probes for the whole process lifetime
    let (controller, _monitor) = SessionController::spawn(&config);

    let web_future = start_web_server(WebState { controller });

    let _ = web_future.await;
}
