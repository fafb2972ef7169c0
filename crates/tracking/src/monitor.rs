use std::time::Duration;

use actors::actor_ref::ActorRef;
use model::BackendStatus;
use skyweave::SkyweaveClient;
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::session::{SessionActor, SessionRef};

pub const HEALTH_INTERVAL: Duration = Duration::from_secs(10);

/// Periodic probe of the backend status endpoint. Probing starts immediately
/// and continues for the monitor's whole lifetime, independent of whether a
/// session is streaming. A failed probe flips the status to offline and is
/// retried by the next scheduled tick, never sooner.
pub struct HealthMonitor {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn(
        client: SkyweaveClient,
        session: ActorRef<SessionActor>,
        interval: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let status = probe(&client).await;
                if session.set_backend_status(status).await.is_err() {
                    // session actor is gone, nobody left to inform
                    break;
                }
            }
        });
        Self { token, handle }
    }

    /// Cancels the probe loop. The returned handle completes once the loop
    /// has wound down.
    pub fn stop(self) -> JoinHandle<()> {
        self.token.cancel();
        self.handle
    }
}

async fn probe(client: &SkyweaveClient) -> BackendStatus {
    match client.status().await {
        Ok(response) if response.is_running() => BackendStatus::Online,
        Ok(response) => {
            log::debug!("unexpected status payload: {:?}", response.status);
            BackendStatus::Offline
        }
        Err(why) => {
            log::debug!("health probe failed: {}", why);
            BackendStatus::Offline
        }
    }
}
