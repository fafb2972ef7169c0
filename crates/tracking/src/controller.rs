use std::{sync::Arc, time::Duration};

use actors::actor_ref::ActorRef;
use model::{
    render::RenderSnapshot, statistics::TrailStatistics, BackendStatus,
    DetectionMode,
};
use skyweave::{BackendConfig, BaseLocationAck, SkyweaveClient};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    monitor::{HealthMonitor, HEALTH_INTERVAL},
    poller::{spawn_poller, POLL_INTERVAL},
    session::{SessionActor, SessionRef},
    TrackingError, TrackingResult,
};

/// Everything the tracking core needs, passed explicitly to the constructor
/// instead of living in ambient globals.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub backend: BackendConfig,
    pub poll_interval: Duration,
    pub health_interval: Duration,
}

impl TrackingConfig {
    pub fn from_env() -> Self {
        Self {
            backend: BackendConfig::from_env(),
            ..Self::default()
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll_interval: POLL_INTERVAL,
            health_interval: HEALTH_INTERVAL,
        }
    }
}

/// Front door of the tracking core. Owns the poll loop lifecycle; all
/// session state lives behind the actor, which stays its only mutator. The
/// mutex below guards nothing but the handle to the current poller's
/// cancellation token.
#[derive(Clone)]
pub struct SessionController {
    session: ActorRef<SessionActor>,
    client: SkyweaveClient,
    poll_interval: Duration,
    poller: Arc<Mutex<Option<CancellationToken>>>,
}

impl SessionController {
    /// Runs the session actor and the health monitor. The monitor probes for
    /// as long as the returned guard lives, whether or not a session streams.
    pub fn spawn(config: &TrackingConfig) -> (Self, HealthMonitor) {
        let session = actors::run(SessionActor::new);
        let client = SkyweaveClient::new(&config.backend);
        let monitor = HealthMonitor::spawn(
            client.clone(),
            session.clone(),
            config.health_interval,
        );
        let controller = Self {
            session,
            client,
            poll_interval: config.poll_interval,
            poller: Arc::new(Mutex::new(None)),
        };
        (controller, monitor)
    }

    pub fn client(&self) -> &SkyweaveClient {
        &self.client
    }

    /// Starts a streaming session in the given mode and begins polling.
    pub async fn start(&self, mode: DetectionMode) -> TrackingResult<()> {
        let mut poller = self.poller.lock().await;
        if poller.is_some() {
            return Err(TrackingError::AlreadyStreaming);
        }
        let generation = self.session.start_streaming(mode).await?;
        let token = CancellationToken::new();
        spawn_poller(
            self.client.clone(),
            self.session.clone(),
            mode,
            generation,
            self.poll_interval,
            token.clone(),
        );
        *poller = Some(token);
        Ok(())
    }

    /// Stops streaming: cancels the poll loop and any in-flight fetches and
    /// returns the session to idle. Responses that still arrive afterwards
    /// carry a superseded generation and are discarded by the actor.
    pub async fn stop(&self) -> TrackingResult<()> {
        let mut poller = self.poller.lock().await;
        let token = poller.take().ok_or(TrackingError::NotStreaming)?;
        token.cancel();
        self.session.stop_streaming().await
    }

    /// Clears the session whether or not it is streaming.
    pub async fn reset(&self) -> TrackingResult<()> {
        let mut poller = self.poller.lock().await;
        if let Some(token) = poller.take() {
            token.cancel();
        }
        self.session.reset().await
    }

    /// Switches the detection mode. A streaming session keeps streaming: the
    /// old poll loop is cancelled, accumulated data is cleared, and a fresh
    /// loop starts under the new mode and generation.
    pub async fn switch_mode(&self, mode: DetectionMode) -> TrackingResult<()> {
        let mut poller = self.poller.lock().await;
        if let Some(token) = poller.take() {
            token.cancel();
        }
        if let Some(generation) = self.session.switch_mode(mode).await? {
            let token = CancellationToken::new();
            spawn_poller(
                self.client.clone(),
                self.session.clone(),
                mode,
                generation,
                self.poll_interval,
                token.clone(),
            );
            *poller = Some(token);
        }
        Ok(())
    }

    /// Moves the backend's base location. The backend clears its accumulated
    /// trail on success, so the local session is reset to mirror it.
    pub async fn set_base_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> TrackingResult<BaseLocationAck> {
        let ack = self.client.set_base_location(latitude, longitude).await?;
        self.reset().await?;
        Ok(ack)
    }

    pub async fn snapshot(&self) -> TrackingResult<RenderSnapshot> {
        self.session.snapshot().await
    }

    pub async fn statistics(&self) -> TrackingResult<TrailStatistics> {
        self.session.statistics().await
    }

    pub async fn backend_status(&self) -> TrackingResult<BackendStatus> {
        self.session.backend_status().await
    }
}
