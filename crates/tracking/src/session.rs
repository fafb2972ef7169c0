use std::any::Any;

use actors::{
    actor::{Actor, SupervisionStrategy},
    actor_ref::ActorRef,
    message::{Handler, Message},
};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use model::{
    render::RenderSnapshot,
    statistics::TrailStatistics,
    trail::{Polygon, Trail},
    BackendStatus, DetectionMode,
};

use crate::{statistics::compute_statistics, TrackingResult};

/// Sole owner of all mutable session state. Every mutation arrives as a
/// message and is handled in full before the next one, so a poll application
/// is one atomic replace-then-recompute and no reader can observe a
/// half-updated trail.
pub struct SessionActor {
    mode: DetectionMode,
    streaming: bool,
    generation: u64,
    last_sequence: u64,
    started_at: Option<DateTime<Local>>,
    trail: Trail,
    polygons: Vec<Polygon>,
    statistics: TrailStatistics,
    backend_status: BackendStatus,
}

impl SessionActor {
    pub fn new() -> Self {
        Self {
            mode: DetectionMode::Trail,
            streaming: false,
            generation: 0,
            last_sequence: 0,
            started_at: None,
            trail: Trail::default(),
            polygons: Vec::new(),
            statistics: TrailStatistics::zeroed(),
            backend_status: BackendStatus::Checking,
        }
    }

    /// Returns the session to a blank slate. The generation is advanced
    /// separately by the callers that need in-flight responses invalidated.
    fn clear(&mut self) {
        self.trail = Trail::default();
        self.polygons.clear();
        self.statistics = TrailStatistics::zeroed();
        self.started_at = None;
        self.last_sequence = 0;
    }
}

impl Default for SessionActor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for SessionActor {
    fn on_panic(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
        // a restart would silently drop the generation counter
        SupervisionStrategy::Resume
    }
}

#[derive(Debug, Clone)]
pub struct StartStreaming {
    pub mode: DetectionMode,
}

impl Message for StartStreaming {
    type Response = u64;
}

#[async_trait]
impl Handler<StartStreaming> for SessionActor {
    async fn handle(&mut self, message: StartStreaming) -> u64 {
        self.clear();
        self.mode = message.mode;
        self.streaming = true;
        self.generation += 1;
        self.started_at = Some(Local::now());
        log::info!(
            "streaming session started in {} mode (generation {})",
            self.mode,
            self.generation
        );
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct StopStreaming;

impl Message for StopStreaming {
    type Response = ();
}

#[async_trait]
impl Handler<StopStreaming> for SessionActor {
    async fn handle(&mut self, _: StopStreaming) {
        self.streaming = false;
        self.generation += 1;
        self.clear();
        log::info!("streaming session stopped");
    }
}

#[derive(Debug, Clone)]
pub struct ResetSession;

impl Message for ResetSession {
    type Response = ();
}

#[async_trait]
impl Handler<ResetSession> for SessionActor {
    async fn handle(&mut self, _: ResetSession) {
        self.streaming = false;
        self.generation += 1;
        self.clear();
        log::info!("session reset");
    }
}

#[derive(Debug, Clone)]
pub struct SwitchMode {
    pub mode: DetectionMode,
}

impl Message for SwitchMode {
    /// The new poll generation when the session keeps streaming.
    type Response = Option<u64>;
}

#[async_trait]
impl Handler<SwitchMode> for SessionActor {
    async fn handle(&mut self, message: SwitchMode) -> Option<u64> {
        // accumulated data never crosses a mode boundary
        self.clear();
        self.mode = message.mode;
        self.generation += 1;
        if self.streaming {
            self.started_at = Some(Local::now());
            log::info!(
                "mode switched to {} (generation {})",
                self.mode,
                self.generation
            );
            Some(self.generation)
        } else {
            None
        }
    }
}

/// One validated poll result. Tagged with the generation it was fetched
/// under and a per-generation sequence number, so responses from a
/// superseded session and out-of-order arrivals are discarded instead of
/// applied.
#[derive(Debug, Clone)]
pub struct ApplyObservation {
    pub generation: u64,
    pub sequence: u64,
    pub trail: Trail,
    pub polygons: Vec<Polygon>,
}

impl Message for ApplyObservation {
    /// Whether the observation was applied.
    type Response = bool;
}

#[async_trait]
impl Handler<ApplyObservation> for SessionActor {
    async fn handle(&mut self, message: ApplyObservation) -> bool {
        if !self.streaming || message.generation != self.generation {
            log::debug!(
                "discarding observation from superseded generation {}",
                message.generation
            );
            return false;
        }
        if message.sequence <= self.last_sequence {
            log::debug!(
                "discarding out-of-order observation (sequence {} <= {})",
                message.sequence,
                self.last_sequence
            );
            return false;
        }
        self.last_sequence = message.sequence;
        self.trail = message.trail;
        self.polygons = message.polygons;

        let now = Local::now();
        let elapsed_seconds = self
            .started_at
            .map(|started_at| (now - started_at).num_seconds())
            .unwrap_or(0);
        self.statistics = compute_statistics(
            &self.trail,
            &self.polygons,
            elapsed_seconds,
            self.mode,
            now,
        );
        true
    }
}

#[derive(Debug, Clone)]
pub struct SetBackendStatus {
    pub status: BackendStatus,
}

impl Message for SetBackendStatus {
    type Response = ();
}

#[async_trait]
impl Handler<SetBackendStatus> for SessionActor {
    async fn handle(&mut self, message: SetBackendStatus) {
        if self.backend_status != message.status {
            log::info!("backend is now {}", message.status);
        }
        self.backend_status = message.status;
    }
}

#[derive(Debug, Clone)]
pub struct GetSnapshot;

impl Message for GetSnapshot {
    type Response = RenderSnapshot;
}

#[async_trait]
impl Handler<GetSnapshot> for SessionActor {
    async fn handle(&mut self, _: GetSnapshot) -> RenderSnapshot {
        RenderSnapshot {
            mode: self.mode,
            streaming: self.streaming,
            backend_status: self.backend_status,
            trail: self.trail.clone(),
            polygons: self.polygons.clone(),
            bounds: self.trail.bounds(),
            statistics: self.statistics.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetStatistics;

impl Message for GetStatistics {
    type Response = TrailStatistics;
}

#[async_trait]
impl Handler<GetStatistics> for SessionActor {
    async fn handle(&mut self, _: GetStatistics) -> TrailStatistics {
        self.statistics.clone()
    }
}

#[derive(Debug, Clone)]
pub struct GetBackendStatus;

impl Message for GetBackendStatus {
    type Response = BackendStatus;
}

#[async_trait]
impl Handler<GetBackendStatus> for SessionActor {
    async fn handle(&mut self, _: GetBackendStatus) -> BackendStatus {
        self.backend_status
    }
}

/// Ergonomic facade over the raw `tell`/`ask` calls.
#[async_trait]
pub trait SessionRef {
    async fn start_streaming(&self, mode: DetectionMode) -> TrackingResult<u64>;
    async fn stop_streaming(&self) -> TrackingResult<()>;
    async fn reset(&self) -> TrackingResult<()>;
    async fn switch_mode(&self, mode: DetectionMode)
        -> TrackingResult<Option<u64>>;
    async fn apply_observation(
        &self,
        generation: u64,
        sequence: u64,
        trail: Trail,
        polygons: Vec<Polygon>,
    ) -> TrackingResult<bool>;
    async fn set_backend_status(
        &self,
        status: BackendStatus,
    ) -> TrackingResult<()>;
    async fn snapshot(&self) -> TrackingResult<RenderSnapshot>;
    async fn statistics(&self) -> TrackingResult<TrailStatistics>;
    async fn backend_status(&self) -> TrackingResult<BackendStatus>;
}

#[async_trait]
impl SessionRef for ActorRef<SessionActor> {
    async fn start_streaming(&self, mode: DetectionMode) -> TrackingResult<u64> {
        Ok(self.ask(StartStreaming { mode }).await?)
    }

    async fn stop_streaming(&self) -> TrackingResult<()> {
        Ok(self.ask(StopStreaming).await?)
    }

    async fn reset(&self) -> TrackingResult<()> {
        Ok(self.ask(ResetSession).await?)
    }

    async fn switch_mode(
        &self,
        mode: DetectionMode,
    ) -> TrackingResult<Option<u64>> {
        Ok(self.ask(SwitchMode { mode }).await?)
    }

    async fn apply_observation(
        &self,
        generation: u64,
        sequence: u64,
        trail: Trail,
        polygons: Vec<Polygon>,
    ) -> TrackingResult<bool> {
        Ok(self
            .ask(ApplyObservation {
                generation,
                sequence,
                trail,
                polygons,
            })
            .await?)
    }

    async fn set_backend_status(
        &self,
        status: BackendStatus,
    ) -> TrackingResult<()> {
        Ok(self.tell(SetBackendStatus { status }).await?)
    }

    async fn snapshot(&self) -> TrackingResult<RenderSnapshot> {
        Ok(self.ask(GetSnapshot).await?)
    }

    async fn statistics(&self) -> TrackingResult<TrailStatistics> {
        Ok(self.ask(GetStatistics).await?)
    }

    async fn backend_status(&self) -> TrackingResult<BackendStatus> {
        Ok(self.ask(GetBackendStatus).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::coordinate::Coordinate;

    fn langtang_trail() -> Trail {
        Trail::new(vec![
            Coordinate::new(85.4293, 28.2134),
            Coordinate::new(85.4305, 28.2140),
        ])
    }

    fn boulder_field() -> Vec<Polygon> {
        vec![Polygon::new(vec![
            Coordinate::new(85.0, 28.0),
            Coordinate::new(85.1, 28.0),
            Coordinate::new(85.0, 28.1),
        ])]
    }

    #[tokio::test]
    async fn applied_observation_shows_up_in_the_snapshot() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();

        let applied = session
            .apply_observation(generation, 1, langtang_trail(), Vec::new())
            .await
            .unwrap();
        assert!(applied);

        let snapshot = session.snapshot().await.unwrap();
        assert!(snapshot.streaming);
        assert_eq!(snapshot.trail.len(), 2);
        assert_eq!(snapshot.statistics.point_count, 2);
        assert_eq!(snapshot.statistics.trail_length_km, 0.14);
        assert!(snapshot.bounds.is_some());
    }

    #[tokio::test]
    async fn responses_from_a_superseded_generation_are_discarded() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();
        session.reset().await.unwrap();

        let applied = session
            .apply_observation(generation, 1, langtang_trail(), Vec::new())
            .await
            .unwrap();
        assert!(!applied);

        let snapshot = session.snapshot().await.unwrap();
        assert!(!snapshot.streaming);
        assert!(snapshot.trail.is_empty());
        assert_eq!(snapshot.statistics, TrailStatistics::zeroed());
    }

    #[tokio::test]
    async fn out_of_order_responses_are_discarded() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();

        let newer = langtang_trail();
        assert!(session
            .apply_observation(generation, 2, newer.clone(), Vec::new())
            .await
            .unwrap());

        let older = Trail::new(vec![Coordinate::new(85.4293, 28.2134)]);
        assert!(!session
            .apply_observation(generation, 1, older, Vec::new())
            .await
            .unwrap());

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.trail, newer);
    }

    #[tokio::test]
    async fn mode_switch_clears_both_collections() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();
        session
            .apply_observation(generation, 1, langtang_trail(), Vec::new())
            .await
            .unwrap();

        let next_generation = session
            .switch_mode(DetectionMode::Landslide)
            .await
            .unwrap()
            .expect("session was streaming");
        assert!(next_generation > generation);

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.mode, DetectionMode::Landslide);
        assert!(snapshot.streaming);
        assert!(snapshot.trail.is_empty());
        assert!(snapshot.polygons.is_empty());

        // the old mode's in-flight data must not leak into the new mode
        assert!(!session
            .apply_observation(generation, 2, langtang_trail(), Vec::new())
            .await
            .unwrap());
        assert!(session
            .apply_observation(next_generation, 1, Trail::default(), boulder_field())
            .await
            .unwrap());

        let snapshot = session.snapshot().await.unwrap();
        assert!(snapshot.trail.is_empty());
        assert_eq!(snapshot.polygons.len(), 1);
    }

    #[tokio::test]
    async fn stopping_returns_the_session_to_a_blank_slate() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();
        session
            .apply_observation(generation, 1, langtang_trail(), Vec::new())
            .await
            .unwrap();

        session.stop_streaming().await.unwrap();

        let snapshot = session.snapshot().await.unwrap();
        assert!(!snapshot.streaming);
        assert!(snapshot.trail.is_empty());
        assert_eq!(snapshot.statistics, TrailStatistics::zeroed());
        assert!(snapshot.bounds.is_none());
    }

    #[tokio::test]
    async fn empty_observation_zeroes_the_statistics() {
        let session = actors::run_unsupervised(SessionActor::new());
        let generation =
            session.start_streaming(DetectionMode::Trail).await.unwrap();
        session
            .apply_observation(generation, 1, langtang_trail(), Vec::new())
            .await
            .unwrap();

        assert!(session
            .apply_observation(generation, 2, Trail::default(), Vec::new())
            .await
            .unwrap());

        let statistics = session.statistics().await.unwrap();
        assert_eq!(statistics.point_count, 0);
        assert_eq!(statistics.trail_length_km, 0.0);
        assert_eq!(statistics.average_speed_kmh, 0.0);
    }

    #[tokio::test]
    async fn backend_status_is_tracked_independently() {
        let session = actors::run_unsupervised(SessionActor::new());
        assert_eq!(
            session.backend_status().await.unwrap(),
            BackendStatus::Checking
        );

        session
            .set_backend_status(BackendStatus::Online)
            .await
            .unwrap();
        assert_eq!(
            session.backend_status().await.unwrap(),
            BackendStatus::Online
        );
    }
}
