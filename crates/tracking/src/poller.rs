use std::time::Duration;

use actors::actor_ref::ActorRef;
use model::{
    coordinate::Coordinate,
    trail::{Polygon, Trail},
    DetectionMode,
};
use serde_json::Value;
use skyweave::{geojson, ApiResult, SkyweaveClient};
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::session::{SessionActor, SessionRef};

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the poll loop for one session generation. Ticks fire on the fixed
/// interval and each one issues its own fetch task, so a hung request delays
/// only its own (by then stale) application, never the next tick. The actor
/// sorts out which response wins via the (generation, sequence) tag.
pub fn spawn_poller(
    client: SkyweaveClient,
    session: ActorRef<SessionActor>,
    mode: DetectionMode,
    generation: u64,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        let mut sequence: u64 = 0;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            sequence += 1;
            tokio::spawn(poll_once(
                client.clone(),
                session.clone(),
                mode,
                generation,
                sequence,
                token.clone(),
            ));
        }
        log::debug!("poll loop for generation {} halted", generation);
    })
}

async fn poll_once(
    client: SkyweaveClient,
    session: ActorRef<SessionActor>,
    mode: DetectionMode,
    generation: u64,
    sequence: u64,
    token: CancellationToken,
) {
    let fetched = tokio::select! {
        _ = token.cancelled() => return,
        fetched = fetch(&client, mode) => fetched,
    };
    let (trail, polygons) = match fetched {
        Ok(observation) => observation,
        Err(why) => {
            // the next scheduled tick is the retry
            log::warn!("{} poll tick skipped: {}", mode, why);
            return;
        }
    };
    match session
        .apply_observation(generation, sequence, trail, polygons)
        .await
    {
        Ok(true) => {}
        Ok(false) => log::debug!(
            "stale {} response dropped (generation {}, sequence {})",
            mode,
            generation,
            sequence
        ),
        Err(why) => log::warn!("observation not delivered: {}", why),
    }
}

async fn fetch(
    client: &SkyweaveClient,
    mode: DetectionMode,
) -> ApiResult<(Trail, Vec<Polygon>)> {
    match mode {
        DetectionMode::Trail => {
            let payload = client.trail_geojson().await?;
            let coordinates = geojson::trail_coordinates(&payload);
            Ok((Trail::new(Coordinate::filter_valid(&coordinates)), Vec::new()))
        }
        DetectionMode::Landslide => {
            let payload = client.landslide_geojson().await?;
            let rings = geojson::polygon_rings(&payload);
            Ok((Trail::default(), validated_polygons(rings)))
        }
        DetectionMode::Combined => {
            let payload = client.combined_geojson().await?;
            let (coordinates, rings) = geojson::split_combined(&payload);
            Ok((
                Trail::new(Coordinate::filter_valid(&coordinates)),
                validated_polygons(rings),
            ))
        }
    }
}

fn validated_polygons(rings: Vec<Vec<Value>>) -> Vec<Polygon> {
    rings
        .into_iter()
        .map(|ring| Polygon::new(Coordinate::filter_valid(&ring)))
        .filter(|polygon| !polygon.ring.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rings_with_no_valid_coordinate_are_dropped() {
        let rings = vec![
            vec![json!([85.0, 28.0]), json!([85.1, 28.0]), json!([85.0, 28.1])],
            vec![json!("junk"), json!([300.0, 0.0])],
        ];
        let polygons = validated_polygons(rings);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].ring.len(), 3);
    }
}
