//! LocationTracker - 全ユーザーの現在地を定期的に取得するループ
//!
//! # フロー（1 ラウンド）
//! 1. 停止シグナルを確認
//! 2. UserRegistry から全ユーザーを列挙
//! 3. ユーザーごとに独立したタスクで track_user（governor 経由で fetch → 追記 → RewardEngine）
//! 4. ラウンドの fetch 完了を待つ（停止が来たら待たずに抜ける）
//! 5. interval だけ眠る（停止が来たら抜ける）
//!
//! 停止はループのスケジューリングだけを止めます。既に走っている fetch や
//! 採点タスクは中断しません。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::app::governor::TaskGovernor;
use crate::app::rewards::RewardEngine;
use crate::app::scoring::ScoringBatch;
use crate::domain::{TourGuideError, User, VisitedLocation};
use crate::ports::{LocationSource, UserRegistry};

/// Result of one tracking cycle for one user.
#[derive(Debug)]
pub struct TrackedLocation {
    pub visited: VisitedLocation,
    pub scoring: ScoringBatch,
}

pub struct LocationTracker {
    source: Arc<dyn LocationSource>,
    engine: Arc<RewardEngine>,
    governor: TaskGovernor,
}

impl LocationTracker {
    pub fn new(source: Arc<dyn LocationSource>, engine: Arc<RewardEngine>) -> Self {
        let governor = engine.governor().clone();
        Self {
            source,
            engine,
            governor,
        }
    }

    /// Fetch the user's current location, append it to their history and
    /// run the reward engine.
    ///
    /// The fetch permit is released before rewards are calculated.
    pub async fn track_user(&self, user: &User) -> Result<TrackedLocation, TourGuideError> {
        let user_id = user.id();
        let source = Arc::clone(&self.source);
        let visited = self
            .governor
            .run(async move { source.current_location(user_id).await })
            .await
            .inspect_err(|err| {
                error!(user = %user_id, error = %err, "failed to fetch user location");
            })?;

        user.add_visited_location(visited.clone());
        let scoring = self.engine.calculate_rewards(user);
        Ok(TrackedLocation { visited, scoring })
    }

    /// Spawn the background loop over every user of `registry`.
    pub fn start(
        self: &Arc<Self>,
        registry: Arc<dyn UserRegistry>,
        interval: Duration,
    ) -> TrackerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tracker = Arc::clone(self);
        let join = tokio::spawn(async move {
            tracking_loop(tracker, registry, interval, shutdown_rx).await;
        });
        TrackerHandle { shutdown_tx, join }
    }
}

/// Handle of a running tracking loop.
/// - `stop_tracking()` で次のラウンド前に止まる
/// - handle を drop してもループは止まる
pub struct TrackerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TrackerHandle {
    /// Signal the loop to exit. Idempotent, never waits.
    pub fn stop_tracking(&self) {
        // receivers may already be gone; send_replace still records the flag
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_stopping(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop and wait for the loop task only (not for in-flight scoring).
    pub async fn shutdown_and_join(self) {
        self.stop_tracking();
        if let Err(err) = self.join.await {
            error!(error = %err, "tracker loop ended abnormally");
        }
    }
}

async fn tracking_loop(
    tracker: Arc<LocationTracker>,
    registry: Arc<dyn UserRegistry>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(?interval, "tracker started");
    let mut round: u64 = 0;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        round += 1;

        let users = registry.all_users();
        let started = Instant::now();
        debug!(round, users = users.len(), "tracking round begins");

        let handles: Vec<_> = users
            .into_iter()
            .map(|user| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move { tracker.track_user(&user).await.map(|_| ()) })
            })
            .collect();

        let round_done = async move {
            let mut failures = 0usize;
            for handle in handles {
                match handle.await {
                    Ok(Ok(())) => {}
                    // track_user が既にログ済み
                    Ok(Err(_)) => failures += 1,
                    Err(err) => {
                        error!(error = %err, "tracking task panicked");
                        failures += 1;
                    }
                }
            }
            failures
        };

        // 停止が来たら round を待たずに抜ける（fetch タスクは detach されて続く）
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            failures = round_done => {
                info!(round, failures, elapsed = ?started.elapsed(), "tracking round finished");
            }
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!(rounds = round, "tracker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::ProximitySettings;
    use crate::domain::Location;
    use crate::impls::InMemoryUserRegistry;
    use crate::testkit::{self, StubLocationSource, StubOracle};

    struct Fixture {
        source: Arc<StubLocationSource>,
        oracle: Arc<StubOracle>,
        engine: Arc<RewardEngine>,
        tracker: Arc<LocationTracker>,
    }

    fn fixture(oracle: StubOracle, permits: usize) -> Fixture {
        let catalog = testkit::small_catalog();
        let disneyland = catalog.by_name("Disneyland").unwrap().location;
        let source = Arc::new(StubLocationSource::new(catalog.clone(), disneyland));
        let oracle = Arc::new(oracle);
        let engine = Arc::new(RewardEngine::new(
            catalog,
            Arc::clone(&oracle) as Arc<dyn crate::ports::RewardOracle>,
            TaskGovernor::new(permits),
            Arc::new(ProximitySettings::default()),
        ));
        let tracker = Arc::new(LocationTracker::new(
            Arc::clone(&source) as Arc<dyn LocationSource>,
            Arc::clone(&engine),
        ));
        Fixture {
            source,
            oracle,
            engine,
            tracker,
        }
    }

    #[tokio::test]
    async fn track_user_appends_location_and_earns_reward() {
        let fx = fixture(StubOracle::new(), 4);
        let user = testkit::user("jon");

        let tracked = fx.tracker.track_user(&user).await.unwrap();
        tracked.scoring.wait().await;

        assert_eq!(tracked.visited.user_id, user.id());
        assert_eq!(user.last_visited_location(), Some(tracked.visited));
        assert_eq!(user.rewards().attraction_names(), vec!["Disneyland"]);
        assert_eq!(fx.engine.governor().available_permits(), 4);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_history_untouched() {
        let fx = fixture(StubOracle::new(), 1);
        let user = testkit::user("jon");
        fx.source.fail_for(user.id());

        let result = fx.tracker.track_user(&user).await;

        assert!(matches!(result, Err(TourGuideError::LocationSource(_))));
        assert_eq!(user.visit_count(), 0);
        assert_eq!(fx.engine.governor().available_permits(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_survives_failing_users_and_keeps_polling() {
        let fx = fixture(StubOracle::new(), 8);
        let registry = Arc::new(InMemoryUserRegistry::new());
        let healthy = testkit::user("healthy");
        let broken = testkit::user("broken");
        let elsewhere = testkit::user("elsewhere");
        fx.source.fail_for(broken.id());
        fx.source.place(elsewhere.id(), Location::new(0.0, 0.0));
        for user in [&healthy, &broken, &elsewhere] {
            registry.add_user(Arc::clone(user));
        }

        let handle = fx.tracker.start(registry, Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fx.source.fetches(), 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fx.source.fetches(), 6);
        assert!(!handle.is_finished());

        assert_eq!(healthy.visit_count(), 2);
        assert_eq!(broken.visit_count(), 0);
        assert_eq!(elsewhere.visit_count(), 2);
        assert_eq!(healthy.rewards().len(), 1);
        assert!(elsewhere.rewards().is_empty());

        handle.stop_tracking();
        handle.stop_tracking();
        assert!(handle.is_stopping());
        handle.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_does_not_wait_for_in_flight_scoring() {
        let fx = fixture(StubOracle::with_latency(Duration::from_secs(3600)), 4);
        let registry = Arc::new(InMemoryUserRegistry::new());
        let user = testkit::user("jon");
        registry.add_user(Arc::clone(&user));

        let handle = fx.tracker.start(registry, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;

        handle.shutdown_and_join().await;

        // scoring for Disneyland is still holding its permit
        assert_eq!(user.rewards().len(), 1);
        assert_eq!(user.rewards().get("Disneyland").unwrap().points(), None);
        assert_eq!(fx.engine.governor().in_flight(), 1);
        assert_eq!(fx.oracle.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let fx = fixture(StubOracle::new(), 4);
        let registry = Arc::new(InMemoryUserRegistry::new());
        registry.add_user(testkit::user("jon"));

        let handle = fx.tracker.start(registry, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(fx.source.fetches(), 1);
    }
}
