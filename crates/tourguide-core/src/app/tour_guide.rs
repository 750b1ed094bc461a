//! TourGuide - 外部に見せる操作の表面
//!
//! HTTP 層はここを呼ぶだけの薄い殻になる想定です。

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::app::config::{EngineConfig, ProximitySettings};
use crate::app::rewards::RewardEngine;
use crate::app::scoring::ScoringBatch;
use crate::app::tracker::{LocationTracker, TrackedLocation, TrackerHandle};
use crate::domain::{NearbyAttraction, TourGuideError, User, UserReward, VisitedLocation};
use crate::ports::UserRegistry;

pub struct TourGuide {
    config: EngineConfig,
    registry: Arc<dyn UserRegistry>,
    engine: Arc<RewardEngine>,
    tracker: Arc<LocationTracker>,
    tracking: Mutex<Option<TrackerHandle>>,
}

impl TourGuide {
    pub(crate) fn new(
        config: EngineConfig,
        registry: Arc<dyn UserRegistry>,
        engine: Arc<RewardEngine>,
        tracker: Arc<LocationTracker>,
    ) -> Self {
        Self {
            config,
            registry,
            engine,
            tracker,
            tracking: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<RewardEngine> {
        &self.engine
    }

    pub fn settings(&self) -> &Arc<ProximitySettings> {
        self.engine.settings()
    }

    // ---- users ----

    pub fn user(&self, name: &str) -> Result<Arc<User>, TourGuideError> {
        self.registry
            .user(name)
            .ok_or_else(|| TourGuideError::UnknownUser(name.to_owned()))
    }

    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.registry.all_users()
    }

    /// Register `user` unless the name is taken.
    pub fn add_user(&self, user: Arc<User>) -> bool {
        self.registry.add_user(user)
    }

    // ---- locations & rewards ----

    /// Last known location, or a fresh fetch when the user has none yet.
    pub async fn user_location(&self, user: &User) -> Result<VisitedLocation, TourGuideError> {
        match user.last_visited_location() {
            Some(visited) => Ok(visited),
            None => Ok(self.tracker.track_user(user).await?.visited),
        }
    }

    pub async fn track_user(&self, user: &User) -> Result<TrackedLocation, TourGuideError> {
        self.tracker.track_user(user).await
    }

    pub fn user_rewards(&self, user: &User) -> Vec<Arc<UserReward>> {
        user.user_rewards()
    }

    pub fn calculate_rewards(&self, user: &User) -> ScoringBatch {
        self.engine.calculate_rewards(user)
    }

    pub fn rescore_unscored(&self, user: &User) -> ScoringBatch {
        self.engine.rescore_unscored(user)
    }

    /// The configured number of attractions closest to the user's location.
    pub async fn nearby_attractions(
        &self,
        user: &User,
    ) -> Result<Vec<NearbyAttraction>, TourGuideError> {
        let visited = self.user_location(user).await?;
        Ok(self
            .engine
            .nearby_attractions(
                &visited.location,
                user.id(),
                self.config.nearby_attraction_count,
            )
            .await)
    }

    // ---- proximity buffer ----

    pub fn proximity_buffer(&self) -> f64 {
        self.settings().proximity_buffer()
    }

    pub fn set_proximity_buffer(&self, miles: f64) -> Result<(), TourGuideError> {
        self.settings().set_proximity_buffer(miles)
    }

    pub fn reset_proximity_buffer(&self) {
        self.settings().reset_proximity_buffer();
    }

    // ---- tracking loop ----

    /// Start the background loop unless it is already running.
    pub fn start_tracking(&self) {
        let mut tracking = self.tracking.lock();
        if tracking.as_ref().is_some_and(|h| !h.is_stopping()) {
            return;
        }
        *tracking = Some(
            self.tracker
                .start(Arc::clone(&self.registry), self.config.tracking_interval),
        );
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_stopping() && !h.is_finished())
    }

    /// Signal the loop to stop. Idempotent; in-flight scoring keeps going.
    pub fn stop_tracking(&self) {
        if let Some(handle) = self.tracking.lock().as_ref() {
            if !handle.is_stopping() {
                info!("stopping tracker");
            }
            handle.stop_tracking();
        }
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(&self) {
        let handle = self.tracking.lock().take();
        if let Some(handle) = handle {
            handle.shutdown_and_join().await;
        }
    }
}
