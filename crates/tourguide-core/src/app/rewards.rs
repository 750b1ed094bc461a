//! RewardEngine - 近接判定・重複排除・非同期採点
//!
//! # フロー（calculate_rewards）
//! 1. 履歴と proximity buffer をスナップショット
//! 2. 未獲得の attraction ごとに、履歴を追記順に走査して最初の近接地点を探す
//! 3. RewardBook::insert_if_absent で原子的に登録（競合に負けたら何もしない）
//! 4. この呼び出しで登録できた分だけ、governor 経由で採点タスクを投げる
//!
//! 採点は entry ごとの ScoringClaim を握ったタスクだけが行う。採点中の entry は
//! rescore_unscored でも二重に投げない。
//!
//! "最初の" は追記順（iteration order）での最初であり、訪問時刻の最早ではない。

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::app::config::ProximitySettings;
use crate::app::governor::TaskGovernor;
use crate::app::scoring::ScoringBatch;
use crate::domain::{
    Attraction, AttractionCatalog, Location, NearbyAttraction, TourGuideError, User, UserId,
    UserReward, VisitedLocation, distance,
};
use crate::ports::{LocationSource, RewardOracle};

/// Fetch the attraction catalog once, through the governor.
pub async fn load_catalog(
    source: Arc<dyn LocationSource>,
    governor: &TaskGovernor,
) -> Result<AttractionCatalog, TourGuideError> {
    let attractions = governor
        .run(async move { source.attractions().await })
        .await
        .map_err(|err| TourGuideError::Catalog(err.to_string()))?;
    debug!(count = attractions.len(), "attraction catalog loaded");
    Ok(AttractionCatalog::new(attractions))
}

pub struct RewardEngine {
    catalog: AttractionCatalog,
    oracle: Arc<dyn RewardOracle>,
    governor: TaskGovernor,
    settings: Arc<ProximitySettings>,
    runtime: Handle,
}

impl RewardEngine {
    /// Scoring tasks are spawned on the runtime current at construction.
    ///
    /// # Panics
    /// Outside a tokio runtime context.
    pub fn new(
        catalog: AttractionCatalog,
        oracle: Arc<dyn RewardOracle>,
        governor: TaskGovernor,
        settings: Arc<ProximitySettings>,
    ) -> Self {
        Self {
            catalog,
            oracle,
            governor,
            settings,
            runtime: Handle::current(),
        }
    }

    pub fn catalog(&self) -> &AttractionCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Arc<ProximitySettings> {
        &self.settings
    }

    pub fn governor(&self) -> &TaskGovernor {
        &self.governor
    }

    /// Coarse filter, independent of the mutable buffer.
    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: &Location,
    ) -> bool {
        distance(&attraction.location, location) <= self.settings.attraction_proximity_range()
    }

    /// Matching predicate, evaluated against the buffer as of now.
    pub fn near_attraction(&self, visited: &VisitedLocation, attraction: &Attraction) -> bool {
        within_buffer(self.settings.proximity_buffer(), visited, attraction)
    }

    /// Record newly earned attractions for `user` and dispatch their scoring.
    ///
    /// Scoring runs in the background on the engine's runtime, so this can be
    /// called from any thread. The returned batch only lets callers wait.
    pub fn calculate_rewards(&self, user: &User) -> ScoringBatch {
        let buffer = self.settings.proximity_buffer();
        let visited = user.visited_locations();

        let mut earned = Vec::new();
        for attraction in self.catalog.iter() {
            if user.rewards().contains(&attraction.name) {
                continue;
            }
            let Some(location) = visited
                .iter()
                .find(|v| within_buffer(buffer, v, attraction))
            else {
                continue;
            };

            let reward = Arc::new(UserReward::new(location.clone(), attraction.clone()));
            // 別の呼び出しが先に登録していたら負け（二重登録しない）
            if user.rewards().insert_if_absent(Arc::clone(&reward)) {
                earned.push(reward);
            }
        }

        if !earned.is_empty() {
            debug!(
                user = %user.id(),
                earned = earned.len(),
                buffer,
                "new rewards recorded"
            );
        }
        self.dispatch_scoring(user.id(), earned)
    }

    /// Re-dispatch scoring for entries whose points are still unset, e.g.
    /// after an oracle failure or timeout. Entries with a call in flight are
    /// skipped.
    pub fn rescore_unscored(&self, user: &User) -> ScoringBatch {
        let unscored: Vec<_> = user
            .user_rewards()
            .into_iter()
            .filter(|r| !r.is_scored())
            .collect();
        self.dispatch_scoring(user.id(), unscored)
    }

    fn dispatch_scoring(&self, user_id: UserId, rewards: Vec<Arc<UserReward>>) -> ScoringBatch {
        let mut batch = ScoringBatch::empty();
        for claim in rewards.iter().filter_map(|r| r.try_claim_scoring()) {
            let governor = self.governor.clone();
            let oracle = Arc::clone(&self.oracle);
            let attraction_name = claim.reward().attraction_name().to_owned();

            let handle = self.runtime.spawn(async move {
                let attraction_id = claim.reward().attraction.id;
                let result = governor
                    .run(async { oracle.points(attraction_id, user_id).await })
                    .await;
                match result {
                    Ok(points) => {
                        let stored = claim.record(points);
                        debug!(
                            user = %user_id,
                            attraction = %claim.reward().attraction_name(),
                            points = stored,
                            "reward scored"
                        );
                        Ok(stored)
                    }
                    Err(err) => {
                        warn!(
                            user = %user_id,
                            attraction = %claim.reward().attraction_name(),
                            error = %err,
                            "reward scoring failed; points left unset"
                        );
                        Err(err)
                    }
                }
            });
            batch.push(attraction_name, handle);
        }
        batch
    }

    /// The `limit` catalog attractions closest to `location`, nearest first,
    /// each with its reward points for `user_id`.
    ///
    /// A failed oracle call yields 0 points for that row only.
    pub async fn nearby_attractions(
        &self,
        location: &Location,
        user_id: UserId,
        limit: usize,
    ) -> Vec<NearbyAttraction> {
        let mut ranked: Vec<(&Attraction, f64)> = self
            .catalog
            .iter()
            .map(|a| (a, distance(location, &a.location)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(limit);

        let handles: Vec<_> = ranked
            .iter()
            .map(|(attraction, _)| {
                let oracle = Arc::clone(&self.oracle);
                let attraction_id = attraction.id;
                self.governor
                    .spawn(async move { oracle.points(attraction_id, user_id).await })
            })
            .collect();

        let mut rows = Vec::with_capacity(ranked.len());
        for ((attraction, miles), handle) in ranked.into_iter().zip(handles) {
            let result = handle.await.map_err(TourGuideError::from).and_then(|r| r);
            let reward_points = match result {
                Ok(points) => points,
                Err(err) => {
                    warn!(
                        user = %user_id,
                        attraction = %attraction.name,
                        error = %err,
                        "nearby scoring failed"
                    );
                    0
                }
            };
            rows.push(NearbyAttraction {
                attraction_name: attraction.name.clone(),
                attraction_location: attraction.location,
                user_location: *location,
                distance: miles,
                reward_points,
            });
        }
        rows
    }
}

fn within_buffer(buffer: f64, visited: &VisitedLocation, attraction: &Attraction) -> bool {
    visited.location.distance_to(&attraction.location) <= buffer
}
