//! Scripted collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{
    Attraction, AttractionCatalog, AttractionId, Location, TourGuideError, User, UserId,
    VisitedLocation,
};
use crate::ports::{LocationSource, RewardOracle};

pub fn attraction(name: &str, lat: f64, lon: f64) -> Attraction {
    Attraction::new(
        AttractionId::random(),
        name,
        "Somewhere",
        "XX",
        Location::new(lat, lon),
    )
}

/// Three attractions far enough apart that a 10-mile buffer never overlaps.
pub fn small_catalog() -> AttractionCatalog {
    AttractionCatalog::new(vec![
        attraction("Disneyland", 33.817595, -117.922008),
        attraction("Jackson Hole", 43.582767, -110.821999),
        attraction("Bronx Zoo", 40.852905, -73.872971),
    ])
}

pub fn user(name: &str) -> Arc<User> {
    Arc::new(User::new(
        UserId::random(),
        name,
        "000",
        format!("{name}@tourGuide.com"),
    ))
}

pub fn visit(user: &User, location: Location) {
    user.add_visited_location(VisitedLocation::new(user.id(), location, Utc::now()));
}

/// Oracle with scripted answers (1 point when unscripted), optional latency,
/// scripted failures and an overlap gauge.
#[derive(Default)]
pub struct StubOracle {
    points: Mutex<HashMap<AttractionId, i32>>,
    failing: Mutex<HashSet<AttractionId>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn answer(&self, attraction_id: AttractionId, points: i32) {
        self.points.lock().insert(attraction_id, points);
    }

    pub fn fail_for(&self, attraction_id: AttractionId) {
        self.failing.lock().insert(attraction_id);
    }

    pub fn recover(&self, attraction_id: AttractionId) {
        self.failing.lock().remove(&attraction_id);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardOracle for StubOracle {
    async fn points(
        &self,
        attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, TourGuideError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().contains(&attraction_id) {
            return Err(TourGuideError::Oracle(format!(
                "no score for {attraction_id}"
            )));
        }
        Ok(self.points.lock().get(&attraction_id).copied().unwrap_or(1))
    }
}

/// Location source that reports a fixed position per user (or a default),
/// and can be told to fail for specific users.
pub struct StubLocationSource {
    catalog: AttractionCatalog,
    default_position: Location,
    positions: Mutex<HashMap<UserId, Location>>,
    failing: Mutex<HashSet<UserId>>,
    fetches: AtomicUsize,
}

impl StubLocationSource {
    pub fn new(catalog: AttractionCatalog, default_position: Location) -> Self {
        Self {
            catalog,
            default_position,
            positions: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn place(&self, user_id: UserId, location: Location) {
        self.positions.lock().insert(user_id, location);
    }

    pub fn fail_for(&self, user_id: UserId) {
        self.failing.lock().insert(user_id);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationSource for StubLocationSource {
    async fn current_location(&self, user_id: UserId) -> Result<VisitedLocation, TourGuideError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&user_id) {
            return Err(TourGuideError::LocationSource(format!(
                "gps offline for {user_id}"
            )));
        }
        let location = self
            .positions
            .lock()
            .get(&user_id)
            .copied()
            .unwrap_or(self.default_position);
        Ok(VisitedLocation::new(user_id, location, Utc::now()))
    }

    async fn attractions(&self) -> Result<Vec<Attraction>, TourGuideError> {
        Ok(self.catalog.to_vec())
    }
}
