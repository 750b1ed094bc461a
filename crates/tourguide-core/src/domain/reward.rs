//! Reward entries and the per-user reward book.
//!
//! The book is the only place the at-most-one-entry-per-attraction invariant
//! is enforced: `insert_if_absent` checks and inserts under a single lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::Mutex;

use super::attraction::Attraction;
use super::visited::VisitedLocation;

/// A per-user, per-attraction record granting points.
///
/// `points` is unset until the oracle answers and is set at most once.
/// At most one oracle call per entry is in flight, guarded by `scoring`.
#[derive(Debug)]
pub struct UserReward {
    pub visited_location: VisitedLocation,
    pub attraction: Attraction,
    points: OnceLock<i32>,
    scoring: AtomicBool,
}

impl UserReward {
    pub fn new(visited_location: VisitedLocation, attraction: Attraction) -> Self {
        Self {
            visited_location,
            attraction,
            points: OnceLock::new(),
            scoring: AtomicBool::new(false),
        }
    }

    pub fn attraction_name(&self) -> &str {
        &self.attraction.name
    }

    pub fn points(&self) -> Option<i32> {
        self.points.get().copied()
    }

    /// Points as summed by callers that treat "not yet scored" as zero.
    pub fn points_or_zero(&self) -> i32 {
        self.points().unwrap_or(0)
    }

    pub fn is_scored(&self) -> bool {
        self.points.get().is_some()
    }

    /// Record the oracle's answer. Returns `false` if points were already set
    /// (the first value wins).
    pub fn set_points(&self, points: i32) -> bool {
        self.points.set(points).is_ok()
    }

    /// Whether an oracle call for this entry is currently claimed.
    pub fn is_scoring(&self) -> bool {
        self.scoring.load(Ordering::SeqCst)
    }

    /// Claim the right to score this entry. `None` when it is already scored
    /// or another claim is live. The claim is released on drop.
    pub fn try_claim_scoring(self: &Arc<Self>) -> Option<ScoringClaim> {
        if self
            .scoring
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        let claim = ScoringClaim {
            reward: Arc::clone(self),
        };
        // the previous holder may have stored points just before releasing
        if self.is_scored() {
            return None;
        }
        Some(claim)
    }
}

/// Exclusive right to call the oracle for one entry.
#[derive(Debug)]
pub struct ScoringClaim {
    reward: Arc<UserReward>,
}

impl ScoringClaim {
    pub fn reward(&self) -> &Arc<UserReward> {
        &self.reward
    }

    /// Store `points` and return the value the entry ends up holding.
    pub fn record(&self, points: i32) -> i32 {
        self.reward.set_points(points);
        self.reward.points().unwrap_or(points)
    }
}

impl Drop for ScoringClaim {
    fn drop(&mut self) {
        self.reward.scoring.store(false, Ordering::SeqCst);
    }
}

/// Insertion-ordered reward entries keyed by attraction name.
#[derive(Debug, Default)]
pub struct RewardBook {
    entries: Mutex<IndexMap<String, Arc<UserReward>>>,
}

impl RewardBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert `reward` unless an entry for the same attraction
    /// name exists. Returns `true` when this call inserted it.
    pub fn insert_if_absent(&self, reward: Arc<UserReward>) -> bool {
        let key = reward.attraction_name().to_owned();
        match self.entries.lock().entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(reward);
                true
            }
        }
    }

    pub fn contains(&self, attraction_name: &str) -> bool {
        self.entries.lock().contains_key(attraction_name)
    }

    pub fn get(&self, attraction_name: &str) -> Option<Arc<UserReward>> {
        self.entries.lock().get(attraction_name).cloned()
    }

    /// Copy of the current entries, in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<UserReward>> {
        self.entries.lock().values().cloned().collect()
    }

    pub fn attraction_names(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
