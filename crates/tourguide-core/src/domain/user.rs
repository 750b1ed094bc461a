//! Tracked user: identity, visited-location history and reward book.

use std::sync::Arc;

use parking_lot::RwLock;

use super::ids::UserId;
use super::reward::{RewardBook, UserReward};
use super::visited::VisitedLocation;

/// A tracked user.
///
/// Shared as `Arc<User>` between the registry, the tracker and scoring tasks.
/// History is append-only; readers get a snapshot and never hold the lock
/// across an await.
#[derive(Debug)]
pub struct User {
    id: UserId,
    name: String,
    phone: String,
    email: String,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    rewards: RewardBook,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            visited_locations: RwLock::new(Vec::new()),
            rewards: RewardBook::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn add_visited_location(&self, location: VisitedLocation) {
        self.visited_locations.write().push(location);
    }

    /// Copy of the history in append order.
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().cloned()
    }

    pub fn visit_count(&self) -> usize {
        self.visited_locations.read().len()
    }

    pub fn rewards(&self) -> &RewardBook {
        &self.rewards
    }

    pub fn user_rewards(&self) -> Vec<Arc<UserReward>> {
        self.rewards.snapshot()
    }

    /// Sum of scored points; unscored entries count as zero.
    pub fn total_reward_points(&self) -> i64 {
        self.rewards
            .snapshot()
            .iter()
            .map(|r| i64::from(r.points_or_zero()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use chrono::Utc;

    #[test]
    fn history_is_append_ordered() {
        let user = User::new(UserId::random(), "jon", "000", "jon@tourGuide.com");
        assert!(user.last_visited_location().is_none());

        for lat in [1.0, 2.0, 3.0] {
            user.add_visited_location(VisitedLocation::new(
                user.id(),
                Location::new(lat, 0.0),
                Utc::now(),
            ));
        }

        let lats: Vec<f64> = user
            .visited_locations()
            .iter()
            .map(|v| v.location.latitude)
            .collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            user.last_visited_location().map(|v| v.location.latitude),
            Some(3.0)
        );
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let user = User::new(UserId::random(), "jon", "000", "jon@tourGuide.com");
        user.add_visited_location(VisitedLocation::new(
            user.id(),
            Location::new(0.0, 0.0),
            Utc::now(),
        ));
        let snapshot = user.visited_locations();
        user.add_visited_location(VisitedLocation::new(
            user.id(),
            Location::new(1.0, 1.0),
            Utc::now(),
        ));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(user.visit_count(), 2);
    }
}
