use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::Location;
use super::ids::UserId;

/// A timestamped coordinate recorded for a user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedLocation {
    pub user_id: UserId,
    pub location: Location,
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    pub fn new(user_id: UserId, location: Location, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}
