use serde::{Deserialize, Serialize};

use super::geo::Location;

/// One row of a "closest attractions" answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyAttraction {
    pub attraction_name: String,
    pub attraction_location: Location,
    pub user_location: Location,
    /// Statute miles.
    pub distance: f64,
    pub reward_points: i32,
}
