//! Domain model (ids, coordinates, users, rewards, errors).

pub mod attraction;
pub mod errors;
pub mod geo;
pub mod ids;
pub mod nearby;
pub mod reward;
pub mod user;
pub mod visited;

pub use self::attraction::{Attraction, AttractionCatalog};
pub use self::errors::{ErrorKind, TourGuideError};
pub use self::geo::{Location, distance};
pub use self::ids::{AttractionId, UserId};
pub use self::nearby::NearbyAttraction;
pub use self::reward::{RewardBook, ScoringClaim, UserReward};
pub use self::user::User;
pub use self::visited::VisitedLocation;
