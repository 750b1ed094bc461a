//! Simulated collaborators - 外部 GPS / ポイント算出サービスの代用品
//!
//! CLI とテストで使います。遅い外部呼び出しを再現するため、任意の遅延を入れられます。

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::{Attraction, AttractionId, Location, TourGuideError, UserId, VisitedLocation};
use crate::ports::{Clock, IdGenerator, LocationSource, RewardOracle, SystemClock, UlidGenerator};

/// Web Mercator latitude limit.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// (name, city, state, latitude, longitude)
const ATTRACTIONS: [(&str, &str, &str, f64, f64); 26] = [
    ("Disneyland", "Anaheim", "CA", 33.817595, -117.922008),
    ("Jackson Hole", "Jackson Hole", "WY", 43.582767, -110.821999),
    ("Mojave National Preserve", "Kelso", "CA", 35.141689, -115.510399),
    ("Joshua Tree National Park", "Joshua Tree National Park", "CA", 33.881866, -115.90065),
    ("Buffalo National River", "St Joe", "AR", 35.985512, -92.757652),
    ("Hot Springs National Park", "Hot Springs", "AR", 34.52153, -93.042267),
    ("Kartchner Caverns State Park", "Benson", "AZ", 31.837551, -110.347382),
    ("Legend Valley", "Thornville", "OH", 39.937778, -82.40667),
    ("Flowers Bakery of London", "Flowers Bakery of London", "KY", 37.131527, -84.07486),
    ("McKinley Tower", "Anchorage", "AK", 61.218887, -149.877502),
    ("Flatiron Building", "New York City", "NY", 40.741112, -73.989723),
    ("Fallingwater", "Mill Run", "PA", 39.906113, -79.468056),
    ("Union Station", "Washington D.C.", "DC", 38.897095, -77.006332),
    ("Roger Dean Stadium", "Jupiter", "FL", 26.890959, -80.116577),
    ("Texas Memorial Stadium", "Austin", "TX", 30.283682, -97.732536),
    ("Bryant-Denny Stadium", "Tuscaloosa", "AL", 33.208973, -87.550438),
    ("Tiger Stadium", "Baton Rouge", "LA", 30.412035, -91.183815),
    ("Neyland Stadium", "Knoxville", "TN", 35.955013, -83.925011),
    ("Kyle Field", "College Station", "TX", 30.61025, -96.339844),
    ("San Diego Zoo", "San Diego", "CA", 32.735317, -117.149048),
    ("Zoo Tampa at Lowry Park", "Tampa", "FL", 28.012804, -82.469269),
    ("Franklin Park Zoo", "Boston", "MA", 42.302601, -71.086731),
    ("El Paso Zoo", "El Paso", "TX", 31.769125, -106.44487),
    ("Kansas City Zoo", "Kansas City", "MO", 39.007504, -94.529625),
    ("Bronx Zoo", "Bronx", "NY", 40.852905, -73.872971),
    ("Cinderella Castle", "Orlando", "FL", 28.419411, -81.5812),
];

/// Built-in catalog with fresh ids.
pub fn default_attractions(ids: &dyn IdGenerator) -> Vec<Attraction> {
    ATTRACTIONS
        .iter()
        .map(|&(name, city, state, lat, lon)| {
            Attraction::new(
                ids.generate_attraction_id(),
                name,
                city,
                state,
                Location::new(lat, lon),
            )
        })
        .collect()
}

/// GPS stand-in: random positions, fixed catalog.
pub struct SimulatedLocationSource<C = SystemClock> {
    clock: C,
    attractions: Vec<Attraction>,
    latency: Option<Duration>,
}

impl SimulatedLocationSource<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SimulatedLocationSource<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Copy> SimulatedLocationSource<C> {
    pub fn with_clock(clock: C) -> Self {
        let attractions = default_attractions(&UlidGenerator::new(clock));
        Self {
            clock,
            attractions,
            latency: None,
        }
    }
}

impl<C: Clock> SimulatedLocationSource<C> {
    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl<C: Clock> LocationSource for SimulatedLocationSource<C> {
    async fn current_location(&self, user_id: UserId) -> Result<VisitedLocation, TourGuideError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let location = {
            let mut rng = rand::thread_rng();
            Location::new(
                rng.gen_range(-MAX_LATITUDE..=MAX_LATITUDE),
                rng.gen_range(-180.0..=180.0),
            )
        };
        Ok(VisitedLocation::new(user_id, location, self.clock.now()))
    }

    async fn attractions(&self) -> Result<Vec<Attraction>, TourGuideError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.attractions.clone())
    }
}

/// Reward service stand-in: uniform points in 1..=1000.
#[derive(Debug, Default)]
pub struct SimulatedRewardOracle {
    latency: Option<Duration>,
}

impl SimulatedRewardOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl RewardOracle for SimulatedRewardOracle {
    async fn points(
        &self,
        _attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, TourGuideError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(rand::thread_rng().gen_range(1..=1000))
    }
}
