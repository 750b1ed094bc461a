//! Config - 起動時設定と実行時に変更できる proximity 設定

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::TourGuideError;

pub const DEFAULT_PERMITS: usize = 100;
pub const DEFAULT_PROXIMITY_BUFFER_MILES: f64 = 10.0;
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

/// Process-wide engine configuration, fixed at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Governor capacity shared by every subsystem.
    pub permits: usize,

    /// Initial (and reset) value of the mutable proximity buffer.
    pub proximity_buffer_miles: f64,

    /// Coarse filter used by `is_within_attraction_proximity`.
    pub attraction_proximity_range_miles: f64,

    /// Pause between two tracking rounds.
    pub tracking_interval: Duration,

    /// Upper bound on a single location fetch or oracle call.
    /// `None` lets an unresponsive collaborator hold its permit forever.
    pub call_timeout: Option<Duration>,

    /// Rows returned by `nearby_attractions`.
    pub nearby_attraction_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            permits: DEFAULT_PERMITS,
            proximity_buffer_miles: DEFAULT_PROXIMITY_BUFFER_MILES,
            attraction_proximity_range_miles: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
            tracking_interval: Duration::from_secs(5 * 60),
            call_timeout: Some(Duration::from_secs(30)),
            nearby_attraction_count: 5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), TourGuideError> {
        if self.permits == 0 {
            return Err(TourGuideError::InvalidConfig(
                "permits must be at least 1".into(),
            ));
        }
        check_miles("proximity_buffer_miles", self.proximity_buffer_miles)?;
        check_miles(
            "attraction_proximity_range_miles",
            self.attraction_proximity_range_miles,
        )?;
        if self.call_timeout == Some(Duration::ZERO) {
            return Err(TourGuideError::InvalidConfig(
                "call_timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_miles(field: &str, miles: f64) -> Result<(), TourGuideError> {
    if miles.is_nan() || miles < 0.0 {
        return Err(TourGuideError::InvalidConfig(format!(
            "{field} must be a non-negative number of miles, got {miles}"
        )));
    }
    Ok(())
}

/// Proximity thresholds shared by the engine and the facade.
///
/// The buffer is stored as f64 bits in an atomic: writers never block
/// readers, and the engine reads it once per call.
#[derive(Debug)]
pub struct ProximitySettings {
    buffer_bits: AtomicU64,
    default_buffer: f64,
    attraction_range: f64,
}

impl ProximitySettings {
    pub fn new(default_buffer: f64, attraction_range: f64) -> Self {
        Self {
            buffer_bits: AtomicU64::new(default_buffer.to_bits()),
            default_buffer,
            attraction_range,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.proximity_buffer_miles,
            config.attraction_proximity_range_miles,
        )
    }

    pub fn proximity_buffer(&self) -> f64 {
        f64::from_bits(self.buffer_bits.load(Ordering::Acquire))
    }

    /// Last write wins. Infinite values are accepted ("everything is near").
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<(), TourGuideError> {
        check_miles("proximity_buffer", miles)?;
        self.buffer_bits.store(miles.to_bits(), Ordering::Release);
        Ok(())
    }

    pub fn reset_proximity_buffer(&self) {
        self.buffer_bits
            .store(self.default_buffer.to_bits(), Ordering::Release);
    }

    pub fn attraction_proximity_range(&self) -> f64 {
        self.attraction_range
    }
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROXIMITY_BUFFER_MILES,
            DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
        )
    }
}
