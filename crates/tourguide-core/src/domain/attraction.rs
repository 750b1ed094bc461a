//! Attraction catalog types.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::geo::Location;
use super::ids::AttractionId;

/// A fixed point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: AttractionId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub location: Location,
}

impl Attraction {
    pub fn new(
        id: AttractionId,
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            city: city.into(),
            state: state.into(),
            location,
        }
    }
}

/// Read-only attraction catalog, loaded once and shared.
///
/// Cloning is cheap (`Arc`).
#[derive(Debug, Clone, Default)]
pub struct AttractionCatalog {
    attractions: Arc<[Attraction]>,
}

impl AttractionCatalog {
    pub fn new(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions: attractions.into(),
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&Attraction> {
        self.attractions.iter().find(|a| a.name == name)
    }
}

impl Deref for AttractionCatalog {
    type Target = [Attraction];

    fn deref(&self) -> &[Attraction] {
        &self.attractions
    }
}
