use crate::domain::Coordinate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

pub const DEFAULT_NAME: &str = "New Location";

/// A saved place. Identity is the `id`, two locations with the same id are equal regardless of
/// their other fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, description: impl Into<String>, coordinate: Coordinate) -> Self {
        Location {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }

    pub fn at(coordinate: Coordinate) -> Self {
        Location::new(DEFAULT_NAME, "", coordinate)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Copy of this location under a fresh id, used when an edit is saved.
    pub fn edited(&self, name: impl Into<String>, description: impl Into<String>) -> Self {
        Location {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    #[cfg(test)]
    pub fn example() -> Self {
        Location::new("Buckingham Palace", "Lit by over 40,000 lightbulbs.", Coordinate::new(51.501, -0.141))
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
