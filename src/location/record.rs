//! Rows served by the cache.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of `location_cities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub ident: String,
    /// The `cityid` column, carried through untouched.
    pub city_id: Option<i64>,
}

/// A row of `location_streets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    pub id: i64,
    pub ident: String,
    /// City owning the street.
    pub city_id: i64,
}

/// A row of `location_buildings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    pub city_id: i64,
    pub street_id: Option<i64>,
    pub building_num: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Building {
    pub fn key(&self) -> BuildingKey {
        BuildingKey::new(self.city_id, self.street_id, &self.building_num)
    }
}

/// Composite identity of a building within the cache.
///
/// Rendered as `city|street|number`, with an empty street segment for
/// buildings that are addressed directly on the city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildingKey {
    pub city_id: i64,
    pub street_id: Option<i64>,
    pub building_num: String,
}

impl BuildingKey {
    pub fn new(city_id: i64, street_id: Option<i64>, building_num: &str) -> Self {
        Self {
            city_id,
            street_id,
            building_num: building_num.to_owned(),
        }
    }
}

impl fmt::Display for BuildingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.street_id {
            Some(street_id) => write!(f, "{}|{}|{}", self.city_id, street_id, self.building_num),
            None => write!(f, "{}||{}", self.city_id, self.building_num),
        }
    }
}
