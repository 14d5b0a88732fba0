//! Location type.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Kind of place a [`Location`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    /// A stop or station, usually identified by id.
    Station,
    /// A street address.
    Address,
    /// A point of interest.
    Poi,
    /// Free text the backend resolves itself.
    Any,
    /// A bare coordinate.
    Coordinate,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocationType::Station => "STATION",
            LocationType::Address => "ADDRESS",
            LocationType::Poi => "POI",
            LocationType::Any => "ANY",
            LocationType::Coordinate => "COORDINATE",
        };
        f.write_str(s)
    }
}

/// A point of interest: station, address, POI or coordinate.
///
/// A location is resolvable by a non-zero provider id, by a non-zero
/// coordinate, or by a non-empty name; construction fails if none holds.
/// Coordinates are micro-degrees.
///
/// Two locations are equal when their types match and either both carry
/// the same non-zero id, or both have id 0 and equal names. The id
/// dominates: names are ignored once an id is known.
///
/// # Examples
///
/// ```
/// use transit_scraper::domain::Location;
///
/// use transit_scraper::domain::LocationType;
///
/// let a = Location::new(LocationType::Station, 3000001, 0, 0, "").unwrap();
/// let b = Location::new(LocationType::Station, 3000001, 0, 0, "Hauptwache").unwrap();
/// assert_eq!(a, b);
///
/// assert!(Location::any("").is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    location_type: LocationType,
    id: u32,
    lat: i32,
    lon: i32,
    name: String,
}

impl Location {
    /// Create a location, checking that it is resolvable.
    pub fn new(
        location_type: LocationType,
        id: u32,
        lat: i32,
        lon: i32,
        name: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if id == 0 && lat == 0 && lon == 0 && name.is_empty() {
            return Err(ConfigurationError::UnresolvableLocation);
        }

        Ok(Self {
            location_type,
            id,
            lat,
            lon,
            name,
        })
    }

    /// A station known only by id. Callers pass a non-zero id.
    pub(crate) fn station(id: u32) -> Self {
        Self {
            location_type: LocationType::Station,
            id,
            lat: 0,
            lon: 0,
            name: String::new(),
        }
    }

    /// A station with id and display name.
    pub(crate) fn station_named(id: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::station(id)
        }
    }

    /// A bare coordinate. Callers pass a non-zero coordinate.
    #[cfg(test)]
    pub(crate) fn coordinate(lat: i32, lon: i32) -> Self {
        Self {
            location_type: LocationType::Coordinate,
            id: 0,
            lat,
            lon,
            name: String::new(),
        }
    }

    /// Free text for the backend to resolve.
    pub fn any(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::new(LocationType::Any, 0, 0, 0, name)
    }

    /// Returns the location type.
    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// Returns the provider id (0 if absent).
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the latitude in micro-degrees (0 if absent).
    pub fn lat(&self) -> i32 {
        self.lat
    }

    /// Returns the longitude in micro-degrees (0 if absent).
    pub fn lon(&self) -> i32 {
        self.lon
    }

    /// Returns the display name (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the location carries a provider id.
    pub fn has_id(&self) -> bool {
        self.id != 0
    }

    /// Whether the location carries a coordinate.
    pub fn has_coordinate(&self) -> bool {
        self.lat != 0 || self.lon != 0
    }

    /// Debug rendering: `[STATION 3000001 'Hauptwache']`.
    pub fn debug_string(&self) -> String {
        format!("[{} {} '{}']", self.location_type, self.id, self.name)
    }
}

/// Serialized form, checked by [`Location::new`] on the way in.
#[derive(Deserialize)]
struct RawLocation {
    location_type: LocationType,
    id: u32,
    lat: i32,
    lon: i32,
    name: String,
}

impl TryFrom<RawLocation> for Location {
    type Error = ConfigurationError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.location_type, raw.id, raw.lat, raw.lon, raw.name)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        if self.location_type != other.location_type || self.id != other.id {
            return false;
        }
        self.id != 0 || self.name == other.name
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location_type.hash(state);
        self.id.hash(state);
        if self.id == 0 {
            self.name.hash(state);
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location{}", self.debug_string())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
