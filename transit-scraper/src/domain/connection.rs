//! Connection types.
//!
//! A `Connection` is one itinerary returned by a connection search: an
//! ordered list of legs, each either a ride on a public line or a walk.

use chrono::{Duration, NaiveDateTime};

use super::{Line, Location};

/// A ride on a public transport line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLeg {
    /// Line ridden
    pub line: Line,
    /// Direction shown on the vehicle
    pub destination: Option<String>,
    /// Boarding stop
    pub departure: Location,
    /// Scheduled departure
    pub departure_time: NaiveDateTime,
    /// Boarding platform
    pub departure_platform: Option<String>,
    /// Alighting stop
    pub arrival: Location,
    /// Scheduled arrival
    pub arrival_time: NaiveDateTime,
    /// Alighting platform
    pub arrival_platform: Option<String>,
}

/// A walk between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footway {
    /// Walking time in minutes
    pub min: u32,
    /// Where the walk starts
    pub departure: Location,
    /// Where the walk ends
    pub arrival: Location,
    /// When the walk starts
    pub departure_time: NaiveDateTime,
}

impl Footway {
    /// Returns when the walk ends.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.departure_time + Duration::minutes(i64::from(self.min))
    }
}

/// A leg of a connection: either a ride or a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    /// A ride on a public line
    Public(PublicLeg),
    /// A walk between stops
    Footway(Footway),
}

impl Leg {
    /// Returns where this leg starts.
    pub fn departure(&self) -> &Location {
        match self {
            Leg::Public(leg) => &leg.departure,
            Leg::Footway(walk) => &walk.departure,
        }
    }

    /// Returns where this leg ends.
    pub fn arrival(&self) -> &Location {
        match self {
            Leg::Public(leg) => &leg.arrival,
            Leg::Footway(walk) => &walk.arrival,
        }
    }

    /// Returns when this leg starts.
    pub fn departure_time(&self) -> NaiveDateTime {
        match self {
            Leg::Public(leg) => leg.departure_time,
            Leg::Footway(walk) => walk.departure_time,
        }
    }

    /// Returns when this leg ends.
    pub fn arrival_time(&self) -> NaiveDateTime {
        match self {
            Leg::Public(leg) => leg.arrival_time,
            Leg::Footway(walk) => walk.arrival_time(),
        }
    }

    /// Returns the line if this is a ride.
    pub fn line(&self) -> Option<&Line> {
        match self {
            Leg::Public(leg) => Some(&leg.line),
            Leg::Footway(_) => None,
        }
    }
}

/// One itinerary from a connection search.
///
/// # Invariants
///
/// - At least one leg (enforced by the parser, which skips empty records)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Backend-assigned identifier
    pub id: String,
    /// Legs in travel order
    pub legs: Vec<Leg>,
}

impl Connection {
    /// Returns where the connection starts.
    pub fn from(&self) -> Option<&Location> {
        self.legs.first().map(Leg::departure)
    }

    /// Returns where the connection ends.
    pub fn to(&self) -> Option<&Location> {
        self.legs.last().map(Leg::arrival)
    }

    /// Returns when the connection starts.
    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        self.legs.first().map(Leg::departure_time)
    }

    /// Returns when the connection ends.
    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        self.legs.last().map(Leg::arrival_time)
    }

    /// Returns the number of changes between rides.
    pub fn changes(&self) -> usize {
        let rides = self
            .legs
            .iter()
            .filter(|l| matches!(l, Leg::Public(_)))
            .count();
        rides.saturating_sub(1)
    }
}
