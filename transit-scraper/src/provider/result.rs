//! Operation results.
//!
//! Each result carries a status next to its records. A degraded answer
//! (unknown station, backend down) is a status, never an empty list
//! pretending to be complete.

use super::context::ConnectionsContext;
use crate::domain::{Connection, Location, StationDepartures};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbyStatus {
    Ok,
    ServiceDown,
}

/// Stations near a location, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyStationsResult {
    pub status: NearbyStatus,
    pub stations: Vec<Location>,
}

impl NearbyStationsResult {
    pub fn ok(stations: Vec<Location>) -> Self {
        Self {
            status: NearbyStatus::Ok,
            stations,
        }
    }

    pub fn service_down() -> Self {
        Self {
            status: NearbyStatus::ServiceDown,
            stations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeparturesStatus {
    Ok,
    /// Backend does not know the requested station
    InvalidStation,
    ServiceDown,
}

/// Departure boards, one per station on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDeparturesResult {
    pub status: DeparturesStatus,
    pub stations: Vec<StationDepartures>,
}

impl QueryDeparturesResult {
    pub fn with_status(status: DeparturesStatus) -> Self {
        Self {
            status,
            stations: Vec::new(),
        }
    }

    /// Board for a station id, if the page had one.
    pub fn find(&self, station_id: u32) -> Option<&StationDepartures> {
        self.stations
            .iter()
            .find(|s| s.location.id() == station_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionsStatus {
    Ok,
    NoConnections,
    /// Origin and destination are within walking distance
    TooClose,
    InvalidStation,
    ServiceDown,
}

/// Connections for a search, plus the context to page through more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConnectionsResult {
    pub status: ConnectionsStatus,
    pub from: Location,
    pub via: Option<Location>,
    pub to: Location,
    /// Present when the backend allows paging
    pub context: Option<ConnectionsContext>,
    pub connections: Vec<Connection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_station_id() {
        let result = QueryDeparturesResult {
            status: DeparturesStatus::Ok,
            stations: vec![
                StationDepartures::new(Location::station(8000105)),
                StationDepartures::new(Location::station(8098105)),
            ],
        };
        assert!(result.find(8098105).is_some());
        assert!(result.find(1).is_none());
    }

    #[test]
    fn degraded_results_are_empty() {
        let result = NearbyStationsResult::service_down();
        assert_eq!(result.status, NearbyStatus::ServiceDown);
        assert!(result.stations.is_empty());

        let result = QueryDeparturesResult::with_status(DeparturesStatus::InvalidStation);
        assert!(result.stations.is_empty());
    }
}
