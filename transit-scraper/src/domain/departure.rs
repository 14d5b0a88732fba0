//! Departure board types.

use chrono::NaiveDateTime;

use super::{Line, Location};

/// One departure on a station board.
///
/// `planned_time` is the timetable time; `predicted_time` is the realtime
/// estimate when the backend supplies one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Scheduled departure
    pub planned_time: NaiveDateTime,
    /// Realtime estimate, if known
    pub predicted_time: Option<NaiveDateTime>,
    /// Line serving this departure
    pub line: Line,
    /// Destination display name
    pub destination: String,
    /// Destination station id, if the backend names one
    pub destination_id: Option<u32>,
    /// Departure platform (changed platform wins over planned)
    pub platform: Option<String>,
    /// Free-text remark, e.g. a delay reason
    pub message: Option<String>,
    /// Whether the departure is cancelled
    pub cancelled: bool,
}

impl Departure {
    /// Returns the best available departure time (predicted if known, else planned).
    pub fn expected_time(&self) -> NaiveDateTime {
        self.predicted_time.unwrap_or(self.planned_time)
    }

    /// Returns the delay in minutes, if a prediction is available.
    pub fn delay_minutes(&self) -> Option<i64> {
        self.predicted_time
            .map(|p| p.signed_duration_since(self.planned_time).num_minutes())
    }
}

/// Departures from one station, in board order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDepartures {
    pub location: Location,
    pub departures: Vec<Departure>,
}

impl StationDepartures {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            departures: Vec::new(),
        }
    }
}
