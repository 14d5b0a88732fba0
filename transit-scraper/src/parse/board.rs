//! Departure board XML.
//!
//! A board is a flat sequence of `<St>` station headers, each followed by
//! the `<Journey>` records departing there, optionally ending in an
//! `<Err>`. Boards with equivalent stations enabled carry several headers.

use chrono::{Duration, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use super::{Attributes, ParseError, lenient_reader, split_product};
use crate::domain::{Departure, Location, StationDepartures};
use crate::provider::lines::parse_line_and_type;
use crate::provider::{DeparturesStatus, ProviderConfig, QueryDeparturesResult};
use crate::text::{join_date_time, parse_date, parse_time};

/// Unknown station.
const ERR_INVALID_STATION: &str = "H730";
/// No departures in the requested window.
const ERR_NO_DEPARTURES: &str = "H890";

/// Parse a departure board.
///
/// Journeys before the first station header belong to `requested_id`.
/// A journey with malformed markup, a missing required attribute, or an
/// unparsable time or line is skipped.
pub fn departure_board(
    config: &ProviderConfig,
    body: &str,
    requested_id: u32,
) -> Result<QueryDeparturesResult, ParseError> {
    if body.trim().is_empty() {
        return Ok(QueryDeparturesResult::with_status(DeparturesStatus::ServiceDown));
    }

    let mut reader = lenient_reader(body);
    let mut stations: Vec<StationDepartures> = Vec::new();
    let mut recognised = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"St" => {
                    recognised = true;
                    let attrs = Attributes::of(&e)?;
                    let id = attrs
                        .parse::<u32>("evaId")
                        .ok()
                        .flatten()
                        .filter(|&id| id != 0)
                        .unwrap_or(requested_id);
                    let name = attrs.get("name").unwrap_or_default();
                    stations.push(StationDepartures::new(Location::station_named(id, name)));
                }
                b"Journey" => {
                    recognised = true;
                    if stations.is_empty() {
                        stations.push(StationDepartures::new(Location::station(requested_id)));
                    }
                    match departure(config, &e) {
                        Ok(dep) => {
                            if let Some(board) = stations.last_mut() {
                                board.departures.push(dep);
                            }
                        }
                        Err(ParseError::Entity(err)) => return Err(err.into()),
                        Err(err) => warn!(error = %err, "skipping malformed departure"),
                    }
                }
                b"Err" => {
                    let attrs = Attributes::of(&e)?;
                    let code = attrs.get("code").unwrap_or_default();
                    match code {
                        ERR_INVALID_STATION => {
                            return Ok(QueryDeparturesResult::with_status(
                                DeparturesStatus::InvalidStation,
                            ));
                        }
                        ERR_NO_DEPARTURES => {
                            debug!(station = requested_id, "board has no departures");
                            return Ok(QueryDeparturesResult {
                                status: DeparturesStatus::Ok,
                                stations: vec![StationDepartures::new(Location::station(
                                    requested_id,
                                ))],
                            });
                        }
                        _ => {
                            let text = attrs.get("text").unwrap_or_default();
                            return Err(ParseError::UnexpectedPage(format!(
                                "board error {code}: {text}"
                            )));
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !recognised {
        return Err(ParseError::UnexpectedPage("no departure board".into()));
    }

    Ok(QueryDeparturesResult {
        status: DeparturesStatus::Ok,
        stations,
    })
}

fn departure(config: &ProviderConfig, element: &BytesStart<'_>) -> Result<Departure, ParseError> {
    let attrs = Attributes::of(element)?;
    let date = parse_date(attrs.require("fpDate")?)?;
    let time = parse_time(attrs.require("fpTime")?)?;
    let planned_time =
        join_date_time(&date, &time).ok_or_else(|| ParseError::invalid("fpTime", time.to_string()))?;

    let (name, type_code) = split_product(attrs.require("prod")?);
    let line = parse_line_and_type(config, name, type_code)?;
    let destination = attrs.require("targetLoc")?.to_string();

    let (predicted_time, cancelled) = prediction(planned_time, &attrs);
    let platform = attrs
        .get("newpl")
        .or_else(|| attrs.get("platform"))
        .map(str::to_string);

    Ok(Departure {
        planned_time,
        predicted_time,
        line,
        destination,
        destination_id: attrs.parse("dirnr").ok().flatten(),
        platform,
        message: attrs.get("delayReason").map(str::to_string),
        cancelled,
    })
}

/// Realtime estimate from `e_delay` (minutes) or `delay` (`"+ 2"`,
/// `"0"`, `"cancel"`, `"-"`).
fn prediction(planned: NaiveDateTime, attrs: &Attributes) -> (Option<NaiveDateTime>, bool) {
    if let Some(minutes) = attrs.parse::<i64>("e_delay").ok().flatten() {
        return (Some(planned + Duration::minutes(minutes)), false);
    }

    match attrs.get("delay") {
        Some("cancel") => (None, true),
        Some(delay) if delay.starts_with('+') => {
            let minutes = delay[1..].trim().parse::<i64>().ok();
            (minutes.map(|m| planned + Duration::minutes(m)), false)
        }
        Some("0") => (Some(planned), false),
        _ => (None, false),
    }
}
