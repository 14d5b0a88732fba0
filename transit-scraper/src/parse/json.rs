//! Loosely typed JSON walking.
//!
//! The stop lookup and the suggestion script are JSON in name only: numbers
//! arrive as strings or numbers depending on the field and the day. Fields
//! are read by name with explicit defaults, and only fields the record
//! cannot do without are required.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use super::ParseError;
use crate::domain::{Location, LocationType};
use crate::text::resolve_entities;

/// `SLs.sls=<json>;SLs.showSuggestion();`
static SUGGESTIONS_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*SLs\.sls\s*=\s*(.*?)\s*;\s*SLs\.showSuggestion\(\);\s*$")
        .expect("suggestions regex is valid")
});

/// Error code the stop lookup uses for a backend outage.
const ERROR_SERVICE_DOWN: i64 = 2;

type Object = Map<String, Value>;

/// Read an integer that may be encoded as a JSON number or a string.
fn int_field(obj: &Object, field: &'static str) -> Result<Option<i64>, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ParseError::invalid(field, n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ParseError::invalid(field, s.as_str())),
        Some(other) => Err(ParseError::invalid(field, other.to_string())),
    }
}

fn str_field<'a>(obj: &'a Object, field: &'static str) -> Result<&'a str, ParseError> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField(field))
}

fn coordinate(obj: &Object, field: &'static str) -> Result<i32, ParseError> {
    let value = int_field(obj, field)?.unwrap_or(0);
    i32::try_from(value).map_err(|_| ParseError::invalid(field, value.to_string()))
}

fn station_id(obj: &Object, field: &'static str) -> Result<u32, ParseError> {
    let value = int_field(obj, field)?.unwrap_or(0);
    u32::try_from(value).map_err(|_| ParseError::invalid(field, value.to_string()))
}

/// Stops parsed from the coordinate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NearbyStops {
    Stations(Vec<Location>),
    ServiceDown,
}

/// Parse the `stop2json` coordinate lookup.
///
/// Stops with a zero `stopweight` are not served and are dropped. A stop
/// that lacks an id or name is skipped.
pub fn nearby_stops(body: &str) -> Result<NearbyStops, ParseError> {
    let root: Value = serde_json::from_str(body)?;
    let root = root
        .as_object()
        .ok_or_else(|| ParseError::UnexpectedPage("stop lookup is not an object".into()))?;

    match int_field(root, "error")?.unwrap_or(0) {
        0 => {}
        ERROR_SERVICE_DOWN => return Ok(NearbyStops::ServiceDown),
        code => {
            return Err(ParseError::UnexpectedPage(format!(
                "stop lookup error code {code}"
            )));
        }
    }

    let stops = root
        .get("stops")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingField("stops"))?;

    let mut stations = Vec::with_capacity(stops.len());
    for stop in stops {
        let Some(stop) = stop.as_object() else {
            warn!("skipping stop that is not an object");
            continue;
        };
        match nearby_stop(stop) {
            Ok(Some(location)) => stations.push(location),
            Ok(None) => {}
            Err(ParseError::Entity(e)) => return Err(e.into()),
            Err(e) => warn!(error = %e, "skipping malformed stop"),
        }
    }

    Ok(NearbyStops::Stations(stations))
}

fn nearby_stop(stop: &Object) -> Result<Option<Location>, ParseError> {
    if int_field(stop, "stopweight")? == Some(0) {
        return Ok(None);
    }

    let id = station_id(stop, "extId")?;
    if id == 0 {
        return Err(ParseError::MissingField("extId"));
    }
    let name = resolve_entities(str_field(stop, "name")?.trim())?;
    let lat = coordinate(stop, "y")?;
    let lon = coordinate(stop, "x")?;

    Ok(Some(Location::new(LocationType::Station, id, lat, lon, name).map_err(
        |_| ParseError::MissingField("extId"),
    )?))
}

fn suggestion_type(code: i64) -> LocationType {
    match code {
        1 => LocationType::Station,
        2 => LocationType::Address,
        4 => LocationType::Poi,
        _ => LocationType::Any,
    }
}

/// Parse the autocomplete suggestion script.
pub fn suggestions(body: &str) -> Result<Vec<Location>, ParseError> {
    let caps = SUGGESTIONS_SCRIPT
        .captures(body)
        .ok_or_else(|| ParseError::UnexpectedPage("not a suggestion script".into()))?;
    let root: Value = serde_json::from_str(&caps[1])?;

    let items = root
        .get("suggestions")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingField("suggestions"))?;

    let mut locations = Vec::with_capacity(items.len());
    for item in items {
        let Some(item) = item.as_object() else {
            warn!("skipping suggestion that is not an object");
            continue;
        };
        match suggestion(item) {
            Ok(location) => locations.push(location),
            Err(ParseError::Entity(e)) => return Err(e.into()),
            Err(e) => warn!(error = %e, "skipping malformed suggestion"),
        }
    }

    Ok(locations)
}

fn suggestion(item: &Object) -> Result<Location, ParseError> {
    let name = resolve_entities(str_field(item, "value")?.trim())?;
    let location_type = suggestion_type(int_field(item, "type")?.unwrap_or(0));
    let id = station_id(item, "extId")?;
    let lat = coordinate(item, "ycoord")?;
    let lon = coordinate(item, "xcoord")?;

    Location::new(location_type, id, lat, lon, name).map_err(|_| ParseError::MissingField("value"))
}
