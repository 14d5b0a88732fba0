//! Request URL construction.
//!
//! Every builder here is a pure function of its inputs and a provider
//! configuration. Parameter order matters to some backends, so query
//! strings are assembled in a fixed order and never re-sorted.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::config::{ParamCondition, ProviderConfig};
use crate::domain::{ALL_PRODUCTS, ConfigurationError, Location, LocationType};
use crate::text::{Encoding, url_encode};

/// Default `look_maxno` when the caller asks for every station.
const DEFAULT_NEARBY_MAX_STATIONS: usize = 200;

/// Default `look_maxdist` in metres.
const DEFAULT_NEARBY_MAX_DISTANCE_M: u32 = 5000;

/// Default `distance` in kilometres for the station-based lookup.
const DEFAULT_NEARBY_DISTANCE_KM: u32 = 50;

/// Fixed board size. The caller's maximum is applied after parsing.
const DEPARTURES_MAX_JOURNEYS: u32 = 50;

/// Walking pace for transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Step-free routing preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    #[default]
    Neutral,
    Limited,
    BarrierFree,
}

/// Extra trip options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TripOption {
    /// Bicycle travels along
    Bike,
}

/// A connection search request.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_scraper::domain::{Location, LocationType};
/// use transit_scraper::provider::{ConnectionsQuery, WalkSpeed};
///
/// let from = Location::new(LocationType::Station, 3000001, 0, 0, "")?;
/// let to = Location::any("Frankfurt (Main) Südbahnhof")?;
/// let when = NaiveDate::from_ymd_opt(2012, 5, 1).unwrap().and_hms_opt(8, 15, 0).unwrap();
/// let query = ConnectionsQuery::new(from, to, when)
///     .with_products("RS")
///     .with_walk_speed(WalkSpeed::Fast);
/// assert!(query.departure);
/// # Ok::<(), transit_scraper::domain::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsQuery {
    pub from: Location,
    pub via: Option<Location>,
    pub to: Location,
    pub when: NaiveDateTime,
    /// `true` searches by departure time, `false` by arrival time
    pub departure: bool,
    /// Product filter letters, e.g. `"IRS"`
    pub products: String,
    pub walk_speed: WalkSpeed,
    pub accessibility: Accessibility,
    pub options: BTreeSet<TripOption>,
}

impl ConnectionsQuery {
    /// Departing at `when`, all products, default options.
    pub fn new(from: Location, to: Location, when: NaiveDateTime) -> Self {
        Self {
            from,
            via: None,
            to,
            when,
            departure: true,
            products: ALL_PRODUCTS.to_string(),
            walk_speed: WalkSpeed::default(),
            accessibility: Accessibility::default(),
            options: BTreeSet::new(),
        }
    }

    pub fn via(mut self, via: Location) -> Self {
        self.via = Some(via);
        self
    }

    /// Treat `when` as the latest arrival time.
    pub fn arriving(mut self) -> Self {
        self.departure = false;
        self
    }

    pub fn with_products(mut self, products: impl Into<String>) -> Self {
        self.products = products.into();
        self
    }

    pub fn with_walk_speed(mut self, walk_speed: WalkSpeed) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_option(mut self, option: TripOption) -> Self {
        self.options.insert(option);
        self
    }
}

/// An ordered, append-only query string.
///
/// Values are stored already encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter unconditionally.
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a parameter unless the key is already present.
    ///
    /// Returns whether it was added.
    pub fn append(&mut self, key: &str, value: impl ToString) -> bool {
        if self.contains(key) {
            return false;
        }
        self.push(key, value);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

fn url(config: &ProviderConfig, path: &str, query: &QueryString) -> String {
    format!("{}{}?{}", config.api_base, path, query)
}

/// HAFAS location identifier, unencoded.
///
/// Stations with an id are addressed by id, then anything with a coordinate
/// by coordinate, then addresses and free text by name.
pub fn hafas_id(location: &Location) -> Result<String, ConfigurationError> {
    let location_type = location.location_type();

    if location_type == LocationType::Station && location.has_id() {
        return Ok(format!("A=1@L={}", location.id()));
    }
    if location.has_coordinate() {
        return Ok(format!("A=16@X={}@Y={}", location.lon(), location.lat()));
    }
    if !location.name().is_empty() {
        return Ok(if location_type == LocationType::Address {
            format!("A=2@O={}", location.name())
        } else {
            format!("A=255@G={}", location.name())
        });
    }

    Err(ConfigurationError::UnsupportedLocation(
        location.debug_string(),
    ))
}

fn encoded_hafas_id(location: &Location, encoding: Encoding) -> Result<String, ConfigurationError> {
    Ok(url_encode(&hafas_id(location)?, encoding))
}

/// Which nearby-stations lookup a location calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NearbyRequest {
    /// JSON lookup around a coordinate
    ByCoordinate(String),
    /// HTML page of stations near a station
    ByStation(String),
}

/// Build the nearby-stations request for a location.
///
/// A coordinate wins over a station id. `0` for either limit means the
/// backend default.
pub fn nearby_stations_url(
    config: &'static ProviderConfig,
    location: &Location,
    max_distance: u32,
    max_stations: usize,
) -> Result<NearbyRequest, ConfigurationError> {
    if location.has_coordinate() {
        let mut query = QueryString::new();
        query
            .push("performLocating", 2)
            .push("tpl", "stop2json")
            .push(
                "look_maxno",
                if max_stations != 0 {
                    max_stations
                } else {
                    DEFAULT_NEARBY_MAX_STATIONS
                },
            )
            .push(
                "look_maxdist",
                if max_distance != 0 {
                    max_distance
                } else {
                    DEFAULT_NEARBY_MAX_DISTANCE_M
                },
            )
            .push("look_stopclass", config.products.all().to_int())
            .push("look_nv", "get_stopweight|yes")
            .push("look_x", location.lon())
            .push("look_y", location.lat());
        let path = config.endpoints.nearby_by_coordinate;
        return Ok(NearbyRequest::ByCoordinate(url(config, path, &query)));
    }

    if location.location_type() == LocationType::Station && location.has_id() {
        let mut query = QueryString::new();
        query
            .push("near", "Anzeigen")
            .push(
                "distance",
                if max_distance != 0 {
                    max_distance / 1000
                } else {
                    DEFAULT_NEARBY_DISTANCE_KM
                },
            )
            .push("input", location.id());
        let path = config.endpoints.nearby_by_station;
        return Ok(NearbyRequest::ByStation(url(config, path, &query)));
    }

    Err(ConfigurationError::UnsupportedLocation(
        location.debug_string(),
    ))
}

/// Build the departure board request for a station.
pub fn departures_url(
    config: &'static ProviderConfig,
    station_id: u32,
    include_equivalents: bool,
) -> String {
    let mut query = QueryString::new();
    query
        .push("productsFilter", config.products.all())
        .push("boardType", "dep");
    if !include_equivalents {
        query.push("disableEquivs", "yes");
    }
    query
        .push("maxJourneys", DEPARTURES_MAX_JOURNEYS)
        .push("start", "yes")
        .push("L", "vs_java3")
        .push("input", station_id);
    url(config, config.endpoints.departures, &query)
}

/// Build the autocomplete request for free text.
pub fn autocomplete_url(config: &ProviderConfig, text: &str) -> String {
    format!(
        "{}{}?getstop=1&REQ0JourneyStopsS0A=255&S={}?&js=true&",
        config.api_base,
        config.endpoints.autocomplete,
        url_encode(text, config.encoding)
    )
}

/// Baseline connection parameters followed by the provider's own.
pub fn connections_query(
    config: &'static ProviderConfig,
    request: &ConnectionsQuery,
) -> Result<QueryString, ConfigurationError> {
    let products = config.products.from_filter(&request.products)?;
    let encoding = config.encoding;

    let mut query = QueryString::new();
    query
        .push("start", "Suchen")
        .push("REQ0JourneyStopsS0ID", encoded_hafas_id(&request.from, encoding)?);
    if let Some(via) = &request.via {
        query.push("REQ0JourneyStops1.0G", encoded_hafas_id(via, encoding)?);
    }
    query
        .push("REQ0JourneyStopsZ0ID", encoded_hafas_id(&request.to, encoding)?)
        .push("REQ0HafasSearchForw", if request.departure { 1 } else { 0 })
        .push("REQ0JourneyDate", request.when.format("%d.%m.%y"))
        .push("REQ0JourneyTime", request.when.format("%H:%M"))
        .push("REQ0JourneyProduct_prod_list_1", products);

    match request.accessibility {
        Accessibility::Neutral => {}
        Accessibility::Limited => {
            query.push("REQ0AddParamBaimprofile", 1);
        }
        Accessibility::BarrierFree => {
            query.push("REQ0AddParamBaimprofile", 0);
        }
    }

    match request.walk_speed {
        WalkSpeed::Normal => {}
        WalkSpeed::Slow => {
            query.push("REQ0JourneyDep_Foot_speed", 125);
        }
        WalkSpeed::Fast => {
            query.push("REQ0JourneyDep_Foot_speed", 80);
        }
    }

    query.push("L", "vs_java3");

    let bike = request.options.contains(&TripOption::Bike);
    for param in config.connection_params {
        if param.when == ParamCondition::Bike && !bike {
            continue;
        }
        query.append(param.key, param.value);
    }

    Ok(query)
}

/// Build a connection search request.
pub fn connections_url(
    config: &'static ProviderConfig,
    request: &ConnectionsQuery,
) -> Result<String, ConfigurationError> {
    let query = connections_query(config, request)?;
    Ok(url(config, config.endpoints.connections, &query))
}

/// Build a request for earlier or later connections of a previous search.
pub fn more_connections_url(
    config: &'static ProviderConfig,
    request: &ConnectionsQuery,
    ident: &str,
    seqnr: &str,
    later: bool,
) -> Result<String, ConfigurationError> {
    let mut query = connections_query(config, request)?;
    query
        .push("ident", url_encode(ident, config.encoding))
        .push("seqnr", url_encode(seqnr, config.encoding))
        .push("REQ0HafasScrollDir", if later { 1 } else { 2 });
    Ok(url(config, config.endpoints.connections, &query))
}
