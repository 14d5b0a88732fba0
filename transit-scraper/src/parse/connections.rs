//! Connection search XML.
//!
//! ```text
//! <ConRes ident=".." seqnr="..">
//!   <Connection id=".." date="dd.MM.yy">
//!     <ConSection>
//!       <Dep name evaId x y time platform/>
//!       <Journey prod dir/> | <Walk min/>
//!       <Arr name evaId x y time platform/>
//!     </ConSection>
//!   </Connection>
//! </ConRes>
//! ```
//!
//! Section times carry no date. They are joined with the connection date
//! and roll over to the next day whenever they would go backwards.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use super::{Attributes, ParseError, lenient_reader, split_product};
use crate::domain::{Connection, Footway, Leg, Location, LocationType, PublicLeg};
use crate::provider::lines::parse_line_and_type;
use crate::provider::{ConnectionsStatus, Cursor, ProviderConfig};
use crate::text::{join_date_time, parse_date, parse_time};

/// A parsed connection page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPage {
    pub status: ConnectionsStatus,
    pub(crate) cursor: Option<Cursor>,
    pub connections: Vec<Connection>,
}

impl ConnectionPage {
    fn with_status(status: ConnectionsStatus) -> Self {
        Self {
            status,
            cursor: None,
            connections: Vec::new(),
        }
    }
}

fn status_for_error(code: &str) -> Option<ConnectionsStatus> {
    match code {
        "K9380" => Some(ConnectionsStatus::TooClose),
        "K9220" | "K890" => Some(ConnectionsStatus::NoConnections),
        "H730" => Some(ConnectionsStatus::InvalidStation),
        _ => None,
    }
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    None,
    Ride(Attributes),
    Walk(Attributes),
}

#[derive(Debug, Default)]
struct Section {
    dep: Option<Attributes>,
    mode: Mode,
    arr: Option<Attributes>,
}

/// Connection being assembled from its sections.
struct Pending {
    id: String,
    date: Result<NaiveDate, ParseError>,
    last: Option<NaiveDateTime>,
    legs: Vec<Leg>,
    error: Option<ParseError>,
}

impl Pending {
    fn new(attrs: &Attributes) -> Self {
        let date = attrs
            .require("date")
            .and_then(|d| parse_date(d).map_err(ParseError::from));
        Self {
            id: attrs.get("id").unwrap_or_default().to_string(),
            date,
            last: None,
            legs: Vec::new(),
            error: None,
        }
    }

    /// Time of day joined with the connection date, rolled forward past
    /// the previous time seen.
    fn time(&mut self, attrs: &Attributes) -> Result<NaiveDateTime, ParseError> {
        let date = self.date.as_ref().map_err(|e| ParseError::invalid("date", e.to_string()))?;
        let time = parse_time(attrs.require("time")?)?;
        let mut at = join_date_time(date, &time)
            .ok_or_else(|| ParseError::invalid("time", time.to_string()))?;
        if let Some(last) = self.last {
            while at < last {
                at += Duration::days(1);
            }
        }
        self.last = Some(at);
        Ok(at)
    }

    fn add_section(&mut self, config: &ProviderConfig, section: Section) {
        if self.error.is_some() {
            return;
        }
        match self.leg(config, section) {
            Ok(leg) => self.legs.push(leg),
            Err(e) => self.error = Some(e),
        }
    }

    fn leg(&mut self, config: &ProviderConfig, section: Section) -> Result<Leg, ParseError> {
        let dep = section.dep.ok_or(ParseError::MissingField("Dep"))?;
        let arr = section.arr.ok_or(ParseError::MissingField("Arr"))?;
        let departure = stop(&dep)?;
        let departure_time = self.time(&dep)?;
        let arrival = stop(&arr)?;

        match section.mode {
            Mode::Ride(journey) => {
                let arrival_time = self.time(&arr)?;
                let (name, type_code) = split_product(journey.require("prod")?);
                Ok(Leg::Public(PublicLeg {
                    line: parse_line_and_type(config, name, type_code)?,
                    destination: journey.get("dir").map(str::to_string),
                    departure,
                    departure_time,
                    departure_platform: dep.get("platform").map(str::to_string),
                    arrival,
                    arrival_time,
                    arrival_platform: arr.get("platform").map(str::to_string),
                }))
            }
            Mode::Walk(walk) => {
                let min = walk
                    .parse::<u32>("min")?
                    .ok_or(ParseError::MissingField("min"))?;
                let footway = Footway {
                    min,
                    departure,
                    arrival,
                    departure_time,
                };
                self.last = Some(footway.arrival_time());
                Ok(Leg::Footway(footway))
            }
            Mode::None => Err(ParseError::MissingField("Journey")),
        }
    }

    fn finish(self) -> Result<Connection, ParseError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.legs.is_empty() {
            return Err(ParseError::MissingField("ConSection"));
        }
        Ok(Connection {
            id: self.id,
            legs: self.legs,
        })
    }
}

/// A `Dep` or `Arr` element as a location.
fn stop(attrs: &Attributes) -> Result<Location, ParseError> {
    let id = attrs.parse::<u32>("evaId")?.unwrap_or(0);
    let lat = attrs.parse::<i32>("y")?.unwrap_or(0);
    let lon = attrs.parse::<i32>("x")?.unwrap_or(0);
    let name = attrs.get("name").unwrap_or_default();
    let location_type = if id != 0 {
        LocationType::Station
    } else {
        LocationType::Address
    };
    Location::new(location_type, id, lat, lon, name).map_err(|_| ParseError::MissingField("evaId"))
}

/// Attributes of an element inside a connection.
///
/// Malformed markup marks the enclosing connection as failed and yields
/// `None`. Only an entity error fails the page.
fn section_attributes(
    element: &BytesStart<'_>,
    pending: &mut Option<Pending>,
) -> Result<Option<Attributes>, ParseError> {
    match Attributes::of(element) {
        Ok(attrs) => Ok(Some(attrs)),
        Err(ParseError::Entity(err)) => Err(err.into()),
        Err(err) => {
            if let Some(p) = pending.as_mut() {
                if p.error.is_none() {
                    p.error = Some(err);
                }
            }
            Ok(None)
        }
    }
}

/// Parse a connection search response.
///
/// A connection with a malformed section is skipped. Backend error codes
/// map to statuses; an unknown code fails the page.
pub fn connection_page(config: &ProviderConfig, body: &str) -> Result<ConnectionPage, ParseError> {
    if body.trim().is_empty() {
        return Ok(ConnectionPage::with_status(ConnectionsStatus::ServiceDown));
    }

    let mut reader = lenient_reader(body);
    let mut cursor = None;
    let mut recognised = false;
    let mut connections = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut section: Option<Section> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"ConRes" => {
                    recognised = true;
                    let attrs = Attributes::of(&e)?;
                    cursor = attrs.get("ident").map(|ident| Cursor {
                        ident: ident.to_string(),
                        seqnr: attrs.get("seqnr").unwrap_or("0").to_string(),
                    });
                }
                b"Err" => {
                    let attrs = Attributes::of(&e)?;
                    let code = attrs.get("code").unwrap_or_default();
                    return match status_for_error(code) {
                        Some(status) => Ok(ConnectionPage::with_status(status)),
                        None => Err(ParseError::UnexpectedPage(format!(
                            "connection error {code}: {}",
                            attrs.get("text").unwrap_or_default()
                        ))),
                    };
                }
                b"Connection" => {
                    pending = match Attributes::of(&e) {
                        Ok(attrs) => Some(Pending::new(&attrs)),
                        Err(ParseError::Entity(err)) => return Err(err.into()),
                        Err(err) => {
                            warn!(error = %err, "skipping malformed connection");
                            None
                        }
                    };
                }
                b"ConSection" => section = Some(Section::default()),
                b"Dep" => {
                    let attrs = section_attributes(&e, &mut pending)?;
                    if let (Some(s), Some(attrs)) = (section.as_mut(), attrs) {
                        s.dep = Some(attrs);
                    }
                }
                b"Arr" => {
                    let attrs = section_attributes(&e, &mut pending)?;
                    if let (Some(s), Some(attrs)) = (section.as_mut(), attrs) {
                        s.arr = Some(attrs);
                    }
                }
                b"Journey" => {
                    let attrs = section_attributes(&e, &mut pending)?;
                    if let (Some(s), Some(attrs)) = (section.as_mut(), attrs) {
                        s.mode = Mode::Ride(attrs);
                    }
                }
                b"Walk" => {
                    let attrs = section_attributes(&e, &mut pending)?;
                    if let (Some(s), Some(attrs)) = (section.as_mut(), attrs) {
                        s.mode = Mode::Walk(attrs);
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"ConSection" => {
                    if let (Some(p), Some(s)) = (pending.as_mut(), section.take()) {
                        p.add_section(config, s);
                    }
                }
                b"Connection" => {
                    if let Some(p) = pending.take() {
                        let id = p.id.clone();
                        match p.finish() {
                            Ok(connection) => connections.push(connection),
                            Err(err) => warn!(id = %id, error = %err, "skipping malformed connection"),
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
        return Err(ParseError::UnexpectedPage("no connection result".into()));
    }

    let status = if connections.is_empty() {
        ConnectionsStatus::NoConnections
    } else {
        ConnectionsStatus::Ok
    };

    Ok(ConnectionPage {
        status,
        cursor,
        connections,
    })
}
