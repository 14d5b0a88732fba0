//! Scraped-HTML extraction.
//!
//! The nearby-stations page has no structure worth parsing. A fixed,
//! provider-supplied pattern finds anchors carrying a station id (group 1)
//! and a visible name (group 2).

use std::collections::HashSet;

use regex::Regex;
use tracing::{trace, warn};

use super::ParseError;
use crate::domain::Location;
use crate::text::resolve_entities;

/// Extract stations from a nearby-stations page, in page order.
///
/// Matches with a malformed id and repeats of an id already seen are
/// skipped. An unresolvable entity in a name fails the whole page.
pub fn stations_from_links(pattern: &Regex, page: &str) -> Result<Vec<Location>, ParseError> {
    let mut seen = HashSet::new();
    let mut stations = Vec::new();

    for caps in pattern.captures_iter(page) {
        let raw_id = caps.get(1).map_or("", |m| m.as_str());
        let id = match raw_id.parse::<u32>() {
            Ok(id) if id != 0 => id,
            _ => {
                warn!(id = raw_id, "skipping station link with malformed id");
                continue;
            }
        };

        if !seen.insert(id) {
            trace!(id, "skipping duplicate station link");
            continue;
        }

        let raw_name = caps.get(2).map_or("", |m| m.as_str());
        let name = resolve_entities(raw_name.trim())?;
        stations.push(Location::station_named(id, name));
    }

    Ok(stations)
}
