//! Response parsers.
//!
//! One strategy per payload shape:
//!
//! - [`html`]: regex extraction from scraped pages
//! - [`json`]: loosely typed JSON walking
//! - [`board`] and [`connections`]: lenient XML walking
//!
//! All of them skip a malformed record and keep going. A payload with no
//! recognisable shape, or an unresolvable entity, fails the whole result.

pub mod board;
pub mod connections;
mod error;
pub mod html;
pub mod json;

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::BytesStart;

pub use error::ParseError;

use crate::text::resolve_entities;

/// A reader that tolerates the backends' sloppy markup.
pub(crate) fn lenient_reader(body: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;
    reader
}

/// Entity-resolved attributes of one element.
#[derive(Debug, Default)]
pub(crate) struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn of(element: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut map = HashMap::new();
        for attr in element.attributes().with_checks(false) {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            map.insert(key, resolve_entities(&raw)?);
        }
        Ok(Self(map))
    }

    /// Trimmed value, `None` if absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &'static str) -> Result<&str, ParseError> {
        self.get(name).ok_or(ParseError::MissingField(name))
    }

    /// Parse a value, `Ok(None)` if absent.
    pub fn parse<T: std::str::FromStr>(&self, name: &'static str) -> Result<Option<T>, ParseError> {
        self.get(name)
            .map(|v| v.parse().map_err(|_| ParseError::invalid(name, v)))
            .transpose()
    }
}

/// Split a `name#type` product field.
pub(crate) fn split_product(prod: &str) -> (&str, &str) {
    prod.split_once('#').unwrap_or((prod, ""))
}
