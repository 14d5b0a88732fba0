//! Per-provider configuration.
//!
//! A provider is data: URLs, a product table, line rules and a handful of
//! fixed query parameters. The shared engine in [`super::Provider`] reads
//! everything network-specific from a `&'static ProviderConfig`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::bitmask::ProductTable;
use crate::domain::{LineColor, Product};
use crate::text::Encoding;

/// Identifies a transit network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// Deutsche Bahn
    Db,
    /// Rhein-Main-Verkehrsverbund
    Rmv,
}

impl NetworkId {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkId::Db => "DB",
            NetworkId::Rmv => "RMV",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations a provider may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    NearbyStations,
    Departures,
    Autocomplete,
    Connections,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::NearbyStations => "nearby stations",
            Capability::Departures => "departures",
            Capability::Autocomplete => "autocomplete",
            Capability::Connections => "connections",
        }
    }
}

/// Classifies a raw line type code. Codes are compared upper-cased.
#[derive(Debug)]
pub enum TypeRule {
    Exact(&'static str, Product),
    Prefix(&'static str, Product),
}

impl TypeRule {
    /// Returns the product if `upper` matches this rule.
    pub fn classify(&self, upper: &str) -> Option<Product> {
        match self {
            TypeRule::Exact(code, product) => (upper == *code).then_some(*product),
            TypeRule::Prefix(prefix, product) => upper.starts_with(prefix).then_some(*product),
        }
    }
}

/// Classifies a whole raw line label that carries no separate type.
#[derive(Debug)]
pub enum LineRule {
    /// Label equals the literal exactly.
    Exact(&'static str, Product),
    /// Label matches the pattern. Patterns are anchored at both ends.
    Pattern(&'static LazyLock<Regex>, Product),
}

impl LineRule {
    /// Returns the product if `label` matches this rule.
    pub fn classify(&self, label: &str) -> Option<Product> {
        match self {
            LineRule::Exact(literal, product) => (label == *literal).then_some(*product),
            LineRule::Pattern(pattern, product) => pattern.is_match(label).then_some(*product),
        }
    }
}

/// When a provider-specific connection parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCondition {
    Always,
    /// Only when bicycle transport is requested.
    Bike,
}

/// A fixed parameter appended to connection queries.
#[derive(Debug)]
pub struct ExtraParam {
    pub key: &'static str,
    pub value: &'static str,
    pub when: ParamCondition,
}

impl ExtraParam {
    pub const fn always(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            value,
            when: ParamCondition::Always,
        }
    }

    pub const fn with_bike(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            value,
            when: ParamCondition::Bike,
        }
    }
}

/// Endpoint paths, relative to the API base.
#[derive(Debug)]
pub struct Endpoints {
    /// JSON stop lookup around a coordinate
    pub nearby_by_coordinate: &'static str,
    /// HTML page listing stations near a station
    pub nearby_by_station: &'static str,
    /// XML departure board
    pub departures: &'static str,
    /// JavaScript station suggestions
    pub autocomplete: &'static str,
    /// XML connection search
    pub connections: &'static str,
}

/// Everything that distinguishes one network's backend from another.
#[derive(Debug)]
pub struct ProviderConfig {
    pub network: NetworkId,
    /// Prefix of every request URL, ending in `/`
    pub api_base: &'static str,
    pub endpoints: Endpoints,
    /// Extracts `(id, name)` from the nearby-stations HTML page
    pub nearby_station_link: &'static LazyLock<Regex>,
    /// Encoding of query strings and response bodies
    pub encoding: Encoding,
    pub products: ProductTable,
    /// Type rules checked before the shared defaults
    pub type_overrides: &'static [TypeRule],
    /// Type rules checked after the shared defaults
    pub type_fallbacks: &'static [TypeRule],
    /// Line rules checked before the shared default parse
    pub line_rules: &'static [LineRule],
    /// Colours keyed by product letter plus label, e.g. `SS8`
    pub line_colors: &'static [(&'static str, LineColor)],
    pub capabilities: &'static [Capability],
    /// Appended to every connection query
    pub connection_params: &'static [ExtraParam],
}

impl ProviderConfig {
    /// Whether every listed capability is supported.
    pub fn has_capabilities(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.capabilities.contains(c))
    }

    /// Colours for a line, if the provider defines any.
    pub fn line_color(&self, product: Product, label: &str) -> Option<LineColor> {
        self.line_colors
            .iter()
            .find(|(key, _)| {
                let mut chars = key.chars();
                chars.next() == Some(product.code()) && chars.as_str() == label
            })
            .map(|(_, color)| *color)
    }
}
