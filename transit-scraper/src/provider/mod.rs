//! Timetable providers.
//!
//! A provider is a [`ProviderConfig`] (plain `'static` data describing one
//! backend) driven by the generic [`Provider`] engine over a
//! [`Transport`](crate::transport::Transport).

mod bahn;
mod bitmask;
mod client;
mod config;
mod context;
mod error;
pub mod lines;
mod query;
mod result;
mod rmv;

pub use bahn::BAHN;
pub use bitmask::{ProductBits, ProductTable};
pub use client::Provider;
pub use config::{
    Capability, Endpoints, ExtraParam, LineRule, NetworkId, ParamCondition, ProviderConfig,
    TypeRule,
};
pub use context::ConnectionsContext;
pub(crate) use context::Cursor;
pub use error::ProviderError;
pub use query::{
    Accessibility, ConnectionsQuery, NearbyRequest, QueryString, TripOption, WalkSpeed,
    autocomplete_url, connections_query, connections_url, departures_url, hafas_id,
    more_connections_url, nearby_stations_url,
};
pub use result::{
    ConnectionsStatus, DeparturesStatus, NearbyStationsResult, NearbyStatus,
    QueryConnectionsResult, QueryDeparturesResult,
};
pub use rmv::RMV;
