//! Public transport timetable scraper.
//!
//! Talks to HAFAS-style backends that only offer scraped pages and loosely
//! specified XML and JSON: stations near a place, departure boards,
//! connection searches with paging, and station autocomplete.
//!
//! ```no_run
//! use transit_scraper::domain::Location;
//! use transit_scraper::provider::Provider;
//! use transit_scraper::transport::{HttpTransport, HttpTransportConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(HttpTransportConfig::new())?;
//! let bahn = Provider::bahn(transport);
//! let boards = bahn.query_departures(8000105, 10, false).await?;
//! for departure in boards.stations.iter().flat_map(|s| &s.departures) {
//!     println!("{} {}", departure.line.label, departure.destination);
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod parse;
pub mod provider;
pub mod text;
pub mod transport;
