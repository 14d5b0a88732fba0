//! Canonical transit domain types.
//!
//! Every provider's raw responses are normalized into these types. Types
//! that carry invariants check them at construction time, so code that
//! receives them can trust their validity.

mod connection;
mod departure;
mod error;
mod line;
mod location;
mod product;

pub use connection::{Connection, Footway, Leg, PublicLeg};
pub use departure::{Departure, StationDepartures};
pub use error::ConfigurationError;
pub use line::{Line, LineColor};
pub use location::{Location, LocationType};
pub use product::{ALL_PRODUCTS, Product};
