//! Text normalization utilities.
//!
//! The backends this crate talks to return loosely formatted text: HTML
//! entities inside station names, two-digit years, times without seconds.
//! Everything here is a pure function; nothing holds state.

mod datetime;
mod encode;
mod entities;

pub use datetime::{DateTimeError, join_date_time, parse_date, parse_time};
pub use encode::{Encoding, url_encode};
pub use entities::{EntityError, resolve_entities};
