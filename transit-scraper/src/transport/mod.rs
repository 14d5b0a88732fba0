//! Fetching raw pages from transit backends.
//!
//! The parsing core never talks HTTP directly. It asks a [`Transport`] for
//! the text behind a URL, decoded with the provider's declared encoding.

mod error;
mod http;
mod mock;

use std::future::Future;

pub use error::NetworkError;
pub use http::{HttpTransport, HttpTransportConfig};
pub use mock::MockTransport;

use crate::text::Encoding;

/// Trait for fetching backend pages.
///
/// This abstraction allows providers to be tested with canned payloads.
pub trait Transport {
    /// Fetch `url` and decode the body with `encoding`.
    fn fetch_text(
        &self,
        url: &str,
        encoding: Encoding,
    ) -> impl Future<Output = Result<String, NetworkError>> + Send;
}
