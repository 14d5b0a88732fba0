//! Configuration error type.
//!
//! A `ConfigurationError` means the caller asked for something the provider
//! cannot express. It is a programmer error: reported immediately, never
//! worth retrying. It is distinct from network and parse failures.

use super::Product;

/// Errors for requests a provider cannot handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Location has neither an id, a coordinate, nor a name
    #[error("location is not resolvable: needs an id, a coordinate or a name")]
    UnresolvableLocation,

    /// Location cannot be used for this kind of query
    #[error("cannot handle location: {0}")]
    UnsupportedLocation(String),

    /// Product letter outside the canonical alphabet
    #[error("unknown product letter: '{0}'")]
    UnknownProductLetter(char),

    /// Product the provider has no filter bits for
    #[error("provider cannot filter by product: {0}")]
    UnsupportedProduct(Product),

    /// Provider lacks the requested capability
    #[error("provider does not support {0}")]
    UnsupportedCapability(&'static str),

    /// Continuation context was issued by another provider
    #[error("context belongs to network {context}, not {provider}")]
    ForeignContext {
        context: &'static str,
        provider: &'static str,
    },

    /// Continuation token could not be decoded
    #[error("invalid continuation token: {0}")]
    InvalidToken(String),
}
