//! Provider error type.

use crate::domain::ConfigurationError;
use crate::parse::ParseError;
use crate::transport::NetworkError;

/// Errors returned by every provider operation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Request the provider cannot express
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Transport failure, passed through unchanged
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Payload had no usable shape
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_each_category() {
        let err: ProviderError = ConfigurationError::UnknownProductLetter('X').into();
        assert_eq!(
            err.to_string(),
            "configuration error: unknown product letter: 'X'"
        );

        let err: ProviderError = NetworkError::Status {
            status: 500,
            url: "http://x/".into(),
        }
        .into();
        assert!(matches!(err, ProviderError::Network(_)));

        let err: ProviderError = ParseError::MissingField("stops").into();
        assert_eq!(err.to_string(), "parse error: missing field: stops");
    }
}
