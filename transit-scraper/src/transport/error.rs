//! Transport error types.

use std::fmt;

/// Errors from fetching a backend page.
#[derive(Debug)]
pub enum NetworkError {
    /// HTTP request failed (connection error, timeout, etc.)
    Http(reqwest::Error),

    /// Backend answered with a non-success status
    Status { status: u16, url: String },

    /// Body was not valid in the declared encoding
    Decode { url: String, message: String },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Http(e) => write!(f, "HTTP error: {e}"),
            NetworkError::Status { status, url } => {
                write!(f, "backend returned status {status} for {url}")
            }
            NetworkError::Decode { url, message } => {
                write!(f, "could not decode body of {url}: {message}")
            }
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NetworkError::Status {
            status: 503,
            url: "http://mobile.bahn.de/bin/mobil/query.exe/dn".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned status 503 for http://mobile.bahn.de/bin/mobil/query.exe/dn"
        );

        let err = NetworkError::Decode {
            url: "http://x/".into(),
            message: "invalid utf-8 sequence".into(),
        };
        assert!(err.to_string().contains("could not decode"));
        assert!(err.to_string().contains("invalid utf-8"));
    }
}
