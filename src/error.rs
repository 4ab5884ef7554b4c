//! Unified error types for the scanner.

use thiserror::Error;

/// Unified error type for the scanner.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Market-data error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Scan request error seen by the client surface.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Invalid scan parameters.
    #[error("parameter error: {0}")]
    Params(#[from] ParamsError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upstream market-data errors.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The market listing request was rejected.
    #[error("failed to fetch markets at offset {offset}: {reason}")]
    FetchFailed {
        /// Page offset that failed.
        offset: usize,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to parse market data.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Failures of a single scan request, as seen by the scan client.
///
/// All variants are shown to the user as the same "scan failed" status; the
/// distinction only matters for logs.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a JSON array of opportunities.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Scan parameters that could not be parsed on the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// A numeric parameter did not parse.
    #[error("invalid value {value:?} for {name}")]
    InvalidNumber {
        /// Parameter name.
        name: &'static str,
        /// Raw value received.
        value: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ScannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_convert_and_display() {
        let err: ScannerError = ScanError::Status { status: 502 }.into();

        assert_eq!(err.to_string(), "scan error: service responded with HTTP 502");
    }

    #[test]
    fn params_error_names_the_field() {
        let err = ParamsError::InvalidNumber {
            name: "stake",
            value: "ten".to_string(),
        };

        assert_eq!(err.to_string(), "invalid value \"ten\" for stake");
    }

    #[test]
    fn market_error_reports_offset() {
        let err = MarketError::FetchFailed {
            offset: 400,
            reason: "HTTP 500".to_string(),
        };

        assert_eq!(
            ScannerError::from(err).to_string(),
            "market error: failed to fetch markets at offset 400: HTTP 500"
        );
    }
}
