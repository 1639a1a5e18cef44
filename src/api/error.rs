use thiserror::Error;

use crate::transport::TransportError;

/// Internal error raised while preparing or sending a request.
///
/// These never escape the client: `ApiClient` converts every variant into an
/// `Outcome` with status 0 and the variant's display string as the error.
/// The conversion table:
///
/// - `Transport` - no response obtained (DNS, connection refused, timeout)
/// - `InvalidHeader` - a token or caller value cannot form a header
/// - `Encode` - a request body failed to serialize
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
