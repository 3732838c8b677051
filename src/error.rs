//! Error types for the vault initialization client

use reqwest::StatusCode;
use thiserror::Error;

use crate::client::InitResponse;

/// A secret-sharing configuration that the backend would refuse.
///
/// Raised before any request leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A share count or threshold outside the representable range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u8,
        max: u8,
    },
    /// More shares are required to unseal than would be created.
    #[error(
        "invalid seal configuration: threshold {threshold} cannot be larger than shares {shares}"
    )]
    ThresholdExceedsShares { shares: u8, threshold: u8 },
    /// A threshold of one with several shares lets any single share unseal.
    #[error(
        "invalid seal configuration: threshold must be greater than one for {shares} shares"
    )]
    InvalidMultiShareThreshold { shares: u8 },
}

/// Errors returned by [`VaultClient`](crate::client::VaultClient).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("vault URL is empty")]
    EmptyEndpoint,

    #[error("invalid vault URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The HTTP client could not be built; no request was attempted.
    #[error("could not create HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced a response (refused, timed out, TLS).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not encode request body")]
    Encode(#[source] serde_json::Error),

    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend answered the init request with a failure status,
    /// typically because it is already initialized.
    #[error("vault rejected initialization with status {status}: {body}")]
    InitRejected { status: StatusCode, body: String },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error(
        "vault returned {keys} keys and {keys_base64} base64 keys, expected {expected} of each"
    )]
    MalformedInitResponse {
        expected: u8,
        keys: usize,
        keys_base64: usize,
    },

    /// The backend refused the unseal key at position `index`.
    #[error("vault rejected unseal key #{} with status {status}: {body}", .index + 1)]
    UnsealRejected {
        index: usize,
        status: StatusCode,
        body: String,
    },

    /// Initialization succeeded durably but unsealing did not.
    ///
    /// The fresh keys travel with the error; they cannot be requested again.
    #[error("vault was initialized but unsealing failed")]
    UnsealAfterInit {
        response: Box<InitResponse>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Keys and root token minted by a successful initialization, if this
    /// error happened after one.
    #[must_use]
    pub fn init_response(&self) -> Option<&InitResponse> {
        match self {
            Error::UnsealAfterInit { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// Whether no response was received from the backend.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}
