//! JSON bodies exchanged with the Vault `sys` endpoints.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Body of `PUT /v1/sys/init`.
#[derive(Debug, Serialize)]
pub(crate) struct InitRequest {
    pub secret_shares: u8,
    pub secret_threshold: u8,
}

/// Body of `PUT /v1/sys/unseal`, one per key share.
#[derive(Serialize)]
pub(crate) struct UnsealRequest<'a> {
    pub key: &'a str,
}

/// Key shares and root token minted by a successful initialization
///
/// `keys` and `keys_base64` hold the same shares in two encodings, in the
/// same order. Both vectors and the token are wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct InitResponse {
    pub keys: Vec<String>,
    pub keys_base64: Vec<String>,
    pub root_token: String,
}

impl std::fmt::Debug for InitResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitResponse")
            .field("keys", &format_args!("[{} redacted]", self.keys.len()))
            .field(
                "keys_base64",
                &format_args!("[{} redacted]", self.keys_base64.len()),
            )
            .field("root_token", &"<redacted>")
            .finish()
    }
}

/// Answer of `GET /v1/sys/init`.
#[derive(Debug, Deserialize)]
pub(crate) struct InitStatus {
    pub initialized: bool,
}

/// Answer of `GET /v1/sys/seal-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealStatus {
    #[serde(default)]
    pub initialized: bool,
    pub sealed: bool,
    /// Threshold
    pub t: u8,
    /// Number of shares
    pub n: u8,
    /// Shares submitted towards the threshold so far
    pub progress: u8,
    #[serde(default)]
    pub version: Option<String>,
}
