//! Blocking client for Vault's initialization and unseal endpoints
//!
//! Every operation is a short sequence of synchronous HTTP requests. Nothing
//! is retried unless [`ClientConfig::unseal_retries`] asks for it, and a
//! failure never undoes what the backend already accepted.
//!
//! ```rust,no_run
//! use vaultinit::client::VaultClient;
//!
//! # fn main() -> Result<(), vaultinit::Error> {
//! let client = VaultClient::new("http://127.0.0.1:8200")?;
//! let response = client.init(5, 3)?;
//! client.unseal(&response.keys_base64[..3])?;
//! assert!(!client.seal_status()?.sealed);
//! # Ok(())
//! # }
//! ```

mod config;
mod wire;

pub use config::{ClientConfig, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use wire::{InitResponse, SealStatus};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::domain::{self, SharingConfig};
use crate::error::Error;
use wire::{InitRequest, InitStatus, UnsealRequest};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const INIT_PATH: &str = "/v1/sys/init";
const UNSEAL_PATH: &str = "/v1/sys/unseal";
const SEAL_STATUS_PATH: &str = "/v1/sys/seal-status";

/// Client bound to a single Vault server.
///
/// Safe to reuse for sequential calls. Multi-step operations are not
/// synchronized against other callers.
#[derive(Debug, Clone)]
pub struct VaultClient {
    config: ClientConfig,
    http: Client,
}

impl VaultClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    /// Returns [`Error::EmptyEndpoint`] for an empty URL and
    /// [`Error::InvalidEndpoint`] for anything that is not an absolute
    /// http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    /// Same as [`VaultClient::new`], plus [`Error::HttpClient`] if the HTTP
    /// stack cannot be initialized.
    pub fn with_config(mut config: ClientConfig) -> Result<Self, Error> {
        if config.url.trim().is_empty() {
            return Err(Error::EmptyEndpoint);
        }

        let parsed = Url::parse(&config.url).map_err(|e| Error::InvalidEndpoint {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint {
                url: config.url.clone(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let trimmed = config.url.trim_end_matches('/').len();
        config.url.truncate(trimmed);

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    #[must_use]
    pub fn unseal_on_init(&self) -> bool {
        self.config.unseal_on_init
    }

    /// Makes [`VaultClient::initialize`] unseal with the fresh shares.
    pub fn set_unseal_on_init(&mut self, unseal_on_init: bool) {
        self.config.unseal_on_init = unseal_on_init;
    }

    /// Validates `shares` and `threshold`, then initializes the backend.
    ///
    /// # Errors
    /// [`Error::Config`] without touching the network when the pair is
    /// invalid, otherwise the errors of [`VaultClient::initialize`].
    pub fn init(&self, shares: u8, threshold: u8) -> Result<InitResponse, Error> {
        let config = domain::validate(i64::from(shares), i64::from(threshold))?;
        self.initialize(config)
    }

    /// Initializes the backend, and unseals it when configured to.
    ///
    /// Not idempotent: against an initialized backend this fails with
    /// [`Error::InitRejected`]. Any failure after the init request went out
    /// may leave the backend initialized; check [`VaultClient::init_status`]
    /// before trying again.
    ///
    /// # Errors
    /// [`Error::Transport`], [`Error::InitRejected`], [`Error::Decode`] or
    /// [`Error::MalformedInitResponse`] for the init request, and
    /// [`Error::UnsealAfterInit`] when unsealing fails afterwards.
    pub fn initialize(&self, config: SharingConfig) -> Result<InitResponse, Error> {
        if self.config.unseal_on_init {
            self.initialize_and_unseal(config)
        } else {
            self.send_init(config)
        }
    }

    /// Initializes the backend and submits every fresh share to unseal it.
    ///
    /// # Errors
    /// Errors of the init request are returned as-is. If unsealing fails the
    /// error is [`Error::UnsealAfterInit`], which still carries the keys and
    /// root token.
    pub fn initialize_and_unseal(&self, config: SharingConfig) -> Result<InitResponse, Error> {
        let response = self.send_init(config)?;
        match self.unseal(&response.keys_base64) {
            Ok(()) => Ok(response),
            Err(source) => Err(Error::UnsealAfterInit {
                response: Box::new(response),
                source: Box::new(source),
            }),
        }
    }

    /// Submits key shares one at a time, in order.
    ///
    /// Stops at the first failure. Shares accepted before it stay accepted
    /// on the backend, so unsealing can be resumed with the remaining ones.
    ///
    /// # Errors
    /// [`Error::Transport`] when a share could not be delivered and
    /// [`Error::UnsealRejected`] when the backend answered with a status of
    /// 400 or above.
    pub fn unseal<S: AsRef<str>>(&self, keys_base64: &[S]) -> Result<(), Error> {
        let url = self.endpoint(UNSEAL_PATH);

        for (index, key) in keys_base64.iter().enumerate() {
            let (status, body) = self.submit_unseal_key(&url, index, key.as_ref())?;
            if status.is_client_error() || status.is_server_error() {
                return Err(Error::UnsealRejected {
                    index,
                    status,
                    body: body.as_str().to_owned(),
                });
            }
            trace!(index, %status, "unseal key accepted");
        }

        debug!(%url, submitted = keys_base64.len(), "unseal keys submitted");
        Ok(())
    }

    /// Best-effort check whether the backend is initialized.
    ///
    /// Returns `false` whenever the backend cannot be asked, so a `false`
    /// is not proof of anything. Use [`VaultClient::init_status`] to tell
    /// the two apart.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        match self.init_status() {
            Ok(initialized) => initialized,
            Err(err) => {
                debug!(error = %err, "init status unavailable");
                false
            }
        }
    }

    /// Asks the backend whether it has been initialized.
    ///
    /// # Errors
    /// [`Error::Transport`], [`Error::UnexpectedStatus`] or [`Error::Decode`]
    pub fn init_status(&self) -> Result<bool, Error> {
        let status: InitStatus = self.get_json(INIT_PATH)?;
        Ok(status.initialized)
    }

    /// Reads the seal state and unseal progress.
    ///
    /// # Errors
    /// [`Error::Transport`], [`Error::UnexpectedStatus`] or [`Error::Decode`]
    pub fn seal_status(&self) -> Result<SealStatus, Error> {
        self.get_json(SEAL_STATUS_PATH)
    }

    fn send_init(&self, config: SharingConfig) -> Result<InitResponse, Error> {
        let url = self.endpoint(INIT_PATH);
        let request = InitRequest {
            secret_shares: *config.share_count(),
            secret_threshold: *config.threshold(),
        };
        debug!(
            %url,
            secret_shares = request.secret_shares,
            secret_threshold = request.secret_threshold,
            "initializing vault"
        );

        let (status, body) = self.put_json(&url, &request)?;
        if !status.is_success() {
            return Err(Error::InitRejected {
                status,
                body: body.as_str().to_owned(),
            });
        }

        let response: InitResponse =
            serde_json::from_str(&body).map_err(|source| Error::Decode { url, source })?;

        let expected = request.secret_shares;
        if response.keys.len() != usize::from(expected)
            || response.keys_base64.len() != usize::from(expected)
        {
            return Err(Error::MalformedInitResponse {
                expected,
                keys: response.keys.len(),
                keys_base64: response.keys_base64.len(),
            });
        }

        debug!(shares = expected, "vault initialized");
        Ok(response)
    }

    fn submit_unseal_key(
        &self,
        url: &str,
        index: usize,
        key: &str,
    ) -> Result<(StatusCode, Zeroizing<String>), Error> {
        let mut attempt = 0;
        loop {
            match self.put_json(url, &UnsealRequest { key }) {
                Err(err) if err.is_transport() && attempt < self.config.unseal_retries => {
                    attempt += 1;
                    debug!(index, attempt, error = %err, "retrying unseal key");
                    std::thread::sleep(self.config.retry_delay);
                }
                other => return other,
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        let (status, body) = self.send(&url, self.http.get(&url))?;
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                url,
                status,
                body: body.as_str().to_owned(),
            });
        }
        serde_json::from_str(&body).map_err(|source| Error::Decode { url, source })
    }

    fn put_json<T: Serialize>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<(StatusCode, Zeroizing<String>), Error> {
        let body = serde_json::to_vec(payload).map_err(Error::Encode)?;
        let request = self
            .http
            .put(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body);
        self.send(url, request)
    }

    /// Sends the request and reads the whole body before returning.
    fn send(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<(StatusCode, Zeroizing<String>), Error> {
        let transport = |source| Error::Transport {
            url: url.to_owned(),
            source,
        };
        let response = request.send().map_err(transport)?;
        let status = response.status();
        let body = Zeroizing::new(response.text().map_err(transport)?);
        trace!(%url, %status, "vault responded");
        Ok((status, body))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }
}
