//! Configuration for [`VaultClient`](super::VaultClient).

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between unseal retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Settings of a [`VaultClient`](super::VaultClient)
///
/// ```rust
/// use std::time::Duration;
/// use vaultinit::client::ClientConfig;
///
/// let config = ClientConfig::new("http://127.0.0.1:8200")
///     .unseal_on_init(true)
///     .timeout(Duration::from_secs(5));
/// assert!(config.unseal_on_init);
/// assert_eq!(config.unseal_retries, 0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the Vault server, e.g. `http://127.0.0.1:8200`.
    pub url: String,
    /// Unseal with the fresh shares right after initialization.
    pub unseal_on_init: bool,
    /// Upper bound for each individual request.
    pub timeout: Duration,
    /// Extra attempts per unseal key after a transport failure.
    /// Rejections are never retried.
    pub unseal_retries: u32,
    pub retry_delay: Duration,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            unseal_on_init: false,
            timeout: DEFAULT_TIMEOUT,
            unseal_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    #[must_use]
    pub fn unseal_on_init(mut self, unseal_on_init: bool) -> Self {
        self.unseal_on_init = unseal_on_init;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn unseal_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.unseal_retries = retries;
        self.retry_delay = delay;
        self
    }
}
