//! Adapter exposing the client as a declarative `vault_init` resource
//!
//! An infrastructure host configures the provider once with the Vault URL,
//! then calls [`VaultInitResource::create`] exactly once per resource
//! instance and persists the returned [`VaultInitState`]. Initialization has
//! no inverse, so read, update and delete have nothing to do.
//!
//! Any error returned here is the failed resource operation; the host is
//! expected to block whatever depends on it.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::{ClientConfig, VaultClient};
use crate::domain;
use crate::error::Error;

/// Provider-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub vault_url: String,
}

/// Declared fields of a `vault_init` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultInitInput {
    pub unseal: bool,
    pub secret_shares: i64,
    pub secret_threshold: i64,
}

/// Fields the host stores after a successful create
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct VaultInitState {
    /// The Vault URL as configured; one resource per server.
    pub id: String,
    pub unseal: bool,
    pub secret_shares: i64,
    pub secret_threshold: i64,
    pub root_token: String,
    pub keys: Vec<String>,
    pub keys_base64: Vec<String>,
}

impl std::fmt::Debug for VaultInitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultInitState")
            .field("id", &self.id)
            .field("unseal", &self.unseal)
            .field("secret_shares", &self.secret_shares)
            .field("secret_threshold", &self.secret_threshold)
            .finish_non_exhaustive()
    }
}

/// The `vault_init` resource of a configured provider.
#[derive(Debug, Clone)]
pub struct VaultInitResource {
    /// The URL as configured, untrimmed.
    vault_url: String,
    client: VaultClient,
}

impl VaultInitResource {
    /// # Errors
    /// [`Error::EmptyEndpoint`] or [`Error::InvalidEndpoint`] for a bad URL
    pub fn configure(provider: &ProviderConfig) -> Result<Self, Error> {
        Self::with_client_config(ClientConfig::new(provider.vault_url.clone()))
    }

    /// Like [`VaultInitResource::configure`] with custom client settings.
    ///
    /// # Errors
    /// Same as [`VaultClient::with_config`]
    pub fn with_client_config(config: ClientConfig) -> Result<Self, Error> {
        let vault_url = config.url.clone();
        Ok(Self {
            vault_url,
            client: VaultClient::with_config(config)?,
        })
    }

    /// Initializes (and optionally unseals) the server.
    ///
    /// # Errors
    /// Validation errors before any request, then any client error. An
    /// [`Error::UnsealAfterInit`] still fails the create, but its keys can
    /// be recovered with [`Error::init_response`].
    pub fn create(&self, input: &VaultInitInput) -> Result<VaultInitState, Error> {
        let config = domain::validate(input.secret_shares, input.secret_threshold)?;

        let mut client = self.client.clone();
        client.set_unseal_on_init(input.unseal);
        let response = client.initialize(config)?;

        tracing::debug!(id = %self.vault_url, "vault_init created");
        Ok(VaultInitState {
            id: self.vault_url.clone(),
            unseal: input.unseal,
            secret_shares: input.secret_shares,
            secret_threshold: input.secret_threshold,
            root_token: response.root_token.clone(),
            keys: response.keys.clone(),
            keys_base64: response.keys_base64.clone(),
        })
    }

    /// # Errors
    /// Never fails; the stored state is kept as-is.
    pub fn read(&self, _state: &VaultInitState) -> Result<(), Error> {
        Ok(())
    }

    /// # Errors
    /// Never fails; there is nothing to change after initialization.
    pub fn update(&self, _state: &VaultInitState, _input: &VaultInitInput) -> Result<(), Error> {
        Ok(())
    }

    /// # Errors
    /// Never fails; an initialized Vault cannot be uninitialized.
    pub fn delete(&self, _state: &VaultInitState) -> Result<(), Error> {
        Ok(())
    }
}
