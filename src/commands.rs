use anyhow::{Context, Result, bail};
use zeroize::Zeroizing;

use crate::client::{InitResponse, SealStatus, VaultClient};
use crate::domain::{ShareCount, SharingConfig, Threshold};
use crate::error::Error;

/// Outcome of the `init` command
///
/// `Partial` means the server is initialized but unsealing failed; the keys
/// must still reach the operator.
pub enum InitOutcome {
    Complete(InitResponse),
    Partial {
        response: Box<InitResponse>,
        error: anyhow::Error,
    },
}

/// Initialize Vault, unsealing it afterwards if `unseal` is set
///
/// # Errors
/// Returns an error if the configuration is invalid or the init request fails
pub fn init_vault(
    client: &mut VaultClient,
    secret_shares: ShareCount,
    secret_threshold: Threshold,
    unseal: bool,
) -> Result<InitOutcome> {
    let config = SharingConfig::new(secret_shares, secret_threshold)
        .context("Invalid seal configuration")?;

    client.set_unseal_on_init(unseal);
    match client.initialize(config) {
        Ok(response) => Ok(InitOutcome::Complete(response)),
        Err(Error::UnsealAfterInit { response, source }) => Ok(InitOutcome::Partial {
            response,
            error: anyhow::Error::new(*source).context("Vault was initialized but not unsealed"),
        }),
        Err(e) => Err(e).with_context(|| format!("Failed to initialize {}", client.base_url())),
    }
}

/// Submit unseal key shares in order
///
/// # Errors
/// Returns an error if no shares are given or any share is not accepted
pub fn unseal_vault(client: &VaultClient, keys: &[Zeroizing<String>]) -> Result<SealStatus> {
    if keys.is_empty() {
        bail!("No key shares provided");
    }

    client
        .unseal(keys)
        .with_context(|| format!("Failed to unseal {}", client.base_url()))?;

    client
        .seal_status()
        .context("Key shares submitted but seal status is unavailable")
}

/// Fetch the current seal status
///
/// # Errors
/// Returns an error if Vault cannot be reached or answers unexpectedly
pub fn seal_status(client: &VaultClient) -> Result<SealStatus> {
    client
        .seal_status()
        .with_context(|| format!("Failed to read seal status of {}", client.base_url()))
}
