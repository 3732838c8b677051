use clap::{Parser, Subcommand};

use crate::domain::{ShareCount, Threshold};

/// Parses a share count, rejecting anything outside 1..=255
fn parse_share_count(s: &str) -> Result<ShareCount, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    ShareCount::try_from(value).map_err(|e| e.to_string())
}

/// Parses a threshold, rejecting anything outside 1..=255
/// Whether it fits the share count is checked once both are known
fn parse_threshold(s: &str) -> Result<Threshold, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    Threshold::try_from(value).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "vaultinit")]
#[command(about = "Initialize a Vault server and unseal it with the generated key shares")]
pub struct Cli {
    /// Address of the Vault server
    #[arg(long, env = "VAULT_ADDR")]
    pub vault_url: String,

    /// Timeout for each request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize Vault and print the key shares and root token as JSON
    Init {
        /// Number of key shares to split the root key into
        #[arg(short = 's', long, value_parser = parse_share_count)]
        secret_shares: ShareCount,

        /// Number of key shares required to unseal
        #[arg(short = 't', long, value_parser = parse_threshold)]
        secret_threshold: Threshold,

        /// Unseal with the generated key shares right away
        #[arg(long)]
        unseal: bool,
    },
    /// Submit key shares read from stdin, one per line
    Unseal {
        /// Extra attempts per key share after a connection failure
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Print the seal status as JSON
    Status,
}
