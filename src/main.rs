use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use vaultinit::cli::{Cli, Commands};
use vaultinit::client::{ClientConfig, DEFAULT_RETRY_DELAY, VaultClient};
use vaultinit::commands::{InitOutcome, init_vault, seal_status, unseal_vault};

/// Read unseal key shares securely from stdin (hidden input when TTY available)
/// User should input shares one per line, followed by an empty line to finish
fn read_key_shares() -> Result<Vec<Zeroizing<String>>> {
    let mut shares = Vec::new();

    if atty::is(atty::Stream::Stdin) {
        // Interactive mode - use rpassword for hidden input
        eprintln!("Enter unseal key shares (one per line, empty line to finish):");

        loop {
            let share = Zeroizing::new(
                rpassword::read_password().context("Failed to read key share from stdin")?,
            );

            if share.trim().is_empty() {
                break;
            }

            shares.push(Zeroizing::new(share.trim().to_string()));
        }
    } else {
        // Non-interactive mode - read from stdin
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines() {
            let line = Zeroizing::new(line.context("Failed to read line from stdin")?);
            let trimmed = line.trim();

            if trimmed.is_empty() {
                break;
            }

            shares.push(Zeroizing::new(trimmed.to_string()));
        }
    }

    Ok(shares)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = Zeroizing::new(
        serde_json::to_string_pretty(value).context("Failed to encode output")?,
    );
    println!("{}", *json);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::new(cli.vault_url).timeout(Duration::from_secs(cli.timeout));
    if let Commands::Unseal { retries } = cli.command {
        config = config.unseal_retries(retries, DEFAULT_RETRY_DELAY);
    }
    let mut client = VaultClient::with_config(config).context("Invalid Vault address")?;

    match cli.command {
        Commands::Init {
            secret_shares,
            secret_threshold,
            unseal,
        } => match init_vault(&mut client, secret_shares, secret_threshold, unseal)? {
            InitOutcome::Complete(response) => print_json(&response)?,
            InitOutcome::Partial { response, error } => {
                // The keys cannot be fetched again, print them before failing
                print_json(&*response)?;
                return Err(error);
            }
        },
        Commands::Unseal { .. } => {
            let shares = read_key_shares()?;
            let status = unseal_vault(&client, &shares)?;
            print_json(&status)?;
        }
        Commands::Status => {
            let status = seal_status(&client)?;
            print_json(&status)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vaultinit=warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    run(Cli::parse())
}
