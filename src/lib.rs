//! Initialize a Vault server and optionally unseal it with the fresh key shares.

pub mod client;
pub mod domain;
pub mod error;
pub mod resource;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;

pub use client::{ClientConfig, InitResponse, SealStatus, VaultClient};
pub use error::{ConfigError, Error};
