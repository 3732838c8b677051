//! Domain types for root key sharing
//!
//! This module contains validated newtypes and configuration checked before
//! any request reaches the backend:
//! - [`ShareCount`] - Number of key shares to create (1..=255)
//! - [`Threshold`] - Minimum shares required to unseal (1..=255)
//! - [`SharingConfig`] - Validated share count and threshold pair
//! - [`validate`] - Entry point for raw integer input

mod config;
mod share_count;
mod threshold;

pub use config::{SharingConfig, validate};
pub use share_count::ShareCount;
pub use threshold::Threshold;
