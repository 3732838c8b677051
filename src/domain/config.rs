//! Configuration validation for root key sharing

use crate::error::ConfigError;

use super::{ShareCount, Threshold};

/// Validated pair of share count and threshold
///
/// Enforces two invariants at construction:
/// - threshold <= `share_count`
/// - a multi-share setup never has a threshold of one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharingConfig {
    share_count: ShareCount,
    threshold: Threshold,
}

impl SharingConfig {
    /// Creates a new sharing configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::ThresholdExceedsShares`] if threshold exceeds
    /// share count, and [`ConfigError::InvalidMultiShareThreshold`] if
    /// several shares are paired with a threshold of one
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vaultinit::domain::{SharingConfig, Threshold, ShareCount};
    ///
    /// let config = SharingConfig::new(
    ///     ShareCount::new(5).unwrap(),
    ///     Threshold::new(3).unwrap(),
    /// ).unwrap();
    ///
    /// assert_eq!(*config.share_count(), 5);
    /// assert_eq!(*config.threshold(), 3);
    ///
    /// // Invalid: threshold > share_count
    /// assert!(SharingConfig::new(ShareCount::new(3).unwrap(), Threshold::new(5).unwrap()).is_err());
    ///
    /// // Invalid: any single share out of five would unseal
    /// assert!(SharingConfig::new(ShareCount::new(5).unwrap(), Threshold::new(1).unwrap()).is_err());
    /// ```
    pub fn new(share_count: ShareCount, threshold: Threshold) -> Result<Self, ConfigError> {
        if *threshold > *share_count {
            return Err(ConfigError::ThresholdExceedsShares {
                shares: *share_count,
                threshold: *threshold,
            });
        }
        if *share_count > 1 && *threshold <= 1 {
            return Err(ConfigError::InvalidMultiShareThreshold {
                shares: *share_count,
            });
        }
        Ok(Self {
            share_count,
            threshold,
        })
    }

    #[must_use]
    pub fn share_count(&self) -> ShareCount {
        self.share_count
    }

    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }
}

/// Validates raw share count and threshold values
///
/// Range errors are reported for the share count before the threshold.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] for values outside 1..=255, otherwise
/// the errors of [`SharingConfig::new`]
pub fn validate(shares: i64, threshold: i64) -> Result<SharingConfig, ConfigError> {
    let share_count = ShareCount::try_from(shares)?;
    let threshold = Threshold::try_from(threshold)?;
    SharingConfig::new(share_count, threshold)
}
