//! Threshold newtype for secret sharing

use crate::error::ConfigError;

/// Number of shares needed to reconstruct the root key (1..=255)
///
/// A threshold of one is only meaningful for a single-share setup; that
/// pairing is checked by [`SharingConfig`](super::SharingConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u8);

impl Threshold {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = u8::MAX;

    /// Creates a new threshold, returning an error if value is 0
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] if the threshold is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vaultinit::domain::Threshold;
    ///
    /// let threshold = Threshold::new(3).unwrap();
    /// assert_eq!(*threshold, 3);
    ///
    /// assert!(Threshold::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for Threshold {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(threshold) if threshold >= Self::MIN => Ok(Self(threshold)),
            _ => Err(ConfigError::OutOfRange {
                field: "secret_threshold",
                value,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }
}

impl std::ops::Deref for Threshold {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
