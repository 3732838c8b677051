//! `ShareCount` newtype for secret sharing

use crate::error::ConfigError;

/// Number of key shares the backend splits its root key into (1..=255)
///
/// Vault stores the share count in a single byte, so anything above 255
/// is rejected instead of being truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShareCount(u8);

impl ShareCount {
    /// Minimum valid share count
    pub const MIN: u8 = 1;

    /// Maximum valid share count
    pub const MAX: u8 = u8::MAX;

    /// Creates a new share count
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] if count is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vaultinit::domain::ShareCount;
    ///
    /// let count = ShareCount::new(5).unwrap();
    /// assert_eq!(*count, 5);
    ///
    /// let max_count = ShareCount::new(ShareCount::MAX).unwrap();
    /// assert_eq!(*max_count, 255);
    ///
    /// assert!(ShareCount::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for ShareCount {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(count) if count >= Self::MIN => Ok(Self(count)),
            _ => Err(ConfigError::OutOfRange {
                field: "secret_shares",
                value,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }
}

impl std::ops::Deref for ShareCount {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
