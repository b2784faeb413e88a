//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The quantity is zero or negative.
    #[error("quantity must be at least {min}")]
    TooSmall {
        /// Minimum allowed quantity.
        min: u32,
    },
    /// The quantity exceeds the per-line maximum.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// Number of servings on a cart line.
///
/// ## Constraints
///
/// - Range: 1-99 inclusive
///
/// ## Examples
///
/// ```
/// use bistro_core::Quantity;
///
/// assert!(Quantity::new(1).is_ok());
/// assert!(Quantity::new(99).is_ok());
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(100).is_err());
///
/// assert_eq!(Quantity::clamped(250).get(), 99);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest quantity a line can hold.
    pub const MIN: u32 = 1;
    /// Largest quantity a line can hold.
    pub const MAX: u32 = 99;
    /// A single serving.
    pub const ONE: Self = Self(1);

    /// Validate a quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is outside `1..=99`.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value < Self::MIN {
            return Err(QuantityError::TooSmall { min: Self::MIN });
        }
        if value > Self::MAX {
            return Err(QuantityError::TooLarge { max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Clamp an arbitrary signed value into `1..=99`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        // Bounded to 1..=99 above, so the conversion cannot fail.
        Self(u32::try_from(bounded).unwrap_or(Self::MIN))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Add servings, saturating at the maximum.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self((self.0 + other.0).min(Self::MAX))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(matches!(
            Quantity::new(0),
            Err(QuantityError::TooSmall { min: 1 })
        ));
        assert!(matches!(
            Quantity::new(100),
            Err(QuantityError::TooLarge { max: 99 })
        ));
        assert_eq!(Quantity::new(42).unwrap().get(), 42);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Quantity::clamped(-3).get(), 1);
        assert_eq!(Quantity::clamped(0).get(), 1);
        assert_eq!(Quantity::clamped(7).get(), 7);
        assert_eq!(Quantity::clamped(1000).get(), 99);
    }

    #[test]
    fn test_saturating_add() {
        let q = Quantity::new(98).unwrap().saturating_add(Quantity::new(5).unwrap());
        assert_eq!(q.get(), 99);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("120").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
    }
}
