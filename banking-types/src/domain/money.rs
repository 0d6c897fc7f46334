//! Non-negative monetary amount in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Monetary amount stored in the smallest currency unit (cents).
///
/// Integer minor units avoid the rounding drift binary floating point
/// accumulates over repeated transactions. A `Money` is never negative;
/// signed deltas are applied through [`Money::checked_apply`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    ToSchema,
)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64, example = 10000)]
pub struct Money(i64);

impl Money {
    /// Creates a new Money value.
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies a signed delta (positive credits, negative debits).
    ///
    /// Fails with `InsufficientFunds` if the result would be negative and
    /// with `BalanceOverflow` if it does not fit in an `i64`.
    pub fn checked_apply(self, delta: i64) -> Result<Money, DomainError> {
        let next = self
            .0
            .checked_add(delta)
            .ok_or(DomainError::BalanceOverflow)?;
        if next < 0 {
            return Err(DomainError::InsufficientFunds {
                available: self.0,
                requested: delta.unsigned_abs(),
            });
        }
        Ok(Money(next))
    }
}

impl TryFrom<i64> for Money {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
