//! Prices stored as integer minor currency units.
//!
//! The shop sells in a single currency (USD). Amounts are kept as a count of
//! cents so that totals never accumulate floating-point rounding error.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from a decimal string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal amount such as `64.99`.
    #[error("price must be a decimal amount like 64.99")]
    Invalid,
    /// More than two digits after the decimal point.
    #[error("price cannot have more than 2 decimal places")]
    TooPrecise,
    /// The amount does not fit in the cents range.
    #[error("price is too large")]
    Overflow,
}

/// A price in cents.
///
/// ## Examples
///
/// ```
/// use jungle_core::Price;
///
/// let price: Price = "64.99".parse().unwrap();
/// assert_eq!(price.cents(), 6499);
/// assert_eq!(price.to_string(), "$64.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Add another price, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    /// Parse a dollar amount such as `64.99`, `64.9`, `64` or `$64.99`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(PriceError::Invalid);
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PriceError::Invalid);
        }
        if frac.len() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| PriceError::Overflow)?
        };
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| PriceError::Invalid)? * 10,
            _ => frac.parse().map_err(|_| PriceError::Invalid)?,
        };

        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Self)
            .ok_or(PriceError::Overflow)
    }
}

// SQLx support (with postgres feature): stored as BIGINT cents
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
