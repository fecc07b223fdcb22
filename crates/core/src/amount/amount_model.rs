//! The `PointAmount` fixed-point type.
//!
//! Every monetary value in the economy is a signed fixed-point number with
//! exactly [`POINT_DECIMAL_SCALE`](crate::constants::POINT_DECIMAL_SCALE)
//! fractional digits. Values are rounded half-up at the point of creation,
//! so arithmetic downstream never carries binary floating-point drift.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::POINT_DECIMAL_SCALE;

/// A signed point amount with exactly 8 fractional digits.
///
/// Construction always rounds half-up
/// (`RoundingStrategy::MidpointAwayFromZero`) and rescales, so two amounts
/// representing the same value compare equal and display identically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PointAmount(Decimal);

impl PointAmount {
    pub const ZERO: PointAmount = PointAmount(Decimal::ZERO);

    /// The smallest representable positive amount (1e-8).
    pub const MIN_UNIT: PointAmount = PointAmount(dec!(0.00000001));

    /// Creates an amount from a raw decimal, rounding half-up to 8 digits.
    pub fn new(value: Decimal) -> Self {
        let mut rounded = value
            .round_dp_with_strategy(POINT_DECIMAL_SCALE, RoundingStrategy::MidpointAwayFromZero);
        // Rescale so Display always carries the full fractional width.
        if rounded.scale() != POINT_DECIMAL_SCALE {
            rounded.rescale(POINT_DECIMAL_SCALE);
        }
        PointAmount(rounded)
    }

    /// The underlying decimal value.
    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for amounts strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        PointAmount(self.0.abs())
    }

    /// Multiplies by a raw decimal rate, rounding the product half-up.
    ///
    /// Used for percentage computations (pool incentives, reward rates).
    pub fn mul_rate(&self, rate: Decimal) -> Self {
        PointAmount::new(self.0 * rate)
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(PointAmount::new)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(PointAmount::new)
    }

    /// Largest integer `s` with `s * s <= self`, clamped at `u32::MAX`.
    ///
    /// Derives the maximum vote strength a balance can quadratically afford.
    /// Negative amounts yield zero.
    pub fn floor_sqrt(&self) -> u32 {
        self.0
            .sqrt()
            .map(|d| d.floor())
            .and_then(|d| d.to_u32())
            .unwrap_or(0)
    }
}

impl From<u32> for PointAmount {
    fn from(value: u32) -> Self {
        PointAmount::new(Decimal::from(value))
    }
}

impl From<u64> for PointAmount {
    fn from(value: u64) -> Self {
        PointAmount::new(Decimal::from(value))
    }
}

impl From<i64> for PointAmount {
    fn from(value: i64) -> Self {
        PointAmount::new(Decimal::from(value))
    }
}

impl FromStr for PointAmount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s).map(PointAmount::new)
    }
}

impl fmt::Display for PointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8}", self.0)
    }
}

impl Add for PointAmount {
    type Output = PointAmount;

    fn add(self, rhs: Self) -> Self::Output {
        PointAmount::new(self.0 + rhs.0)
    }
}

impl AddAssign for PointAmount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for PointAmount {
    type Output = PointAmount;

    fn sub(self, rhs: Self) -> Self::Output {
        PointAmount::new(self.0 - rhs.0)
    }
}

impl SubAssign for PointAmount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for PointAmount {
    type Output = PointAmount;

    fn neg(self) -> Self::Output {
        PointAmount::new(-self.0)
    }
}

impl std::iter::Sum for PointAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(PointAmount::ZERO, |acc, x| acc + x)
    }
}
