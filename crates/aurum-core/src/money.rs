//! # Money Module
//!
//! Provides the `Money` type for monetary values in an estimation.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    5.5 g × ₹6123.45/g = 33678.975000000006  ❌ WRONG!                   │
//! │                                                                         │
//! │  Jewelry pricing multiplies fractional grams by per-gram rates and     │
//! │  then applies percentages, so integer paise alone is not enough.       │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                            │
//! │    5.5 × 6123.45 = 33678.975 exactly                                   │
//! │    Rounding happens only when a value is displayed or printed          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aurum_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let metal = Money::new(dec!(33000));
//! let wastage = metal.percent(dec!(10));
//! assert_eq!(wastage.amount(), dec!(3300));
//!
//! let total = metal + wastage;
//! assert_eq!(total.to_string(), "₹36300.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Number of decimal places used when a value is shown to a customer.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in rupees, held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (not f64)**: weights × rates × percentages stay exact
/// - **Signed**: intermediate values (credits before clamping) may be negative
/// - **No implicit rounding**: arithmetic keeps full precision; use
///   [`Money::round_for_display`] at the presentation edge
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  net weight × rate ──► metal value ──┬──► making charge (percentage)   │
/// │                                      ├──► wastage (percentage)         │
/// │                                      ▼                                  │
/// │                                   subtotal ──► tax ──► line total       │
/// │                                                                         │
/// │  Σ line totals − purchase − chit − advance ──► net payable (≥ 0)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from a decimal rupee amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the rupee amount as a decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns `percent`% of this amount (`amount × percent / 100`).
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let subtotal = Money::new(dec!(36800));
    /// assert_eq!(subtotal.percent(dec!(3)).amount(), dec!(1104));
    /// ```
    #[inline]
    pub fn percent(&self, percent: Decimal) -> Money {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Returns this value, or zero if it is negative.
    ///
    /// Used for net payable: credits can never make the shop owe the customer.
    #[inline]
    pub fn floor_at_zero(self) -> Money {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds to paise (half away from zero) for receipts and screens.
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let metal = Money::new(dec!(33678.975));
    /// assert_eq!(metal.round_for_display().amount(), dec!(33678.98));
    /// ```
    pub fn round_for_display(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows rupees rounded to paise.
///
/// ## Note
/// Grouping (lakh/crore separators) is a presentation concern and is left
/// to the receipt/screen layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_for_display().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}₹{:.prec$}",
            sign,
            rounded.abs(),
            prec = DISPLAY_DECIMALS as usize
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a decimal factor (grams, pieces).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
