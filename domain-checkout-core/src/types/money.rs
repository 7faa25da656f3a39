//! 金额类型

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use domain_checkout_provider::Currency;

/// Monetary amount in minor units (cents, paise).
///
/// Both supported currencies use two decimal places. Serialized as a decimal string
/// (`"79.20"`) so that JSON consumers never see floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Amount from whole major units (`99` → `99.00`).
    #[must_use]
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(100))
    }

    #[must_use]
    pub const fn minor(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Apply a percentage discount, rounding half-up to the minor unit.
    ///
    /// `percent_off` above 100 is treated as 100, so the result never goes below zero.
    #[must_use]
    pub fn discounted(self, percent_off: u8) -> Self {
        let keep = 100 - u128::from(percent_off.min(100));
        let scaled = u128::from(self.0) * keep;
        // scaled / 100 fits u64 because keep <= 100
        Self(u64::try_from((scaled + 50) / 100).unwrap_or(u64::MAX))
    }

    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Amount {
    type Err = String;

    /// Parses `"99"`, `"99.5"` and `"99.50"`. More than two decimals is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("Invalid amount: '{s}'");
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_minor_units() {
        assert_eq!(Amount::from_minor(7920).to_string(), "79.20");
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn parse_accepts_common_forms() {
        assert_eq!("99".parse::<Amount>(), Ok(Amount::from_major(99)));
        assert_eq!("74.25".parse::<Amount>(), Ok(Amount::from_minor(7425)));
        assert_eq!("0.5".parse::<Amount>(), Ok(Amount::from_minor(50)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "-1", "1.234", "abc", "1.x", ".5", "1e3"] {
            assert!(bad.parse::<Amount>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn discount_rounds_half_up() {
        // 99.00 * 0.80 = 79.20
        assert_eq!(Amount::from_major(99).discounted(20), Amount::from_minor(7920));
        // 0.05 * 0.50 = 0.025 -> 0.03
        assert_eq!(Amount::from_minor(5).discounted(50), Amount::from_minor(3));
        assert_eq!(Amount::from_major(100).discounted(100), Amount::ZERO);
        assert_eq!(Amount::from_major(7).discounted(0), Amount::from_major(7));
    }

    #[test]
    fn discount_above_hundred_clamps_to_zero() {
        assert_eq!(Amount::from_major(10).discounted(150), Amount::ZERO);
    }

    #[test]
    fn serde_uses_decimal_string() {
        let json = serde_json::to_string(&Amount::from_minor(7425)).unwrap_or_default();
        assert_eq!(json, "\"74.25\"");
        let back: Result<Amount, _> = serde_json::from_str("\"74.25\"");
        assert!(matches!(back, Ok(a) if a == Amount::from_minor(7425)));
    }
}
