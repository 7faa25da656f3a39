//! 优惠券类型定义

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Amount;

/// A named percentage discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Canonical (uppercase) code.
    pub code: String,
    /// Percentage off, 0..=100.
    pub percent_off: u8,
}

/// Process-wide coupon table.
///
/// Built once from configuration and shared through `Arc` by every pricing path
/// (order issuing and UI previews alike). Lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponTable {
    coupons: BTreeMap<String, u8>,
}

impl CouponTable {
    /// Build a table from `(code, percent_off)` pairs.
    ///
    /// Codes are normalised to uppercase. Blank codes and percentages above 100 are
    /// rejected with a message naming the offending entry.
    pub fn new<I, S>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: AsRef<str>,
    {
        let mut coupons = BTreeMap::new();
        for (code, percent_off) in entries {
            let code = normalize_code(code.as_ref());
            if code.is_empty() {
                return Err("Coupon code must not be empty".to_string());
            }
            if percent_off > 100 {
                return Err(format!(
                    "Coupon {code} has percent_off {percent_off}, expected 0..=100"
                ));
            }
            coupons.insert(code, percent_off);
        }
        Ok(Self { coupons })
    }

    /// Table with no coupons at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            coupons: BTreeMap::new(),
        }
    }

    /// Look up a coupon. `None` for unknown codes.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<Coupon> {
        let code = normalize_code(code);
        self.coupons.get(&code).map(|&percent_off| Coupon {
            code,
            percent_off,
        })
    }

    /// All coupons, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = Coupon> + '_ {
        self.coupons.iter().map(|(code, &percent_off)| Coupon {
            code: code.clone(),
            percent_off,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl Default for CouponTable {
    /// The launch coupon set.
    fn default() -> Self {
        let coupons = [
            ("NEWUSER", 10),
            ("SAVE20", 20),
            ("FIRST50", 50),
            ("WELCOME25", 25),
            ("STUDENT30", 30),
            ("EARLY40", 40),
            ("FRIEND15", 15),
            ("DEV100", 100),
        ]
        .into_iter()
        .map(|(code, pct)| (code.to_string(), pct))
        .collect();
        Self { coupons }
    }
}

/// Trimmed, uppercased coupon code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Price breakdown for a TLD and optional coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub base_price: Amount,
    pub discount: Amount,
    pub payable: Amount,
    /// Applied coupon, `None` when no code was given.
    pub coupon: Option<Coupon>,
}
