//! 价格与优惠券解析服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::types::{Amount, Coupon, CouponTable, PriceQuote};

/// Resolves the payable amount for a base price and optional coupon.
///
/// Pure: no I/O, and the coupon table is shared read-only.
#[derive(Debug, Clone)]
pub struct PricingService {
    coupons: Arc<CouponTable>,
}

impl PricingService {
    #[must_use]
    pub fn new(coupons: Arc<CouponTable>) -> Self {
        Self { coupons }
    }

    /// Look up a coupon. Blank or absent codes mean no coupon.
    ///
    /// # Errors
    /// `InvalidCoupon` for a non-blank code that is not in the table.
    pub fn find_coupon(&self, code: Option<&str>) -> CoreResult<Option<Coupon>> {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            None => Ok(None),
            Some(code) => self
                .coupons
                .find(code)
                .map(Some)
                .ok_or_else(|| CoreError::InvalidCoupon(code.to_string())),
        }
    }

    /// Payable amount: base price less the coupon percentage, rounded half-up.
    pub fn resolve_price(&self, base_price: Amount, coupon_code: Option<&str>) -> CoreResult<Amount> {
        Ok(self.quote(base_price, coupon_code)?.payable)
    }

    /// Full price breakdown for previews.
    pub fn quote(&self, base_price: Amount, coupon_code: Option<&str>) -> CoreResult<PriceQuote> {
        let coupon = self.find_coupon(coupon_code)?;
        let payable = coupon
            .as_ref()
            .map_or(base_price, |c| base_price.discounted(c.percent_off));
        Ok(PriceQuote {
            base_price,
            discount: base_price.saturating_sub(payable),
            payable,
            coupon,
        })
    }
}
