use crate::error::PricingError;
use chrono::{DateTime, Utc};
use phub_domain::coupon::{AppliedCoupon, Coupon, CouponDiscount};
use phub_domain::money::{Money, round_money};
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Discount a coupon grants on `order_total` at `now`.
///
/// Percentage discounts are capped by the coupon's maximum; any discount is
/// capped by the order total, so the amount due never goes negative.
///
/// # Errors
/// Returns [`PricingError::CouponRejected`] when the coupon is inactive, outside
/// its validity window, or the order is below the minimum value.
pub fn apply_coupon(
    coupon: &Coupon,
    order_total: Money,
    now: DateTime<Utc>,
) -> Result<AppliedCoupon, PricingError> {
    if !coupon.active {
        return Err(rejected(coupon, "is not active"));
    }
    if !coupon.is_valid_at(now) {
        return Err(rejected(coupon, "is expired or not active yet"));
    }
    if order_total < coupon.min_order_value {
        return Err(rejected(
            coupon,
            format!("needs a minimum order value of {}", round_money(coupon.min_order_value)),
        ));
    }

    let raw = match &coupon.discount {
        CouponDiscount::Percentage { percent, max_discount } => {
            let share = order_total
                .checked_mul(*percent)
                .map(|v| v / HUNDRED)
                .ok_or_else(|| rejected(coupon, "discount is out of range"))?;
            max_discount.map_or(share, |cap| share.min(cap))
        },
        CouponDiscount::Flat { amount } => *amount,
    };

    Ok(AppliedCoupon {
        code: Coupon::normalize_code(&coupon.code),
        discount: round_money(raw.min(order_total).max(Decimal::ZERO)),
    })
}

/// Rejects coupons no order could ever redeem sensibly.
pub(crate) fn validate_coupon(coupon: &Coupon) -> Result<(), String> {
    let code = &coupon.code;
    if Coupon::normalize_code(code).is_empty() {
        return Err("coupon code is blank".to_owned());
    }
    if coupon.valid_until < coupon.valid_from {
        return Err(format!("coupon '{code}' ends before it starts"));
    }
    if coupon.min_order_value.is_sign_negative() {
        return Err(format!("coupon '{code}' has a negative minimum order value"));
    }
    match &coupon.discount {
        CouponDiscount::Percentage { percent, max_discount } => {
            if percent.is_sign_negative() || *percent > HUNDRED {
                return Err(format!("coupon '{code}' percent must be within 0..=100"));
            }
            if max_discount.is_some_and(|cap| cap.is_sign_negative()) {
                return Err(format!("coupon '{code}' has a negative discount cap"));
            }
        },
        CouponDiscount::Flat { amount } if amount.is_sign_negative() => {
            return Err(format!("coupon '{code}' has a negative flat amount"));
        },
        CouponDiscount::Flat { .. } => {},
    }
    Ok(())
}

fn rejected(coupon: &Coupon, reason: impl std::fmt::Display) -> PricingError {
    PricingError::CouponRejected {
        message: format!("{} {reason}", Coupon::normalize_code(&coupon.code)).into(),
        context: None,
    }
}
