use crate::money::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a coupon reduces the order total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "discountType", rename_all = "lowercase")]
pub enum CouponDiscount {
    /// `percent` of the order total, optionally capped.
    Percentage {
        percent: Decimal,
        #[serde(default, rename = "maxDiscountAmount", skip_serializing_if = "Option::is_none")]
        max_discount: Option<Money>,
    },
    Flat { amount: Money },
}

/// A promotional code as configured by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    #[serde(flatten)]
    pub discount: CouponDiscount,
    #[serde(default)]
    pub min_order_value: Money,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

const fn active_by_default() -> bool {
    true
}

impl Coupon {
    /// Codes are matched case-insensitively, ignoring surrounding whitespace.
    #[must_use]
    pub fn normalize_code(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    /// Whether `now` falls inside the inclusive validity window.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }
}

/// A coupon redeemed against one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCoupon {
    pub code: String,
    /// Already rounded and never above the order total.
    pub discount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn coupon_deserializes_both_discount_kinds() {
        let raw = r#"{
            "code": "FESTIVE10",
            "discountType": "percentage",
            "percent": "10",
            "maxDiscountAmount": "150",
            "minOrderValue": "500",
            "validFrom": "2025-01-01T00:00:00Z",
            "validUntil": "2025-12-31T23:59:59Z"
        }"#;
        let coupon: Coupon = serde_json::from_str(raw).unwrap();
        assert!(coupon.active);
        assert_eq!(
            coupon.discount,
            CouponDiscount::Percentage { percent: dec!(10), max_discount: Some(dec!(150)) }
        );

        let raw = r#"{ "code": "FLAT50", "discountType": "flat", "amount": 50,
            "validFrom": "2025-01-01T00:00:00Z", "validUntil": "2025-02-01T00:00:00Z",
            "active": false }"#;
        let coupon: Coupon = serde_json::from_str(raw).unwrap();
        assert_eq!(coupon.discount, CouponDiscount::Flat { amount: dec!(50) });
        assert_eq!(coupon.min_order_value, dec!(0));
        assert!(!coupon.active);
    }

    #[test]
    fn codes_normalize_to_upper_case() {
        assert_eq!(Coupon::normalize_code("  festive10 "), "FESTIVE10");
    }
}
