//! Money arithmetic for checkout: line subtotals, coupon discounts and the
//! human-readable numbers stamped on orders, transactions and refunds.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::entity::{coupons, enums::DiscountType};

/// Why a coupon was not applied. Checkout still goes through without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponRejection {
    NotFound,
    UsageLimitReached,
    BelowMinimum { min_purchase: Decimal },
}

impl CouponRejection {
    pub fn message(&self) -> String {
        match self {
            CouponRejection::NotFound => "Invalid coupon".to_string(),
            CouponRejection::UsageLimitReached => "Coupon usage limit reached".to_string(),
            CouponRejection::BelowMinimum { min_purchase } => {
                format!("Minimum purchase of {min_purchase} not reached")
            }
        }
    }
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Whether `now` falls inside the coupon's validity window and it is switched on.
pub fn coupon_is_live(coupon: &coupons::Model, now: DateTime<Utc>) -> bool {
    coupon.is_active && coupon.valid_from <= now && now <= coupon.valid_until
}

/// Discount a coupon grants on `subtotal`.
///
/// Percentage discounts are capped at `max_discount` when set. The result is
/// rounded to cents and never exceeds the subtotal.
pub fn coupon_discount(
    coupon: &coupons::Model,
    subtotal: Decimal,
) -> Result<Decimal, CouponRejection> {
    if let Some(limit) = coupon.usage_limit {
        if coupon.used_count >= limit {
            return Err(CouponRejection::UsageLimitReached);
        }
    }
    if subtotal < coupon.min_purchase {
        return Err(CouponRejection::BelowMinimum {
            min_purchase: coupon.min_purchase,
        });
    }

    let raw = match coupon.discount_type {
        DiscountType::Percentage => {
            let pct = subtotal * coupon.discount_value / Decimal::ONE_HUNDRED;
            match coupon.max_discount {
                Some(cap) => pct.min(cap),
                None => pct,
            }
        }
        DiscountType::Fixed => coupon.discount_value,
    };

    Ok(round_money(raw).clamp(Decimal::ZERO, subtotal))
}

fn stamped_number(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}{}",
        prefix,
        now.format("%Y%m%d"),
        suffix[..8].to_uppercase()
    )
}

pub fn order_number(now: DateTime<Utc>) -> String {
    stamped_number("ORD", now)
}

pub fn transaction_number(now: DateTime<Utc>) -> String {
    stamped_number("TXN", now)
}

pub fn refund_number(now: DateTime<Utc>) -> String {
    stamped_number("REF", now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(discount_type: DiscountType, value: i64) -> coupons::Model {
        let now = Utc::now();
        coupons::Model {
            id: Uuid::new_v4(),
            code: "TEST".into(),
            description: String::new(),
            discount_type,
            discount_value: Decimal::from(value),
            min_purchase: Decimal::ZERO,
            max_discount: None,
            valid_from: (now - Duration::days(1)).into(),
            valid_until: (now + Duration::days(1)).into(),
            usage_limit: None,
            used_count: 0,
            is_active: true,
            created_at: now.into(),
        }
    }

    #[test]
    fn percentage_coupon_takes_share_of_subtotal() {
        let mut save10 = coupon(DiscountType::Percentage, 10);
        save10.min_purchase = Decimal::from(50);

        let subtotal = line_subtotal(Decimal::from(100), 2);
        let discount = coupon_discount(&save10, subtotal).unwrap();

        assert_eq!(discount, Decimal::from(20));
        assert_eq!(subtotal - discount, Decimal::from(180));
    }

    #[test]
    fn percentage_coupon_is_capped_by_max_discount() {
        let mut c = coupon(DiscountType::Percentage, 50);
        c.max_discount = Some(Decimal::from(30));

        let discount = coupon_discount(&c, Decimal::from(1000)).unwrap();
        assert_eq!(discount, Decimal::from(30));
    }

    #[test]
    fn fixed_coupon_never_exceeds_subtotal() {
        let c = coupon(DiscountType::Fixed, 500);
        let discount = coupon_discount(&c, Decimal::from(120)).unwrap();
        assert_eq!(discount, Decimal::from(120));
    }

    #[test]
    fn percentage_discount_rounds_to_cents() {
        let c = coupon(DiscountType::Percentage, 15);
        // 15% of 33.33 = 4.9995
        let discount = coupon_discount(&c, Decimal::new(3333, 2)).unwrap();
        assert_eq!(discount, Decimal::new(500, 2));
    }

    #[test]
    fn coupon_below_minimum_is_rejected() {
        let mut c = coupon(DiscountType::Fixed, 10);
        c.min_purchase = Decimal::from(50);

        let err = coupon_discount(&c, Decimal::from(49)).unwrap_err();
        assert_eq!(
            err,
            CouponRejection::BelowMinimum {
                min_purchase: Decimal::from(50)
            }
        );
    }

    #[test]
    fn exhausted_coupon_is_rejected() {
        let mut c = coupon(DiscountType::Fixed, 10);
        c.usage_limit = Some(3);
        c.used_count = 3;

        assert_eq!(
            coupon_discount(&c, Decimal::from(100)),
            Err(CouponRejection::UsageLimitReached)
        );
    }

    #[test]
    fn coupon_window_and_flag_gate_liveness() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Fixed, 10);
        assert!(coupon_is_live(&c, now));

        c.valid_until = (now - Duration::hours(1)).into();
        assert!(!coupon_is_live(&c, now));

        let mut off = coupon(DiscountType::Fixed, 10);
        off.is_active = false;
        assert!(!coupon_is_live(&off, now));
    }

    #[test]
    fn numbers_carry_prefix_date_and_hex_suffix() {
        let now = Utc::now();
        let number = order_number(now);
        let date = now.format("%Y%m%d").to_string();

        assert!(number.starts_with(&format!("ORD{date}")));
        assert_eq!(number.len(), 3 + 8 + 8);
        assert!(
            number[11..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_ne!(order_number(now), number);
        assert!(transaction_number(now).starts_with("TXN"));
        assert!(refund_number(now).starts_with("REF"));
    }
}
