//! Booking price computation

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Coupon, DiscountType, Extra};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Billable days between two instants: any started day counts as a full day.
///
/// Order of the arguments does not matter; equal instants give 0.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// One extra line of a priced booking
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraCharge {
    pub extra_id: Uuid,
    pub price_per_day: Decimal,
    pub total_price: Decimal,
}

/// Monetary breakdown of a booking
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub total_days: i64,
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub extras: Vec<ExtraCharge>,
    pub extras_total: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    /// Set when a coupon contributed to the discount
    pub coupon_id: Option<Uuid>,
}

/// Whether a coupon can be redeemed at `now`
pub fn coupon_applies(coupon: &Coupon, now: DateTime<Utc>) -> bool {
    coupon.is_active
        && coupon.start_date <= now
        && now <= coupon.end_date
        && coupon.usage_limit.map_or(true, |limit| coupon.used_count < limit)
}

/// Discount granted by a coupon on an order of `amount`.
///
/// Fixed coupons are taken at face value, even when larger than the order.
pub fn coupon_discount(coupon: &Coupon, amount: Decimal) -> Decimal {
    match coupon.discount_type {
        DiscountType::Percentage => {
            let discount = (amount * coupon.discount_value / Decimal::ONE_HUNDRED).round_dp(2);
            match coupon.max_discount {
                Some(cap) => discount.min(cap),
                None => discount,
            }
        }
        DiscountType::Fixed => coupon.discount_value,
    }
}

/// Price a booking of `total_days` days.
///
/// Inactive extras are skipped and an extra listed twice is billed once. A coupon
/// that does not apply at `now` contributes nothing. The total is not clamped:
/// a fixed coupon above the order value yields a negative total.
pub fn price_booking(
    daily_rate: Decimal,
    deposit: Decimal,
    total_days: i64,
    extras: &[Extra],
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> PriceBreakdown {
    let days = Decimal::from(total_days);
    let subtotal = daily_rate * days;

    let mut seen = HashSet::new();
    let charges: Vec<ExtraCharge> = extras
        .iter()
        .filter(|e| e.is_active && seen.insert(e.id))
        .map(|e| ExtraCharge {
            extra_id: e.id,
            price_per_day: e.price_per_day,
            total_price: e.price_per_day * days,
        })
        .collect();
    let extras_total: Decimal = charges.iter().map(|c| c.total_price).sum();

    let coupon = coupon.filter(|c| coupon_applies(c, now));
    let discount = coupon
        .map(|c| coupon_discount(c, subtotal + extras_total))
        .unwrap_or(Decimal::ZERO);

    PriceBreakdown {
        total_days,
        daily_rate,
        subtotal,
        extras: charges,
        extras_total,
        discount,
        total_amount: subtotal + extras_total - discount,
        deposit_amount: deposit,
        coupon_id: coupon.map(|c| c.id),
    }
}
