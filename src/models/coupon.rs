//! Discount coupons

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::DiscountType;

/// Coupon record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent for PERCENTAGE coupons, SYP for FIXED ones
    pub discount_value: Decimal,
    /// Cap on the computed percentage discount
    pub max_discount: Option<Decimal>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// No limit when absent
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
}
