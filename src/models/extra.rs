//! Booking add-ons (child seat, GPS, additional driver...)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    pub id: Uuid,
    pub name_ar: String,
    pub name_en: String,
    pub description: Option<String>,
    pub price_per_day: Decimal,
    pub is_active: bool,
}
