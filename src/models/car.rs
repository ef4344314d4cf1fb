//! Car (fleet vehicle) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{CarCategory, CarStatus, FuelType, Transmission};
use super::{non_negative_amount, positive_amount};

/// Car record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub category: CarCategory,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub seats: i32,
    /// Daily rental rate (SYP)
    pub price_per_day: Decimal,
    /// Refundable deposit held for each booking (SYP)
    pub deposit: Decimal,
    /// Odometer reading in km
    pub mileage: i32,
    pub status: CarStatus,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create car request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCar {
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    #[validate(length(min = 1, message = "License plate is required"))]
    pub license_plate: String,
    pub category: CarCategory,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    #[validate(range(min = 2, max = 12, message = "Seats must be between 2 and 12"))]
    pub seats: i32,
    #[validate(custom(function = "positive_amount"))]
    pub price_per_day: Decimal,
    #[validate(custom(function = "non_negative_amount"))]
    pub deposit: Option<Decimal>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: Option<i32>,
    pub status: Option<CarStatus>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Update car request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCar {
    #[validate(length(min = 1, message = "Brand cannot be empty"))]
    pub brand: Option<String>,
    #[validate(length(min = 1, message = "Model cannot be empty"))]
    pub model: Option<String>,
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: Option<i32>,
    pub color: Option<String>,
    #[validate(length(min = 1, message = "License plate cannot be empty"))]
    pub license_plate: Option<String>,
    pub category: Option<CarCategory>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    #[validate(range(min = 2, max = 12, message = "Seats must be between 2 and 12"))]
    pub seats: Option<i32>,
    #[validate(custom(function = "positive_amount"))]
    pub price_per_day: Option<Decimal>,
    #[validate(custom(function = "non_negative_amount"))]
    pub deposit: Option<Decimal>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: Option<i32>,
    pub status: Option<CarStatus>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Change car status request (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCarStatus {
    pub status: CarStatus,
}

/// Query parameters for the public car catalogue
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct CarQuery {
    /// Matches brand, model or license plate
    pub search: Option<String>,
    pub category: Option<CarCategory>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub status: Option<CarStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub seats: Option<i32>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
}

/// Query parameters for searching cars free over a period
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AvailableCarsQuery {
    pub pickup_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub category: Option<CarCategory>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for the featured cars strip
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FeaturedCarsQuery {
    /// Number of cars to return (default 8)
    pub limit: Option<i64>,
}

/// Car category with the number of active cars in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CarCategory,
    pub name_ar: String,
    pub name_en: String,
    pub count: i64,
}

impl CategorySummary {
    /// One entry per category, in catalogue order; categories without cars count 0
    pub fn from_counts(counts: &[(CarCategory, i64)]) -> Vec<CategorySummary> {
        CarCategory::ALL
            .iter()
            .map(|&category| {
                let (name_ar, name_en) = category.names();
                let count = counts
                    .iter()
                    .find(|(c, _)| *c == category)
                    .map_or(0, |(_, n)| *n);
                CategorySummary {
                    id: category,
                    name_ar: name_ar.to_string(),
                    name_en: name_en.to_string(),
                    count,
                }
            })
            .collect()
    }
}

/// Availability check request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_summaries_cover_every_category() {
        let counts = vec![(CarCategory::Suv, 3), (CarCategory::Economy, 7)];
        let summaries = CategorySummary::from_counts(&counts);

        assert_eq!(summaries.len(), CarCategory::ALL.len());
        assert_eq!(summaries[0].id, CarCategory::Economy);
        assert_eq!(summaries[0].count, 7);

        let suv = summaries.iter().find(|s| s.id == CarCategory::Suv).unwrap();
        assert_eq!(suv.count, 3);
        assert_eq!(suv.name_en, "SUV");
        assert_eq!(suv.name_ar, "دفع رباعي");

        let empty = summaries.iter().filter(|s| s.count == 0).count();
        assert_eq!(empty, CarCategory::ALL.len() - 2);
    }

    #[test]
    fn test_category_summary_serializes_camel_case() {
        let summaries = CategorySummary::from_counts(&[]);
        let value = serde_json::to_value(&summaries[4]).unwrap();
        assert_eq!(value["id"], "LUXURY");
        assert_eq!(value["nameEn"], "Luxury");
        assert_eq!(value["nameAr"], "فاخرة");
        assert_eq!(value["count"], 0);
    }
}
