//! Booking model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::BookingStatus;
use crate::error::{AppError, AppResult};

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    /// Human readable reference, e.g. `BK26100427`
    pub booking_number: String,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pickup_location: String,
    pub return_location: String,
    pub status: BookingStatus,
    /// Car daily rate at booking time
    pub daily_rate: Decimal,
    pub total_days: i32,
    pub subtotal: Decimal,
    pub extras_total: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    /// Car deposit at booking time
    pub deposit_amount: Decimal,
    pub coupon_id: Option<Uuid>,
    pub customer_notes: Option<String>,
    pub driver_name: Option<String>,
    pub driver_license: Option<String>,
    pub driver_phone: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub pickup_mileage: Option<i32>,
    pub pickup_fuel: Option<i32>,
    pub pickup_condition: Option<String>,
    pub pickup_photos: Vec<String>,
    pub return_mileage: Option<i32>,
    pub return_fuel: Option<i32>,
    pub return_condition: Option<String>,
    pub return_photos: Vec<String>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Extra attached to a booking, joined with its catalogue names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingExtraLine {
    pub id: Uuid,
    pub extra_id: Uuid,
    pub name_ar: String,
    pub name_en: String,
    pub quantity: i32,
    pub price_per_day: Decimal,
    pub total_price: Decimal,
}

/// Booking with its extras
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub extras: Vec<BookingExtraLine>,
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Pickup location is required"))]
    pub pickup_location: String,
    #[validate(length(min = 1, message = "Return location is required"))]
    pub return_location: String,
    /// Requested extra ids; unknown or inactive ids are ignored
    #[serde(default)]
    pub extras: Vec<Uuid>,
    pub coupon_code: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub customer_notes: Option<String>,
    pub driver_name: Option<String>,
    pub driver_license: Option<String>,
    pub driver_phone: Option<String>,
}

impl CreateBookingRequest {
    /// Field validation plus the date ordering rule
    pub fn validate_request(&self) -> AppResult<()> {
        self.validate()?;
        if self.end_date <= self.start_date {
            return Err(AppError::invalid_field(
                "endDate",
                "End date must be after start date",
            ));
        }
        Ok(())
    }
}

/// Cancel booking request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters"))]
    pub reason: Option<String>,
}

/// Reject booking request (admin)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RejectBookingRequest {
    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters"))]
    pub reason: Option<String>,
}

/// Which end of the rental a vehicle inspection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InspectionType {
    Pickup,
    Return,
}

/// Vehicle inspection recorded at pickup or return
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VehicleConditionRequest {
    /// Optional; must match the endpoint when given
    #[serde(rename = "type")]
    pub inspection: Option<InspectionType>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: i32,
    #[validate(range(min = 0, max = 100, message = "Fuel level must be between 0 and 100"))]
    pub fuel: i32,
    pub condition: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl VehicleConditionRequest {
    pub fn validate_for(&self, expected: InspectionType) -> AppResult<()> {
        self.validate()?;
        match self.inspection {
            Some(kind) if kind != expected => Err(AppError::invalid_field(
                "type",
                "Inspection type does not match this operation",
            )),
            _ => Ok(()),
        }
    }
}

/// Query parameters for the caller's own bookings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyBookingsQuery {
    /// Status filter; `all` or absent means every status
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl MyBookingsQuery {
    pub fn status_filter(&self) -> AppResult<Option<BookingStatus>> {
        parse_status_filter(self.status.as_deref())
    }
}

/// Query parameters for the admin booking list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct BookingQuery {
    pub status: Option<String>,
    /// Case-insensitive match on booking number
    pub search: Option<String>,
    /// Lower bound on creation time
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound on creation time
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// createdAt, startDate, endDate, totalAmount or status
    pub sort_by: Option<String>,
    /// asc or desc
    pub sort_order: Option<String>,
}

impl BookingQuery {
    pub fn status_filter(&self) -> AppResult<Option<BookingStatus>> {
        parse_status_filter(self.status.as_deref())
    }

    /// Sort column, falling back to creation time for unknown names
    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some("startDate") | Some("start_date") => "start_date",
            Some("endDate") | Some("end_date") => "end_date",
            Some("totalAmount") | Some("total_amount") => "total_amount",
            Some("status") => "status",
            _ => "created_at",
        }
    }

    pub fn sort_direction(&self) -> &'static str {
        match self.sort_order.as_deref() {
            Some(o) if o.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        }
    }
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<BookingStatus>> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| {
                AppError::invalid_field("status", &format!("Unknown booking status: {}", s))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(start_day: u32, end_day: u32) -> CreateBookingRequest {
        CreateBookingRequest {
            car_id: Uuid::new_v4(),
            start_date: Utc.with_ymd_and_hms(2026, 1, start_day, 10, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 1, end_day, 10, 0, 0).unwrap(),
            pickup_location: "Damascus Airport".to_string(),
            return_location: "Damascus Airport".to_string(),
            extras: vec![],
            coupon_code: None,
            customer_notes: None,
            driver_name: None,
            driver_license: None,
            driver_phone: None,
        }
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(request(10, 12).validate_request().is_ok());

        for (start, end) in [(12, 10), (10, 10)] {
            match request(start, end).validate_request() {
                Err(AppError::Validation { errors, .. }) => assert_eq!(errors[0].field, "endDate"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_create_request_field_names() {
        let json = serde_json::json!({
            "carId": Uuid::new_v4(),
            "startDate": "2026-01-10T10:00:00Z",
            "endDate": "2026-01-12T10:00:00Z",
            "pickupLocation": "Aleppo",
            "returnLocation": "Homs",
            "couponCode": "WELCOME10"
        });
        let req: CreateBookingRequest = serde_json::from_value(json).unwrap();
        assert!(req.extras.is_empty());
        assert_eq!(req.coupon_code.as_deref(), Some("WELCOME10"));
    }

    #[test]
    fn test_empty_location_rejected() {
        let mut req = request(10, 12);
        req.pickup_location.clear();
        match req.validate_request() {
            Err(AppError::Validation { errors, .. }) => {
                assert_eq!(errors[0].field, "pickupLocation")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_vehicle_condition_rules() {
        let json = serde_json::json!({ "type": "pickup", "mileage": 1200, "fuel": 80 });
        let cond: VehicleConditionRequest = serde_json::from_value(json).unwrap();
        assert!(cond.validate_for(InspectionType::Pickup).is_ok());
        assert!(cond.validate_for(InspectionType::Return).is_err());

        let json = serde_json::json!({ "mileage": 1200, "fuel": 101 });
        let cond: VehicleConditionRequest = serde_json::from_value(json).unwrap();
        assert!(cond.photos.is_empty());
        assert!(cond.validate_for(InspectionType::Return).is_err());

        let json = serde_json::json!({ "mileage": -1, "fuel": 50 });
        let cond: VehicleConditionRequest = serde_json::from_value(json).unwrap();
        assert!(cond.validate_for(InspectionType::Return).is_err());
    }

    #[test]
    fn test_status_filter() {
        let q = MyBookingsQuery {
            status: Some("all".into()),
            ..Default::default()
        };
        assert_eq!(q.status_filter().unwrap(), None);

        let q = MyBookingsQuery {
            status: Some("confirmed".into()),
            ..Default::default()
        };
        assert_eq!(q.status_filter().unwrap(), Some(BookingStatus::Confirmed));

        let q = MyBookingsQuery {
            status: Some("parked".into()),
            ..Default::default()
        };
        assert!(q.status_filter().is_err());
    }

    #[test]
    fn test_sort_whitelist() {
        let q = BookingQuery {
            sort_by: Some("totalAmount".into()),
            sort_order: Some("ASC".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_column(), "total_amount");
        assert_eq!(q.sort_direction(), "ASC");

        let q = BookingQuery {
            sort_by: Some("password; DROP TABLE bookings".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_column(), "created_at");
        assert_eq!(q.sort_direction(), "DESC");
    }
}
