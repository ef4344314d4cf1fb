//! Availability decision for a car over a requested window

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::pricing::rental_days;
use crate::error::{AppError, AppResult};
use crate::models::{Car, CarStatus};

/// Requested rental window, half-open `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::invalid_field(
                "endDate",
                "End date must be after start date",
            ));
        }
        Ok(Self { start, end })
    }

    /// A window ending exactly when the other starts does not overlap it
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    pub fn days(&self) -> i64 {
        rental_days(self.start, self.end)
    }
}

/// Booking in PENDING, CONFIRMED or ACTIVE status holding a car
#[derive(Debug, Clone, FromRow)]
pub struct BlockingBooking {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Price preview returned with a positive availability answer
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub total_days: i64,
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub deposit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Car is withdrawn or its status is not AVAILABLE
    CarUnavailable,
    /// Another booking holds the car during the window
    AlreadyBooked,
}

impl UnavailableReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::CarUnavailable => "Car is currently unavailable",
            UnavailableReason::AlreadyBooked => "Car is already booked for these dates",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    Available(PriceQuote),
    Unavailable {
        reason: UnavailableReason,
        /// Latest end among the conflicting bookings
        next_available: Option<DateTime<Utc>>,
    },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    /// Turn a negative answer into the matching state-conflict error
    pub fn into_quote(self) -> AppResult<PriceQuote> {
        match self {
            Availability::Available(quote) => Ok(quote),
            Availability::Unavailable { reason, .. } => {
                Err(AppError::StateConflict(reason.message().to_string()))
            }
        }
    }
}

/// Decide whether `car` can be booked for `window` given its blocking bookings.
///
/// `existing` may contain bookings outside the window; only overlapping ones count.
pub fn check(car: &Car, window: &BookingWindow, existing: &[BlockingBooking]) -> Availability {
    if !car.is_active || car.status != CarStatus::Available {
        return Availability::Unavailable {
            reason: UnavailableReason::CarUnavailable,
            next_available: None,
        };
    }

    let next_available = existing
        .iter()
        .filter(|b| window.overlaps(b.start_date, b.end_date))
        .map(|b| b.end_date)
        .max();

    if next_available.is_some() {
        return Availability::Unavailable {
            reason: UnavailableReason::AlreadyBooked,
            next_available,
        };
    }

    let total_days = window.days();
    Availability::Available(PriceQuote {
        total_days,
        daily_rate: car.price_per_day,
        subtotal: car.price_per_day * Decimal::from(total_days),
        deposit: car.deposit,
    })
}

/// Wire form of an availability answer
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceQuote>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(a: Availability) -> Self {
        match a {
            Availability::Available(quote) => Self {
                available: true,
                reason: None,
                next_available: None,
                pricing: Some(quote),
            },
            Availability::Unavailable {
                reason,
                next_available,
            } => Self {
                available: false,
                reason: Some(reason.message().to_string()),
                next_available,
                pricing: None,
            },
        }
    }
}
