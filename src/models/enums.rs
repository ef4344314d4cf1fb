//! Shared domain enums, stored as upper-case text columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements string conversions and SQLx text mapping for a fieldless enum.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as Decode<Postgres>>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// CarStatus
// ---------------------------------------------------------------------------

/// Operational status of a car in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Available,
    Rented,
    Maintenance,
    Reserved,
    Unavailable,
}

text_enum!(CarStatus {
    Available => "AVAILABLE",
    Rented => "RENTED",
    Maintenance => "MAINTENANCE",
    Reserved => "RESERVED",
    Unavailable => "UNAVAILABLE",
});

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    NoShow,
}

text_enum!(BookingStatus {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Active => "ACTIVE",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
    NoShow => "NO_SHOW",
});

impl BookingStatus {
    /// Statuses that hold the car and block overlapping requests
    pub const BLOCKING: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Active,
    ];

    pub fn blocks_availability(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }
}

// ---------------------------------------------------------------------------
// Car attributes
// ---------------------------------------------------------------------------

/// Vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarCategory {
    Economy,
    Compact,
    Midsize,
    Fullsize,
    Luxury,
    Suv,
    Van,
    Pickup,
    Sports,
    Convertible,
}

text_enum!(CarCategory {
    Economy => "ECONOMY",
    Compact => "COMPACT",
    Midsize => "MIDSIZE",
    Fullsize => "FULLSIZE",
    Luxury => "LUXURY",
    Suv => "SUV",
    Van => "VAN",
    Pickup => "PICKUP",
    Sports => "SPORTS",
    Convertible => "CONVERTIBLE",
});

impl CarCategory {
    pub const ALL: [CarCategory; 10] = [
        CarCategory::Economy,
        CarCategory::Compact,
        CarCategory::Midsize,
        CarCategory::Fullsize,
        CarCategory::Luxury,
        CarCategory::Suv,
        CarCategory::Van,
        CarCategory::Pickup,
        CarCategory::Sports,
        CarCategory::Convertible,
    ];

    /// Display names, Arabic then English
    pub fn names(&self) -> (&'static str, &'static str) {
        match self {
            CarCategory::Economy => ("اقتصادية", "Economy"),
            CarCategory::Compact => ("صغيرة", "Compact"),
            CarCategory::Midsize => ("متوسطة", "Midsize"),
            CarCategory::Fullsize => ("كبيرة", "Fullsize"),
            CarCategory::Luxury => ("فاخرة", "Luxury"),
            CarCategory::Suv => ("دفع رباعي", "SUV"),
            CarCategory::Van => ("فان", "Van"),
            CarCategory::Pickup => ("بيك أب", "Pickup"),
            CarCategory::Sports => ("رياضية", "Sports"),
            CarCategory::Convertible => ("مكشوفة", "Convertible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transmission {
    Automatic,
    Manual,
}

text_enum!(Transmission {
    Automatic => "AUTOMATIC",
    Manual => "MANUAL",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
    Lpg,
}

text_enum!(FuelType {
    Petrol => "PETROL",
    Diesel => "DIESEL",
    Hybrid => "HYBRID",
    Electric => "ELECTRIC",
    Lpg => "LPG",
});

// ---------------------------------------------------------------------------
// DiscountType
// ---------------------------------------------------------------------------

/// How a coupon's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

text_enum!(DiscountType {
    Percentage => "PERCENTAGE",
    Fixed => "FIXED",
});

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    BookingConfirmed,
    BookingCancelled,
    BookingReminder,
    PaymentReceived,
    ReviewRequest,
    Promo,
    System,
}

text_enum!(NotificationKind {
    BookingConfirmed => "BOOKING_CONFIRMED",
    BookingCancelled => "BOOKING_CANCELLED",
    BookingReminder => "BOOKING_REMINDER",
    PaymentReceived => "PAYMENT_RECEIVED",
    ReviewRequest => "REVIEW_REQUEST",
    Promo => "PROMO",
    System => "SYSTEM",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_text() {
        assert_eq!(BookingStatus::NoShow.as_str(), "NO_SHOW");
        assert_eq!("no_show".parse::<BookingStatus>(), Ok(BookingStatus::NoShow));
        assert!("LATE".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_column_text() {
        let json = serde_json::to_string(&BookingStatus::NoShow).unwrap();
        assert_eq!(json, "\"NO_SHOW\"");
        let json = serde_json::to_string(&CarStatus::Available).unwrap();
        assert_eq!(json, "\"AVAILABLE\"");
    }

    #[test]
    fn test_blocking_statuses() {
        assert!(BookingStatus::Pending.blocks_availability());
        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(BookingStatus::Active.blocks_availability());
        assert!(!BookingStatus::Completed.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
        assert!(!BookingStatus::NoShow.blocks_availability());
    }
}
