//! Data models for the car rental server

pub mod booking;
pub mod car;
pub mod coupon;
pub mod enums;
pub mod extra;
pub mod notification;
pub mod pagination;
pub mod user;

use rust_decimal::Decimal;
use validator::ValidationError;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingExtraLine};
pub use car::Car;
pub use coupon::Coupon;
pub use enums::{
    BookingStatus, CarCategory, CarStatus, DiscountType, FuelType, NotificationKind, Transmission,
};
pub use extra::Extra;
pub use notification::{Notification, NotificationIntent};
pub use pagination::{PageRequest, Pagination};
pub use user::{UserClaims, UserRole};

/// Validator for money amounts that must be strictly positive
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive");
        err.message = Some("Amount must be greater than zero".into());
        Err(err)
    }
}

pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount cannot be negative".into());
        Err(err)
    }
}
