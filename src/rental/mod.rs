//! Booking rules: availability, pricing and the status lifecycle.
//!
//! Everything here is free of I/O so the services can run it inside a
//! database transaction and the rules can be unit tested directly.

pub mod availability;
pub mod lifecycle;
pub mod pricing;

pub use availability::{
    Availability, AvailabilityResponse, BlockingBooking, BookingWindow, PriceQuote,
};
pub use lifecycle::BookingAction;
pub use pricing::{price_booking, rental_days, ExtraCharge, PriceBreakdown};
