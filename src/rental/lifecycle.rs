//! Booking status transitions
//!
//! ```text
//! PENDING ──confirm──> CONFIRMED ──activate──> ACTIVE ──complete──> COMPLETED
//!    │                     │
//!    └─reject/cancel──> CANCELLED <──cancel──┘
//! ```

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingStatus, CarStatus, NotificationIntent, NotificationKind, UserClaims,
};

pub const DEFAULT_REJECT_REASON: &str = "Rejected by administration";
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled by customer";
pub const ADMIN_CANCEL_REASON: &str = "Cancelled by administration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Reject,
    Cancel,
    Activate,
    Complete,
}

impl BookingAction {
    pub fn verb(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
            BookingAction::Activate => "activate",
            BookingAction::Complete => "complete",
        }
    }

    /// Statuses the action may start from
    pub fn allowed_from(&self) -> &'static [BookingStatus] {
        match self {
            BookingAction::Confirm | BookingAction::Reject => &[BookingStatus::Pending],
            BookingAction::Cancel => &[BookingStatus::Pending, BookingStatus::Confirmed],
            BookingAction::Activate => &[BookingStatus::Confirmed],
            BookingAction::Complete => &[BookingStatus::Active],
        }
    }

    pub fn target(&self) -> BookingStatus {
        match self {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::Reject | BookingAction::Cancel => BookingStatus::Cancelled,
            BookingAction::Activate => BookingStatus::Active,
            BookingAction::Complete => BookingStatus::Completed,
        }
    }

    /// Fails with a state conflict naming `current` when the move is illegal
    pub fn ensure_allowed(&self, current: BookingStatus) -> AppResult<BookingStatus> {
        if self.allowed_from().contains(&current) {
            Ok(self.target())
        } else {
            Err(AppError::StateConflict(format!(
                "Cannot {} a booking in {} state",
                self.verb(),
                current
            )))
        }
    }

    /// Car status to set alongside the transition, if any
    pub fn car_status(&self) -> Option<CarStatus> {
        match self {
            BookingAction::Activate => Some(CarStatus::Rented),
            BookingAction::Complete => Some(CarStatus::Available),
            _ => None,
        }
    }

    /// Notifications owed to the customer once the transition is committed
    pub fn notifications(&self, booking: &Booking) -> Vec<NotificationIntent> {
        let notify = |kind, title: &str, message: String| {
            vec![NotificationIntent::for_booking(
                booking.user_id,
                kind,
                title,
                message,
                booking.id,
                &booking.booking_number,
            )]
        };

        match self {
            BookingAction::Confirm => notify(
                NotificationKind::BookingConfirmed,
                "Booking confirmed",
                format!("Your booking {} has been confirmed", booking.booking_number),
            ),
            BookingAction::Reject | BookingAction::Cancel => {
                let reason = booking.cancel_reason.as_deref().unwrap_or(DEFAULT_CANCEL_REASON);
                notify(
                    NotificationKind::BookingCancelled,
                    "Booking cancelled",
                    format!("Your booking {} was cancelled: {}", booking.booking_number, reason),
                )
            }
            BookingAction::Complete => notify(
                NotificationKind::ReviewRequest,
                "How was your trip?",
                format!(
                    "Booking {} is complete. Tell us about your experience",
                    booking.booking_number
                ),
            ),
            BookingAction::Activate => Vec::new(),
        }
    }
}

/// Notification sent when a booking request is received
pub fn created_notification(booking: &Booking) -> NotificationIntent {
    NotificationIntent::for_booking(
        booking.user_id,
        NotificationKind::BookingConfirmed,
        "Booking request received",
        format!(
            "We received your booking {}. It is awaiting confirmation",
            booking.booking_number
        ),
        booking.id,
        &booking.booking_number,
    )
}

/// Only the owner or an administrator may see or act on a booking
pub fn authorize_owner(owner: Uuid, claims: &UserClaims) -> AppResult<()> {
    if owner == claims.user_id() || claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You are not allowed to access this booking".to_string(),
        ))
    }
}

/// Reason stored on a cancelled booking
pub fn cancel_reason(
    action: BookingAction,
    owner: Uuid,
    claims: &UserClaims,
    requested: Option<String>,
) -> String {
    let requested = requested.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    match (action, requested) {
        (_, Some(reason)) => reason,
        (BookingAction::Reject, None) => DEFAULT_REJECT_REASON.to_string(),
        (_, None) if claims.is_admin() && owner != claims.user_id() => {
            ADMIN_CANCEL_REASON.to_string()
        }
        _ => DEFAULT_CANCEL_REASON.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Utc;
    use rust_decimal::Decimal;

    const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    const ACTIONS: [BookingAction; 5] = [
        BookingAction::Confirm,
        BookingAction::Reject,
        BookingAction::Cancel,
        BookingAction::Activate,
        BookingAction::Complete,
    ];

    fn claims(sub: Uuid, role: UserRole) -> UserClaims {
        UserClaims {
            sub,
            email: "user@example.sy".to_string(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    fn booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            booking_number: "BK26010042".to_string(),
            user_id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            start_date: now,
            end_date: now,
            pickup_location: "Damascus".to_string(),
            return_location: "Damascus".to_string(),
            status,
            daily_rate: Decimal::from(100000),
            total_days: 2,
            subtotal: Decimal::from(200000),
            extras_total: Decimal::ZERO,
            discount: Decimal::ZERO,
            total_amount: Decimal::from(200000),
            deposit_amount: Decimal::from(50000),
            coupon_id: None,
            customer_notes: None,
            driver_name: None,
            driver_license: None,
            driver_phone: None,
            confirmed_at: None,
            cancelled_at: None,
            cancel_reason: None,
            pickup_mileage: None,
            pickup_fuel: None,
            pickup_condition: None,
            pickup_photos: vec![],
            return_mileage: None,
            return_fuel: None,
            return_condition: None,
            return_photos: vec![],
            actual_return_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_transition_table() {
        let allowed = |a: BookingAction, s: BookingStatus| a.ensure_allowed(s).is_ok();

        assert!(allowed(BookingAction::Confirm, BookingStatus::Pending));
        assert!(allowed(BookingAction::Reject, BookingStatus::Pending));
        assert!(allowed(BookingAction::Cancel, BookingStatus::Pending));
        assert!(allowed(BookingAction::Cancel, BookingStatus::Confirmed));
        assert!(allowed(BookingAction::Activate, BookingStatus::Confirmed));
        assert!(allowed(BookingAction::Complete, BookingStatus::Active));

        assert!(!allowed(BookingAction::Activate, BookingStatus::Pending));
        assert!(!allowed(BookingAction::Cancel, BookingStatus::Completed));
        assert!(!allowed(BookingAction::Cancel, BookingStatus::Active));
        assert!(!allowed(BookingAction::Complete, BookingStatus::Confirmed));
    }

    #[test]
    fn test_terminal_statuses_reject_every_action() {
        for status in ALL.into_iter().filter(BookingStatus::is_terminal) {
            for action in ACTIONS {
                assert!(action.ensure_allowed(status).is_err(), "{action:?} from {status}");
            }
        }
    }

    #[test]
    fn test_conflict_names_current_state() {
        match BookingAction::Activate.ensure_allowed(BookingStatus::Pending) {
            Err(AppError::StateConflict(msg)) => {
                assert_eq!(msg, "Cannot activate a booking in PENDING state")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_car_side_effects() {
        assert_eq!(BookingAction::Activate.car_status(), Some(CarStatus::Rented));
        assert_eq!(BookingAction::Complete.car_status(), Some(CarStatus::Available));
        assert_eq!(BookingAction::Confirm.car_status(), None);
        assert_eq!(BookingAction::Cancel.car_status(), None);
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = Uuid::new_v4();
        assert!(authorize_owner(owner, &claims(owner, UserRole::Customer)).is_ok());
        assert!(authorize_owner(owner, &claims(Uuid::new_v4(), UserRole::Admin)).is_ok());
        assert!(matches!(
            authorize_owner(owner, &claims(Uuid::new_v4(), UserRole::Customer)),
            Err(AppError::Authorization(_))
        ));
        assert!(authorize_owner(owner, &claims(Uuid::new_v4(), UserRole::Employee)).is_err());
    }

    #[test]
    fn test_cancel_reasons() {
        let owner = Uuid::new_v4();
        let customer = claims(owner, UserRole::Customer);
        let admin = claims(Uuid::new_v4(), UserRole::Admin);

        assert_eq!(
            cancel_reason(BookingAction::Reject, owner, &admin, None),
            DEFAULT_REJECT_REASON
        );
        assert_eq!(
            cancel_reason(BookingAction::Cancel, owner, &customer, Some("  ".into())),
            DEFAULT_CANCEL_REASON
        );
        assert_eq!(
            cancel_reason(BookingAction::Cancel, owner, &admin, None),
            ADMIN_CANCEL_REASON
        );
        assert_eq!(
            cancel_reason(BookingAction::Cancel, owner, &customer, Some("Plans changed".into())),
            "Plans changed"
        );
    }

    #[test]
    fn test_notification_intents() {
        let mut b = booking(BookingStatus::Cancelled);
        b.cancel_reason = Some("Plans changed".into());

        let intents = BookingAction::Cancel.notifications(&b);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].user_id, b.user_id);
        assert_eq!(intents[0].kind, NotificationKind::BookingCancelled);
        assert!(intents[0].message.contains("Plans changed"));
        assert_eq!(intents[0].data["bookingId"], serde_json::json!(b.id));

        assert_eq!(
            BookingAction::Complete.notifications(&b)[0].kind,
            NotificationKind::ReviewRequest
        );
        assert!(BookingAction::Activate.notifications(&b).is_empty());
        assert_eq!(created_notification(&b).kind, NotificationKind::BookingConfirmed);
    }
}
