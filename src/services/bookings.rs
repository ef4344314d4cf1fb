//! Booking lifecycle service
//!
//! Each operation runs in one database transaction. Booking creation locks the
//! car row so the overlap check and the insert cannot interleave with another
//! request for the same car; transitions lock the booking row.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{
        booking::{
            Booking, BookingDetails, BookingQuery, CreateBookingRequest, InspectionType,
            MyBookingsQuery, VehicleConditionRequest,
        },
        PageRequest, Pagination, UserClaims,
    },
    rental::{
        availability,
        lifecycle::{self, BookingAction},
        pricing::price_booking,
        BookingWindow,
    },
    repository::{bookings::NewBooking, Repository},
};

use super::Outcome;

/// Attempts at drawing an unused booking number
const BOOKING_NUMBER_ATTEMPTS: usize = 5;

/// `BK` + two-digit year + month + four random digits, e.g. `BK26100427`
fn booking_number_with<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    format!(
        "BK{:02}{:02}{:04}",
        now.year() % 100,
        now.month(),
        rng.gen_range(0..10_000)
    )
}

fn generate_booking_number(now: DateTime<Utc>) -> String {
    booking_number_with(now, &mut rand::thread_rng())
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl BookingsService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Create a PENDING booking after checking availability and pricing it
    pub async fn create(
        &self,
        claims: &UserClaims,
        request: CreateBookingRequest,
    ) -> AppResult<Outcome<BookingDetails>> {
        request.validate_request()?;
        let window = BookingWindow::new(request.start_date, request.end_date)?;
        let repo = &self.repository;

        let mut tx = repo.pool.begin().await?;

        let car = repo.cars.lock(&mut tx, request.car_id).await?;
        let existing = repo.bookings.blocking_for_car(&mut *tx, car.id, &window).await?;
        let quote = availability::check(&car, &window, &existing).into_quote()?;

        let extras = repo.extras.find_active(&mut *tx, &request.extras).await?;
        let coupon = match request.coupon_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => repo.coupons.lock_by_code(&mut tx, code).await?,
            _ => None,
        };

        let now = Utc::now();
        let mut price = price_booking(
            car.price_per_day,
            car.deposit,
            quote.total_days,
            &extras,
            coupon.as_ref(),
            now,
        );
        if let Some(coupon_id) = price.coupon_id {
            if !repo.coupons.consume(&mut tx, coupon_id).await? {
                tracing::debug!(%coupon_id, "Coupon usage limit reached, pricing without it");
                price = price_booking(
                    car.price_per_day,
                    car.deposit,
                    quote.total_days,
                    &extras,
                    None,
                    now,
                );
            }
        }

        let mut inserted = None;
        for _ in 0..BOOKING_NUMBER_ATTEMPTS {
            let number = generate_booking_number(now);
            let new = NewBooking {
                booking_number: &number,
                user_id: claims.user_id(),
                request: &request,
                price: &price,
            };
            match repo.bookings.insert(&mut tx, new).await? {
                Some(booking) => {
                    inserted = Some(booking);
                    break;
                }
                None => tracing::debug!(
                    booking_number = %number,
                    "Booking number taken, drawing another"
                ),
            }
        }
        let booking = inserted
            .ok_or_else(|| AppError::Internal("Could not allocate a booking number".to_string()))?;

        repo.bookings.insert_extras(&mut tx, booking.id, &price.extras).await?;
        let extras = repo.bookings.extras_for(&mut *tx, booking.id).await?;

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            booking_number = %booking.booking_number,
            car_id = %booking.car_id,
            user_id = %booking.user_id,
            total = %booking.total_amount,
            "Booking created"
        );

        let notification = lifecycle::created_notification(&booking);
        Ok(Outcome::new(
            BookingDetails { booking, extras },
            vec![notification],
        ))
    }

    /// Booking with its extras; owner or admin only
    pub async fn get(&self, id: Uuid, claims: &UserClaims) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(id).await?;
        lifecycle::authorize_owner(booking.user_id, claims)?;
        let extras = self
            .repository
            .bookings
            .extras_for(&self.repository.pool, id)
            .await?;
        Ok(BookingDetails { booking, extras })
    }

    /// The caller's bookings, newest first
    pub async fn list_mine(
        &self,
        claims: &UserClaims,
        query: &MyBookingsQuery,
    ) -> AppResult<(Vec<Booking>, Pagination)> {
        let status = query.status_filter()?;
        let page = PageRequest::new(query.page, query.limit, self.pagination.default_limit);
        let (bookings, total) = self
            .repository
            .bookings
            .list_for_user(claims.user_id(), status, page)
            .await?;
        Ok((bookings, Pagination::new(page, total)))
    }

    /// All bookings (admin back-office)
    pub async fn list_all(&self, query: &BookingQuery) -> AppResult<(Vec<Booking>, Pagination)> {
        let status = query.status_filter()?;
        let page = PageRequest::new(query.page, query.limit, self.pagination.admin_default_limit);
        let (bookings, total) = self.repository.bookings.list(query, status, page).await?;
        Ok((bookings, Pagination::new(page, total)))
    }

    pub async fn confirm(&self, id: Uuid) -> AppResult<Outcome<Booking>> {
        let action = BookingAction::Confirm;
        let mut tx = self.repository.pool.begin().await?;

        let current = self.repository.bookings.lock(&mut tx, id).await?;
        action.ensure_allowed(current.status)?;
        let booking = self
            .repository
            .bookings
            .mark_confirmed(&mut tx, id, Utc::now())
            .await?;

        tx.commit().await?;
        Ok(self.finish(action, booking))
    }

    pub async fn reject(
        &self,
        id: Uuid,
        claims: &UserClaims,
        reason: Option<String>,
    ) -> AppResult<Outcome<Booking>> {
        let action = BookingAction::Reject;
        let mut tx = self.repository.pool.begin().await?;

        let current = self.repository.bookings.lock(&mut tx, id).await?;
        action.ensure_allowed(current.status)?;
        let reason = lifecycle::cancel_reason(action, current.user_id, claims, reason);
        let booking = self
            .repository
            .bookings
            .mark_cancelled(&mut tx, id, &reason, Utc::now())
            .await?;

        tx.commit().await?;
        Ok(self.finish(action, booking))
    }

    /// Cancel by the owner, or by an administrator on anyone's booking
    pub async fn cancel(
        &self,
        id: Uuid,
        claims: &UserClaims,
        reason: Option<String>,
    ) -> AppResult<Outcome<Booking>> {
        let action = BookingAction::Cancel;
        let mut tx = self.repository.pool.begin().await?;

        let current = self.repository.bookings.lock(&mut tx, id).await?;
        lifecycle::authorize_owner(current.user_id, claims)?;
        action.ensure_allowed(current.status)?;
        let reason = lifecycle::cancel_reason(action, current.user_id, claims, reason);
        let booking = self
            .repository
            .bookings
            .mark_cancelled(&mut tx, id, &reason, Utc::now())
            .await?;

        tx.commit().await?;
        Ok(self.finish(action, booking))
    }

    /// Hand the car over: records the pickup inspection and marks the car RENTED
    pub async fn activate(
        &self,
        id: Uuid,
        inspection: VehicleConditionRequest,
    ) -> AppResult<Outcome<Booking>> {
        inspection.validate_for(InspectionType::Pickup)?;
        let action = BookingAction::Activate;
        let mut tx = self.repository.pool.begin().await?;

        let current = self.repository.bookings.lock(&mut tx, id).await?;
        action.ensure_allowed(current.status)?;
        let booking = self
            .repository
            .bookings
            .record_pickup(&mut tx, id, &inspection, Utc::now())
            .await?;
        if let Some(status) = action.car_status() {
            self.repository
                .cars
                .set_status_in(&mut tx, booking.car_id, status, None)
                .await?;
        }

        tx.commit().await?;
        Ok(self.finish(action, booking))
    }

    /// Take the car back: records the return inspection and frees the car
    pub async fn complete(
        &self,
        id: Uuid,
        inspection: VehicleConditionRequest,
    ) -> AppResult<Outcome<Booking>> {
        inspection.validate_for(InspectionType::Return)?;
        let action = BookingAction::Complete;
        let mut tx = self.repository.pool.begin().await?;

        let current = self.repository.bookings.lock(&mut tx, id).await?;
        action.ensure_allowed(current.status)?;
        let booking = self
            .repository
            .bookings
            .record_return(&mut tx, id, &inspection, Utc::now())
            .await?;
        if let Some(status) = action.car_status() {
            self.repository
                .cars
                .set_status_in(&mut tx, booking.car_id, status, Some(inspection.mileage))
                .await?;
        }

        tx.commit().await?;
        Ok(self.finish(action, booking))
    }

    fn finish(&self, action: BookingAction, booking: Booking) -> Outcome<Booking> {
        tracing::info!(
            booking_id = %booking.id,
            booking_number = %booking.booking_number,
            status = %booking.status,
            action = action.verb(),
            "Booking status changed"
        );
        let notifications = action.notifications(&booking);
        Outcome::new(booking, notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_booking_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let number = booking_number_with(now, &mut rng);
            assert_eq!(number.len(), 10);
            assert!(number.starts_with("BK2603"));
            assert!(number[6..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
