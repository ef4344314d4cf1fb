//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{
            Booking, BookingExtraLine, BookingQuery, CreateBookingRequest, VehicleConditionRequest,
        },
        BookingStatus, PageRequest,
    },
    rental::{BlockingBooking, BookingWindow, ExtraCharge, PriceBreakdown},
};

/// Everything needed to insert a booking row
pub struct NewBooking<'a> {
    pub booking_number: &'a str,
    pub user_id: Uuid,
    pub request: &'a CreateBookingRequest,
    pub price: &'a PriceBreakdown,
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Bookings of a car that hold it and overlap `window`
    pub async fn blocking_for_car<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        car_id: Uuid,
        window: &BookingWindow,
    ) -> AppResult<Vec<BlockingBooking>> {
        let rows = sqlx::query_as::<_, BlockingBooking>(
            r#"
            SELECT id, start_date, end_date
            FROM bookings
            WHERE car_id = $1
              AND status IN ('PENDING', 'CONFIRMED', 'ACTIVE')
              AND start_date < $3
              AND end_date > $2
            ORDER BY end_date DESC
            "#,
        )
        .bind(car_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Insert a booking.
    ///
    /// Returns `None` when the booking number is already taken so the caller can
    /// retry with a fresh one.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new: NewBooking<'_>,
    ) -> AppResult<Option<Booking>> {
        let req = new.request;
        let price = new.price;
        let total_days = i32::try_from(price.total_days)
            .map_err(|_| AppError::invalid_field("endDate", "Rental period is too long"))?;

        let row = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, booking_number, user_id, car_id, start_date, end_date,
                                  pickup_location, return_location, status, daily_rate, total_days,
                                  subtotal, extras_total, discount, total_amount, deposit_amount,
                                  coupon_id, customer_notes, driver_name, driver_license,
                                  driver_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21)
            ON CONFLICT (booking_number) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.booking_number)
        .bind(new.user_id)
        .bind(req.car_id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.pickup_location.trim())
        .bind(req.return_location.trim())
        .bind(BookingStatus::Pending)
        .bind(price.daily_rate)
        .bind(total_days)
        .bind(price.subtotal)
        .bind(price.extras_total)
        .bind(price.discount)
        .bind(price.total_amount)
        .bind(price.deposit_amount)
        .bind(price.coupon_id)
        .bind(&req.customer_notes)
        .bind(&req.driver_name)
        .bind(&req.driver_license)
        .bind(&req.driver_phone)
        .fetch_optional(conn)
        .await?;
        Ok(row)
    }

    /// Attach priced extras to a booking
    pub async fn insert_extras(
        &self,
        conn: &mut PgConnection,
        booking_id: Uuid,
        extras: &[ExtraCharge],
    ) -> AppResult<()> {
        for extra in extras {
            sqlx::query(
                r#"
                INSERT INTO booking_extras
                    (id, booking_id, extra_id, quantity, price_per_day, total_price)
                VALUES ($1, $2, $3, 1, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(booking_id)
            .bind(extra.extra_id)
            .bind(extra.price_per_day)
            .bind(extra.total_price)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Extras lines of a booking with their names
    pub async fn extras_for<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        booking_id: Uuid,
    ) -> AppResult<Vec<BookingExtraLine>> {
        let rows = sqlx::query_as::<_, BookingExtraLine>(
            r#"
            SELECT be.id, be.extra_id, e.name_ar, e.name_en, be.quantity,
                   be.price_per_day, be.total_price
            FROM booking_extras be
            JOIN extras e ON e.id = be.extra_id
            WHERE be.booking_id = $1
            ORDER BY e.name_en
            "#,
        )
        .bind(booking_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Read a booking and lock it until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Bookings of one user, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// All bookings with filters, sorting and pagination
    pub async fn list(
        &self,
        query: &BookingQuery,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, i64)> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        let search = query
            .search
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        if status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if search.is_some() {
            conditions.push(format!("booking_number ILIKE ${}", idx));
            idx += 1;
        }
        if query.start_date.is_some() {
            conditions.push(format!("created_at >= ${}", idx));
            idx += 1;
        }
        if query.end_date.is_some() {
            conditions.push(format!("created_at <= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM bookings {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(s) = status {
            count_builder = count_builder.bind(s);
        }
        if let Some(ref s) = search {
            count_builder = count_builder.bind(s);
        }
        if let Some(d) = query.start_date {
            count_builder = count_builder.bind(d);
        }
        if let Some(d) = query.end_date {
            count_builder = count_builder.bind(d);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Sort column and direction come from a fixed whitelist
        let select_q = format!(
            "SELECT * FROM bookings {} ORDER BY {} {}, id LIMIT {} OFFSET {}",
            where_clause,
            query.sort_column(),
            query.sort_direction(),
            page.limit,
            page.offset()
        );
        let mut builder = sqlx::query_as::<_, Booking>(&select_q);
        if let Some(s) = status {
            builder = builder.bind(s);
        }
        if let Some(ref s) = search {
            builder = builder.bind(s);
        }
        if let Some(d) = query.start_date {
            builder = builder.bind(d);
        }
        if let Some(d) = query.end_date {
            builder = builder.bind(d);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// PENDING -> CONFIRMED
    pub async fn mark_confirmed(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, confirmed_at = $2, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(BookingStatus::Confirmed)
        .bind(at)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// Any cancellable status -> CANCELLED
    pub async fn mark_cancelled(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, cancelled_at = $2, cancel_reason = $3, updated_at = $2
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(BookingStatus::Cancelled)
        .bind(at)
        .bind(reason)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// CONFIRMED -> ACTIVE with the pickup inspection
    pub async fn record_pickup(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        inspection: &VehicleConditionRequest,
        at: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, pickup_mileage = $2, pickup_fuel = $3, pickup_condition = $4,
                pickup_photos = $5, updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(BookingStatus::Active)
        .bind(inspection.mileage)
        .bind(inspection.fuel)
        .bind(&inspection.condition)
        .bind(&inspection.photos)
        .bind(at)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// ACTIVE -> COMPLETED with the return inspection
    pub async fn record_return(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        inspection: &VehicleConditionRequest,
        at: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, return_mileage = $2, return_fuel = $3, return_condition = $4,
                return_photos = $5, actual_return_date = $6, updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(BookingStatus::Completed)
        .bind(inspection.mileage)
        .bind(inspection.fuel)
        .bind(&inspection.condition)
        .bind(&inspection.photos)
        .bind(at)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }
}
