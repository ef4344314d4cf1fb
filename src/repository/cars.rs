//! Cars repository for database operations

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        car::{AvailableCarsQuery, Car, CarQuery, CreateCar, UpdateCar},
        CarCategory, CarStatus, PageRequest,
    },
};

#[derive(Clone)]
pub struct CarsRepository {
    pool: Pool<Postgres>,
}

impl CarsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List active cars with optional filters and pagination
    pub async fn list(&self, query: &CarQuery, page: PageRequest) -> AppResult<(Vec<Car>, i64)> {
        let mut conditions = vec!["is_active = TRUE".to_string()];
        let mut idx = 1;

        let search = query.search.as_ref().map(|s| format!("%{}%", s.trim()));

        if search.is_some() {
            conditions.push(format!(
                "(brand ILIKE ${0} OR model ILIKE ${0} OR license_plate ILIKE ${0})",
                idx
            ));
            idx += 1;
        }
        if query.category.is_some() {
            conditions.push(format!("category = ${}", idx));
            idx += 1;
        }
        if query.transmission.is_some() {
            conditions.push(format!("transmission = ${}", idx));
            idx += 1;
        }
        if query.fuel_type.is_some() {
            conditions.push(format!("fuel_type = ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if query.min_price.is_some() {
            conditions.push(format!("price_per_day >= ${}", idx));
            idx += 1;
        }
        if query.max_price.is_some() {
            conditions.push(format!("price_per_day <= ${}", idx));
            idx += 1;
        }
        if query.seats.is_some() {
            conditions.push(format!("seats >= ${}", idx));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        macro_rules! bind_filters {
            ($builder:ident) => {
                if let Some(ref s) = search {
                    $builder = $builder.bind(s);
                }
                if let Some(c) = query.category {
                    $builder = $builder.bind(c);
                }
                if let Some(t) = query.transmission {
                    $builder = $builder.bind(t);
                }
                if let Some(f) = query.fuel_type {
                    $builder = $builder.bind(f);
                }
                if let Some(s) = query.status {
                    $builder = $builder.bind(s);
                }
                if let Some(p) = query.min_price {
                    $builder = $builder.bind(p);
                }
                if let Some(p) = query.max_price {
                    $builder = $builder.bind(p);
                }
                if let Some(n) = query.seats {
                    $builder = $builder.bind(n);
                }
            };
        }

        let count_q = format!("SELECT COUNT(*) FROM cars {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        bind_filters!(count_builder);
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM cars {} ORDER BY is_featured DESC, created_at DESC LIMIT {} OFFSET {}",
            where_clause,
            page.limit,
            page.offset()
        );
        let mut builder = sqlx::query_as::<_, Car>(&select_q);
        bind_filters!(builder);

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Active AVAILABLE cars with no blocking booking overlapping the period
    pub async fn list_available(
        &self,
        query: &AvailableCarsQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<Car>, i64)> {
        let where_clause = r#"
            WHERE c.is_active = TRUE
              AND c.status = 'AVAILABLE'
              AND ($3::text IS NULL OR c.category = $3)
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.car_id = c.id
                    AND b.status IN ('PENDING', 'CONFIRMED', 'ACTIVE')
                    AND b.start_date < $2
                    AND b.end_date > $1
              )
        "#;

        let category = query.category.map(|c| c.as_str());

        let count_q = format!("SELECT COUNT(*) FROM cars c {}", where_clause);
        let total = sqlx::query_scalar::<_, i64>(&count_q)
            .bind(query.pickup_date)
            .bind(query.return_date)
            .bind(category)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Car>(&format!(
            "SELECT c.* FROM cars c {} ORDER BY c.price_per_day LIMIT {} OFFSET {}",
            where_clause,
            page.limit,
            page.offset()
        ))
        .bind(query.pickup_date)
        .bind(query.return_date)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Get car by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Car> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {} not found", id)))
    }

    /// Lock the car row for the rest of the transaction.
    ///
    /// Concurrent bookings of the same car queue up behind this lock.
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Car> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {} not found", id)))
    }

    /// Create car
    pub async fn create(&self, data: &CreateCar) -> AppResult<Car> {
        let row = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, brand, model, year, color, license_plate, category, transmission,
                              fuel_type, seats, price_per_day, deposit, mileage, status,
                              is_active, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.brand.trim())
        .bind(data.model.trim())
        .bind(data.year)
        .bind(data.color.trim())
        .bind(data.license_plate.trim())
        .bind(data.category)
        .bind(data.transmission)
        .bind(data.fuel_type)
        .bind(data.seats)
        .bind(data.price_per_day)
        .bind(data.deposit.unwrap_or_default())
        .bind(data.mileage.unwrap_or(0))
        .bind(data.status.unwrap_or(CarStatus::Available))
        .bind(data.is_active.unwrap_or(true))
        .bind(data.is_featured.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update car, only touching provided fields
    pub async fn update(&self, id: Uuid, data: &UpdateCar) -> AppResult<Car> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.brand, "brand");
        add_field!(data.model, "model");
        add_field!(data.year, "year");
        add_field!(data.color, "color");
        add_field!(data.license_plate, "license_plate");
        add_field!(data.category, "category");
        add_field!(data.transmission, "transmission");
        add_field!(data.fuel_type, "fuel_type");
        add_field!(data.seats, "seats");
        add_field!(data.price_per_day, "price_per_day");
        add_field!(data.deposit, "deposit");
        add_field!(data.mileage, "mileage");
        add_field!(data.status, "status");
        add_field!(data.is_active, "is_active");
        add_field!(data.is_featured, "is_featured");

        let query = format!(
            "UPDATE cars SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Car>(&query).bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.year);
        bind_field!(data.color);
        bind_field!(data.license_plate);
        bind_field!(data.category);
        bind_field!(data.transmission);
        bind_field!(data.fuel_type);
        bind_field!(data.seats);
        bind_field!(data.price_per_day);
        bind_field!(data.deposit);
        bind_field!(data.mileage);
        bind_field!(data.status);
        bind_field!(data.is_active);
        bind_field!(data.is_featured);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {} not found", id)))
    }

    /// Set car status outside of a booking transition
    pub async fn update_status(&self, id: Uuid, status: CarStatus) -> AppResult<Car> {
        sqlx::query_as::<_, Car>(
            "UPDATE cars SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car {} not found", id)))
    }

    /// Status (and odometer on return) change made by a booking transition
    pub async fn set_status_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: CarStatus,
        mileage: Option<i32>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE cars
            SET status = $1, mileage = COALESCE($2, mileage), updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(mileage)
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Active featured cars that can be rented right now, newest first
    pub async fn list_featured(&self, limit: i64) -> AppResult<Vec<Car>> {
        let rows = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE is_active = TRUE AND is_featured = TRUE AND status = 'AVAILABLE'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active cars per category; categories without cars are absent
    pub async fn count_by_category(&self) -> AppResult<Vec<(CarCategory, i64)>> {
        let rows = sqlx::query_as::<_, (CarCategory, i64)>(
            "SELECT category, COUNT(*) FROM cars WHERE is_active = TRUE GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of CONFIRMED or ACTIVE bookings on the car
    pub async fn count_engaged_bookings(&self, id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE car_id = $1 AND status IN ('CONFIRMED', 'ACTIVE')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Delete car
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Car {} not found", id)));
        }
        Ok(())
    }
}
