//! Repository layer for database operations

pub mod bookings;
pub mod cars;
pub mod coupons;
pub mod extras;
pub mod notifications;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub cars: cars::CarsRepository,
    pub bookings: bookings::BookingsRepository,
    pub extras: extras::ExtrasRepository,
    pub coupons: coupons::CouponsRepository,
    pub notifications: notifications::NotificationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            cars: cars::CarsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            extras: extras::ExtrasRepository::new(pool.clone()),
            coupons: coupons::CouponsRepository,
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
