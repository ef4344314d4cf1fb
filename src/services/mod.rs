//! Business logic services

pub mod bookings;
pub mod cars;
pub mod extras;
pub mod notifications;
pub mod redis;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::NotificationIntent,
    repository::Repository,
};

/// Result of an operation together with the notifications it owes once committed
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub notifications: Vec<NotificationIntent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, notifications: Vec<NotificationIntent>) -> Self {
        Self { value, notifications }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub cars: cars::CarsService,
    pub bookings: bookings::BookingsService,
    pub extras: extras::ExtrasService,
    pub notifications: notifications::NotificationDispatcher,
    /// Token revocation list, when Redis is configured
    pub redis: Option<redis::RedisService>,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// Starts the notification worker, so it must run inside the tokio runtime.
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        redis: Option<redis::RedisService>,
    ) -> Self {
        let (notifications, _worker) = notifications::NotificationDispatcher::spawn(
            Arc::new(repository.notifications.clone()),
            config.notifications.queue_capacity,
        );

        Self {
            cars: cars::CarsService::new(repository.clone(), config.pagination.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), config.pagination.clone()),
            extras: extras::ExtrasService::new(repository.clone()),
            notifications,
            redis,
            repository,
        }
    }

    /// Check that the database (and Redis, when used) answer
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await?;
        if let Some(redis) = &self.redis {
            redis.ping().await?;
        }
        Ok(())
    }
}
