//! Redis service for the revoked token list

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

/// Key prefix under which revoked tokens are stored
const BLACKLIST_PREFIX: &str = "blacklist:";

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let service = Self { client };
        service.ping().await?;
        Ok(service)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    /// Whether the token was revoked (logout, password change)
    pub async fn is_token_blacklisted(&self, token: &str) -> AppResult<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn
            .exists(blacklist_key(token))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to check token in Redis: {}", e)))?;
        Ok(exists)
    }
}

fn blacklist_key(token: &str) -> String {
    format!("{}{}", BLACKLIST_PREFIX, token)
}
