//! Extras repository for database operations

use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::Extra};

#[derive(Clone)]
pub struct ExtrasRepository {
    pool: Pool<Postgres>,
}

impl ExtrasRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active extras, for the booking form
    pub async fn list_active(&self) -> AppResult<Vec<Extra>> {
        let rows = sqlx::query_as::<_, Extra>(
            "SELECT * FROM extras WHERE is_active = TRUE ORDER BY name_en",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active extras among `ids`; unknown ids are simply absent
    pub async fn find_active<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> AppResult<Vec<Extra>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Extra>(
            "SELECT * FROM extras WHERE id = ANY($1) AND is_active = TRUE ORDER BY name_en",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
