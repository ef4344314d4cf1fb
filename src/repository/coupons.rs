//! Coupons repository for database operations

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{error::AppResult, models::Coupon};

/// Coupons are only read and consumed inside booking transactions
#[derive(Clone, Default)]
pub struct CouponsRepository;

impl CouponsRepository {
    /// Look up a coupon by code (case-insensitive) and lock it for the transaction
    pub async fn lock_by_code(
        &self,
        conn: &mut PgConnection,
        code: &str,
    ) -> AppResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, Coupon>(
            "SELECT * FROM coupons WHERE UPPER(code) = UPPER($1) FOR UPDATE",
        )
        .bind(code.trim())
        .fetch_optional(conn)
        .await?;
        Ok(row)
    }

    /// Count one use of the coupon if its limit allows.
    ///
    /// Returns false when the limit was already reached.
    pub async fn consume(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET used_count = used_count + 1
            WHERE id = $1 AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
