//! Data repository - threshold query over the external `data` table
//!
//! The table is owned elsewhere; this repository only reads
//! `field1 text` and `field2 integer`.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Rows with `field2` strictly above this value are returned by default.
pub const DEFAULT_THRESHOLD: i32 = 995;

/// One row of the `data` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Record {
    pub field1: String,
    pub field2: i32,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Data repository
pub struct DataRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DataRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every row whose `field2` is greater than `threshold`.
    ///
    /// Rows come back in whatever order the store yields them.
    pub async fn above_threshold(&self, threshold: i32) -> Result<Vec<Record>, DbError> {
        let records = sqlx::query_as::<_, Record>(
            r#"
            SELECT field1, field2
            FROM data
            WHERE field2 > $1
            "#,
        )
        .bind(threshold)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}
