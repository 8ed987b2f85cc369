//! `PostgreSQL` implementation of the `SubmissionStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::store::SubmissionStore;
use hookline_core::submission::{Payload, Submission};

use crate::infrastructure;

/// PostgreSQL-backed submission store.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    /// Creates a new `PgSubmissionStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_submission(row: &PgRow) -> Result<Submission, DomainError> {
    let category: String = row.try_get("category").map_err(infrastructure)?;
    let payload: Value = row.try_get("payload").map_err(infrastructure)?;
    let Value::Object(payload) = payload else {
        return Err(DomainError::Infrastructure(
            "stored submission payload is not a JSON object".into(),
        ));
    };
    Ok(Submission {
        id: row.try_get::<Uuid, _>("id").map_err(infrastructure)?,
        category: category
            .parse()
            .map_err(|e: DomainError| DomainError::Infrastructure(e.to_string()))?,
        payload,
        created_at: row.try_get("created_at").map_err(infrastructure)?,
    })
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn append(
        &self,
        category: EventCategory,
        payload: Payload,
        created_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError> {
        let row = sqlx::query(
            r"
            INSERT INTO submissions (category, payload, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, category, payload, created_at
            ",
        )
        .bind(category.as_str())
        .bind(Value::Object(payload))
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(infrastructure)?;

        row_to_submission(&row)
    }

    async fn list_between(
        &self,
        category: EventCategory,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>, DomainError> {
        let rows = sqlx::query(
            r"
            SELECT id, category, payload, created_at
            FROM submissions
            WHERE category = $1 AND created_at >= $2 AND created_at <= $3
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(category.as_str())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        rows.iter().map(row_to_submission).collect()
    }
}
