//! `PostgreSQL` implementation of the `ConfigStore` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::platform::Platform;
use hookline_core::store::{ConfigStore, DestinationMap};

use crate::infrastructure;

/// PostgreSQL-backed destination configuration.
///
/// Every write is a single-row statement, so readers never see a partially
/// written URL.
#[derive(Debug, Clone)]
pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    /// Creates a new `PgConfigStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn get(
        &self,
        platform: Platform,
        category: EventCategory,
    ) -> Result<Option<String>, DomainError> {
        let row = sqlx::query("SELECT url FROM destinations WHERE platform = $1 AND category = $2")
            .bind(platform.as_str())
            .bind(category.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure)?;

        row.map(|r| r.try_get::<String, _>("url"))
            .transpose()
            .map_err(infrastructure)
    }

    async fn get_all(&self, platform: Platform) -> Result<DestinationMap, DomainError> {
        let rows = sqlx::query("SELECT category, url FROM destinations WHERE platform = $1")
            .bind(platform.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        let mut destinations = DestinationMap::new();
        for row in rows {
            let category: String = row.try_get("category").map_err(infrastructure)?;
            let url: String = row.try_get("url").map_err(infrastructure)?;
            match category.parse::<EventCategory>() {
                Ok(category) => {
                    destinations.insert(category, url);
                }
                Err(_) => debug!(%platform, category, "ignoring destination for retired category"),
            }
        }
        Ok(destinations)
    }

    #[instrument(skip(self, url), fields(%platform, %category))]
    async fn set(
        &self,
        platform: Platform,
        category: EventCategory,
        url: &str,
    ) -> Result<(), DomainError> {
        let url = url.trim();
        if url.is_empty() {
            sqlx::query("DELETE FROM destinations WHERE platform = $1 AND category = $2")
                .bind(platform.as_str())
                .bind(category.as_str())
                .execute(&self.pool)
                .await
                .map_err(infrastructure)?;
            debug!("destination cleared");
            return Ok(());
        }

        sqlx::query(
            r"
            INSERT INTO destinations (platform, category, url, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (platform, category)
            DO UPDATE SET url = EXCLUDED.url, updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(platform.as_str())
        .bind(category.as_str())
        .bind(url)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        debug!("destination stored");
        Ok(())
    }
}
