//! SQLite-backed [`KvStore`] implementation.
//!
//! Every key lives in one row of the `records` table. A `put` is a single
//! upsert statement, durable once it returns.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use vitals_core::dates::SystemClock;
use vitals_core::store::KvStore;
use vitals_core::HealthLedger;

use crate::config::Config;
use crate::{db, migrate};

/// SQLite implementation of the [`KvStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM records WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO records (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM records WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Connect to the configured database and open a ledger on it.
///
/// The schema is created on first use, so `vitals init` is optional.
pub async fn open_ledger(config: &Config) -> Result<HealthLedger<SqliteStore>> {
    let pool = db::connect(config).await?;
    migrate::create_schema(&pool).await?;
    let ledger = HealthLedger::open(SqliteStore::new(pool), Arc::new(SystemClock))
        .await
        .with_default_calorie_goal(config.goals.calorie_goal);
    Ok(ledger)
}
