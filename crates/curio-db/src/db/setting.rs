use curio_core::AppError;
use serde_json::Value;
use sqlx::{PgPool, Postgres};

use crate::db::schema::quoted_table;

/// Repository for site-wide settings (id → JSON value)
#[derive(Clone)]
pub struct SettingRepository {
    pool: PgPool,
    table: String,
}

impl SettingRepository {
    pub fn new(pool: PgPool, table_prefix: &str) -> Self {
        Self {
            pool,
            table: quoted_table(table_prefix, "setting"),
        }
    }

    /// Insert or replace a setting
    #[tracing::instrument(skip(self, value), fields(db.table = "setting", db.operation = "upsert"))]
    pub async fn set(&self, id: &str, value: &Value) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (id, value) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET value = EXCLUDED.value",
            self.table
        );

        sqlx::query(&sql)
            .bind(id)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a setting by id
    #[tracing::instrument(skip(self), fields(db.table = "setting", db.operation = "select"))]
    pub async fn get(&self, id: &str) -> Result<Option<Value>, AppError> {
        let sql = format!("SELECT value FROM {} WHERE id = $1", self.table);

        let value = sqlx::query_scalar::<Postgres, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }
}
