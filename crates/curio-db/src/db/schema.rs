//! Schema inspection and installation
//!
//! Every table carries the configured prefix. Identifiers are always quoted
//! because `user` is reserved in PostgreSQL.

use async_trait::async_trait;
use curio_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::db::transaction::TransactionGuard;

/// Base names of the tables created by `install`, in creation order.
pub const TABLES: &[&str] = &["user", "setting", "media"];

/// Prefixed table name
pub fn table_name(prefix: &str, base: &str) -> String {
    format!("{}{}", prefix, base)
}

/// Prefixed, quoted table identifier for use in SQL text
pub fn quoted_table(prefix: &str, base: &str) -> String {
    format!("\"{}\"", table_name(prefix, base).replace('"', "\"\""))
}

/// DDL statements creating the schema, in execution order
pub fn statements(prefix: &str) -> Vec<String> {
    let user = quoted_table(prefix, "user");
    let setting = quoted_table(prefix, "setting");
    let media = quoted_table(prefix, "media");
    let media_owner_idx = quoted_table(prefix, "media_owner_idx");

    vec![
        format!(
            r#"CREATE TABLE {user} (
                id BIGSERIAL PRIMARY KEY,
                email VARCHAR(190) NOT NULL UNIQUE,
                name VARCHAR(190) NOT NULL,
                password_hash VARCHAR(255),
                role VARCHAR(190) NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                modified TIMESTAMPTZ
            )"#
        ),
        format!(
            r#"CREATE TABLE {setting} (
                id VARCHAR(190) PRIMARY KEY,
                value JSONB NOT NULL
            )"#
        ),
        format!(
            r#"CREATE TABLE {media} (
                id BIGSERIAL PRIMARY KEY,
                owner_id BIGINT REFERENCES {user} (id) ON DELETE SET NULL,
                storage_id VARCHAR(190) NOT NULL UNIQUE,
                source TEXT,
                media_type VARCHAR(255) NOT NULL,
                extension VARCHAR(255),
                has_original BOOLEAN NOT NULL DEFAULT FALSE,
                has_thumbnails BOOLEAN NOT NULL DEFAULT FALSE,
                created TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#
        ),
        format!("CREATE INDEX {media_owner_idx} ON {media} (owner_id)"),
    ]
}

/// Create all tables inside one transaction
#[tracing::instrument(skip(pool))]
pub async fn install(pool: &PgPool, prefix: &str) -> anyhow::Result<()> {
    let mut tx = TransactionGuard::begin(pool).await?;

    for statement in statements(prefix) {
        if let Err(e) = sqlx::query(&statement).execute(&mut **tx).await {
            tx.rollback().await?;
            return Err(anyhow::Error::new(e).context("Failed to create the schema"));
        }
    }

    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "Schema installed");
    Ok(())
}

/// Lists the tables present in the target database
#[async_trait]
pub trait SchemaInspector: Send + Sync {
    async fn list_table_names(&self) -> Result<Vec<String>, AppError>;
}

/// Inspects the current PostgreSQL schema
#[derive(Clone)]
pub struct PgSchemaInspector {
    pool: PgPool,
}

impl PgSchemaInspector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaInspector for PgSchemaInspector {
    #[tracing::instrument(skip(self), fields(db.table = "information_schema.tables", db.operation = "select"))]
    async fn list_table_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<Postgres, String>(
            "SELECT table_name::text FROM information_schema.tables WHERE table_schema = current_schema()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
