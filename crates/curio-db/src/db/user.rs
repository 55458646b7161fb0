use curio_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::db::schema::quoted_table;

/// Role granted to the first user created at installation
pub const GLOBAL_ADMIN_ROLE: &str = "global_admin";

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    table: String,
}

impl UserRepository {
    pub fn new(pool: PgPool, table_prefix: &str) -> Self {
        Self {
            pool,
            table: quoted_table(table_prefix, "user"),
        }
    }

    /// Insert an active global administrator and return its id
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "user", db.operation = "insert"))]
    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, AppError> {
        let sql = format!(
            "INSERT INTO {} (email, name, password_hash, role, is_active) \
             VALUES ($1, $2, $3, $4, TRUE) RETURNING id",
            self.table
        );

        let id = sqlx::query_scalar::<Postgres, i64>(&sql)
            .bind(email)
            .bind(name)
            .bind(password_hash)
            .bind(GLOBAL_ADMIN_ROLE)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Count user accounts
    #[tracing::instrument(skip(self), fields(db.table = "user", db.operation = "select"))]
    pub async fn count(&self) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count = sqlx::query_scalar::<Postgres, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
