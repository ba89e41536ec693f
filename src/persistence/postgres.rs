//! PostgreSQL implementation of [`UserStore`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use super::{StoreError, UserStore};
use crate::config::DatabaseConfig;
use crate::domain::{NewUser, User, UserId};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (\
     id INT GENERATED ALWAYS AS IDENTITY PRIMARY KEY, \
     name TEXT NOT NULL CHECK (char_length(name) BETWEEN 1 AND 55), \
     age SMALLINT NOT NULL DEFAULT 18 CHECK (age >= 18)\
     )";

type UserRow = (i32, String, i16);

/// PostgreSQL-backed user store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from the database settings.
    ///
    /// The pool connects eagerly so that bad credentials fail startup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if no connection can be made.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "connected to postgres"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tracing::info!("users table ready");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, age FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(into_user).collect())
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, age FROM users WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(into_user)
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = match user.age {
            Some(age) => {
                sqlx::query_as::<_, UserRow>(
                    "INSERT INTO users (name, age) VALUES ($1, $2) RETURNING id, name, age",
                )
                .bind(user.name)
                .bind(age)
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, UserRow>(
                    "INSERT INTO users (name) VALUES ($1) RETURNING id, name, age",
                )
                .bind(user.name)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(into_user(row))
    }

    async fn delete_by_id(&self, id: UserId) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>("DELETE FROM users WHERE id = $1 RETURNING id, name, age")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(into_user)
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("postgres pool closed");
    }
}

fn into_user((id, name, age): UserRow) -> User {
    User {
        id: UserId::new(id),
        name,
        age,
    }
}

/// Splits driver errors into data errors and infrastructure errors.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref().is_some_and(is_constraint_sqlstate) =>
        {
            StoreError::ConstraintViolation(db_err.message().to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}

/// SQLSTATE class 23 (integrity constraint violation), string and numeric
/// overflow, and 22021 (invalid byte sequence, raised for U+0000 in text).
fn is_constraint_sqlstate(code: &str) -> bool {
    code.starts_with("23") || matches!(code, "22001" | "22003" | "22021")
}
