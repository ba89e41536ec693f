//! Persistence layer: the `users` table behind the [`UserStore`] trait.
//!
//! [`postgres::PostgresUserStore`] is the production backend built on
//! `sqlx::PgPool`. [`memory::InMemoryUserStore`] enforces the same schema
//! constraints without a database and backs the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

/// Errors raised by a [`UserStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the given identifier.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The write was rejected by a schema constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Connection or query failure unrelated to the request's data.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage gateway for user records.
///
/// Every method is a single, non-transactional statement.
#[async_trait]
pub trait UserStore: std::fmt::Debug + Send + Sync {
    /// Creates the backing table if it does not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the statement fails.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Returns every stored user, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on query failure.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Fetches the user with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matches.
    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError>;

    /// Inserts a row and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConstraintViolation`] if the values break a
    /// schema constraint.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Deletes the user with the given id and returns its prior values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matches.
    async fn delete_by_id(&self, id: UserId) -> Result<User, StoreError>;

    /// Round-trips a trivial statement to check connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the backend is unreachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources. Called once on shutdown.
    async fn close(&self) {}
}
