//! # users-api
//!
//! REST API exposing CRUD operations over a single PostgreSQL `users`
//! table (`id`, `name`, `age`).
//!
//! Each request is one round-trip: decode the request, run one
//! parameterized statement, encode the response. Schema constraints
//! (`age >= 18`, `name` of 1 to 55 characters) are enforced by the
//! database, not by handlers.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── UserStore trait (persistence/)
//!     │     ├── PostgresUserStore (sqlx::PgPool)
//!     │     └── InMemoryUserStore (tests)
//!     │
//!     └── PostgreSQL `users` table
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
