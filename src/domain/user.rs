//! The user record and its schema constraints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum length of [`User::name`] in characters.
pub const NAME_MAX_LEN: usize = 55;

/// Minimum accepted [`User::age`] (`CHECK (age >= 18)`).
pub const MIN_AGE: i16 = 18;

/// Age assigned by the schema when an insert omits the column.
pub const DEFAULT_AGE: i16 = 18;

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Identity assigned by the storage engine.
    #[schema(value_type = i32, example = 1)]
    pub id: UserId,
    /// Display name, 1 to 55 characters.
    #[schema(example = "Ann", max_length = 55)]
    pub name: String,
    /// Age in years, at least 18.
    #[schema(example = 30, minimum = 18)]
    pub age: i16,
}

/// Values for a row that has not been inserted yet.
///
/// `age: None` means the column is left out of the insert so the schema
/// default applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Requested name.
    pub name: String,
    /// Requested age, or `None` to use [`DEFAULT_AGE`].
    pub age: Option<i16>,
}

impl NewUser {
    /// Creates a new insert payload.
    #[must_use]
    pub fn new(name: impl Into<String>, age: Option<i16>) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Checks the values against the table constraints.
    ///
    /// Postgres enforces these itself; the in-memory store calls this to
    /// reject the same rows.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    pub fn check_constraints(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(format!("name exceeds {NAME_MAX_LEN} characters"));
        }
        // Postgres text cannot hold U+0000.
        if self.name.contains('\0') {
            return Err("name must not contain NUL characters".to_string());
        }
        let age = self.age.unwrap_or(DEFAULT_AGE);
        if age < MIN_AGE {
            return Err(format!("age must be at least {MIN_AGE}, got {age}"));
        }
        Ok(())
    }
}
