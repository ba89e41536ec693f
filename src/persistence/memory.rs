//! In-memory implementation of [`UserStore`].
//!
//! Rows live in a `BTreeMap` behind a [`tokio::sync::RwLock`], so
//! listings come back in id order like the Postgres backend. Ids are
//! assigned from a counter that is never reused, matching an identity
//! column.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::domain::{DEFAULT_AGE, NewUser, User, UserId};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    last_id: i32,
}

/// Volatile user store enforcing the same constraints as the SQL schema.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<Table>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns `true` if no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        user.check_constraints()
            .map_err(StoreError::ConstraintViolation)?;

        let mut table = self.table.write().await;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("identity sequence exhausted".to_string()))?;
        table.last_id = next;

        let id = UserId::new(next);
        let row = User {
            id,
            name: user.name,
            age: user.age.unwrap_or(DEFAULT_AGE),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
