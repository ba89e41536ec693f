//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::MissingAgePolicy;
use crate::persistence::UserStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built once at startup; cloning only bumps the store's reference count.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage gateway for the users table.
    pub users: Arc<dyn UserStore>,
    /// Handling of create requests that omit `age`.
    pub missing_age_policy: MissingAgePolicy,
}

impl AppState {
    /// Creates state around the given store.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, missing_age_policy: MissingAgePolicy) -> Self {
        Self {
            users,
            missing_age_policy,
        }
    }
}
