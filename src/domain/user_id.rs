//! Type-safe user identifier.
//!
//! [`UserId`] is a newtype wrapper around the `INT` identity column so
//! that user identifiers cannot be confused with ages or other integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a persisted user.
///
/// Assigned by the storage engine on insert and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wraps a raw identity value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw identity value for query binding.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a path segment is not a plain decimal id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a plain decimal integer: {0:?}")]
pub struct ParseUserIdError(String);

impl FromStr for UserId {
    type Err = ParseUserIdError;

    /// Accepts an optional `-` followed by ASCII digits; whitespace and a
    /// leading `+` are refused.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('+') {
            return Err(ParseUserIdError(s.to_string()));
        }
        s.parse().map(Self).map_err(|_| ParseUserIdError(s.to_string()))
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
