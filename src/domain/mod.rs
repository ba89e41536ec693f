//! Domain layer: the user record and its identifier.
//!
//! The schema constraints (name length, minimum age, default age) live
//! here as constants so both storage backends enforce the same rules.

pub mod user;
pub mod user_id;

pub use user::{DEFAULT_AGE, MIN_AGE, NAME_MAX_LEN, NewUser, User};
pub use user_id::{ParseUserIdError, UserId};
