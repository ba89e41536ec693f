//! User DTOs for the create endpoint.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::config::MissingAgePolicy;
use crate::domain::NewUser;
use crate::error::ApiError;

/// Request body for `POST /users`.
///
/// `age` may be omitted or `null`; what happens then depends on
/// [`MissingAgePolicy`].
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Display name, 1 to 55 characters.
    #[schema(example = "Ann")]
    pub name: String,
    /// Age in years, at least 18.
    #[serde(default)]
    #[schema(example = 30)]
    pub age: Option<i16>,
}

impl CreateUserRequest {
    /// Converts the body into an insert payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MalformedRequest`] when `age` is missing and the
    /// policy is [`MissingAgePolicy::Reject`].
    pub fn into_new_user(self, policy: MissingAgePolicy) -> Result<NewUser, ApiError> {
        match (self.age, policy) {
            (None, MissingAgePolicy::Reject) => Err(ApiError::MalformedRequest(
                "missing field `age`".to_string(),
            )),
            (age, _) => Ok(NewUser::new(self.name, age)),
        }
    }
}
