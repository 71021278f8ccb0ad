use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use acct_core::domain::entities::Role;
use acct_core::domain::value_objects::NewUser;
use acct_core::services::MAX_PASSWORD_BYTES;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 100), custom(function = "validate_password_bytes"))]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
    #[serde(default)]
    pub premise_id: Option<String>,
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<Role>().is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("role");
    error.message = Some(Cow::from("must be one of admin, guard, operator"));
    error.add_param(Cow::from("value"), &role);
    Err(error)
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() <= MAX_PASSWORD_BYTES {
        return Ok(());
    }
    let mut error = ValidationError::new("length");
    error.message = Some(Cow::from("must be at most 72 bytes"));
    Err(error)
}

impl CreateUserRequest {
    /// Convert a validated request into the workflow input
    pub fn into_new_user(self) -> Result<NewUser, ValidationError> {
        let role = self.role.parse::<Role>().map_err(|_| ValidationError::new("role"))?;
        Ok(NewUser {
            name: self.name,
            email: self.email,
            password: self.password,
            role,
            premise_id: self.premise_id,
        })
    }
}
