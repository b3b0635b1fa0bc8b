use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{EmailAddress, Username};
use crate::domain::validation::FieldErrors;
use crate::forms::{parse_field, trimmed, validation_errors};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SignupForm {
    #[validate(length(
        min = 3,
        max = 25,
        message = "Username must be between 3 and 25 characters"
    ))]
    pub username: String,
    #[validate(
        length(max = 105, message = "Email is too long (maximum is 105 characters)"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(
        min = 1,
        max = 72,
        message = "Password must be between 1 and 72 characters"
    ))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupPayload {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl TryFrom<SignupForm> for SignupPayload {
    type Error = FieldErrors;

    fn try_from(mut value: SignupForm) -> Result<Self, Self::Error> {
        value.username = trimmed(value.username);
        value.email = trimmed(value.email);
        let mut errors = validation_errors(&value);
        let username = parse_field(&mut errors, Username::new(value.username));
        let email = parse_field(&mut errors, EmailAddress::new(value.email));

        match (username, email) {
            (Some(username), Some(email)) if errors.is_empty() => Ok(Self {
                username,
                email,
                password: value.password,
            }),
            _ => Err(errors),
        }
    }
}

/// Profile edit. A blank password keeps the current one.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct EditUserForm {
    #[validate(length(
        min = 3,
        max = 25,
        message = "Username must be between 3 and 25 characters"
    ))]
    pub username: String,
    #[validate(
        length(max = 105, message = "Email is too long (maximum is 105 characters)"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[validate(length(max = 72, message = "Password is too long (maximum is 72 characters)"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUserPayload {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Option<String>,
}

impl TryFrom<EditUserForm> for UpdateUserPayload {
    type Error = FieldErrors;

    fn try_from(mut value: EditUserForm) -> Result<Self, Self::Error> {
        value.username = trimmed(value.username);
        value.email = trimmed(value.email);
        let mut errors = validation_errors(&value);
        let username = parse_field(&mut errors, Username::new(value.username));
        let email = parse_field(&mut errors, EmailAddress::new(value.email));

        match (username, email) {
            (Some(username), Some(email)) if errors.is_empty() => Ok(Self {
                username,
                email,
                password: Some(value.password).filter(|p| !p.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}
