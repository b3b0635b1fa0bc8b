use serde::{Deserialize, Serialize};

/// Login form. Deliberately unvalidated: any mismatch yields the same generic
/// failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}
