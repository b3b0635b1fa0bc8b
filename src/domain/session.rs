use chrono::NaiveDateTime;

use crate::domain::types::{SessionToken, UserId};
use crate::domain::user::User;

/// Persisted mapping of a session token to the user it authenticates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub token: SessionToken,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
}

/// Request-scoped identity handed explicitly to every service call.
///
/// `token` is whatever the identity cookie carried; `current_user` is only
/// set when that token still maps to an existing user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub token: Option<SessionToken>,
    pub current_user: Option<User>,
}

impl SessionContext {
    /// A visitor without a (valid) session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: SessionToken, user: User) -> Self {
        Self {
            token: Some(token),
            current_user: Some(user),
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.admin)
    }
}
