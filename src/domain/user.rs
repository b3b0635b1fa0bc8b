use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, PasswordHash, UserId, Username};

/// A registered account.
///
/// The password hash never leaves the process: it is skipped on
/// serialization so a `User` can be handed to templates directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    pub admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Whether `self` may modify resources owned by `owner`.
    pub fn can_modify(&self, owner: UserId) -> bool {
        self.admin || self.id == owner
    }
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Profile changes. A `None` password keeps the stored hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: Option<PasswordHash>,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i32, admin: bool) -> User {
        let now = Utc::now().naive_utc();
        User {
            id: UserId::new(id).unwrap(),
            username: Username::new("johndoe").unwrap(),
            email: EmailAddress::new("john@example.com").unwrap(),
            password_hash: PasswordHash::new("$argon2id$secret").unwrap(),
            admin,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(user(1, false)).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["username"], "johndoe");
    }

    #[test]
    fn owners_and_admins_can_modify() {
        let owner = UserId::new(1).unwrap();
        assert!(user(1, false).can_modify(owner));
        assert!(!user(2, false).can_modify(owner));
        assert!(user(2, true).can_modify(owner));
    }
}
