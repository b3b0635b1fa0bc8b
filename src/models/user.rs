use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{EmailAddress, PasswordHash, TypeConstraintError, Username};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            email: EmailAddress::new(user.email)?,
            password_hash: PasswordHash::new(user.password_hash)?,
            admin: user.admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            admin: user.admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Changes applied by a profile update. A `None` password leaves the column
/// untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a DomainUpdateUser> for UserChangeset<'a> {
    fn from(user: &'a DomainUpdateUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_ref().map(|h| h.as_str()),
            updated_at: user.updated_at,
        }
    }
}
