use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::user::User;
use crate::dto::articles::ArticleDto;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.into_inner(),
            email: value.email.into_inner(),
            admin: value.admin,
            created_at: value.created_at,
        }
    }
}

/// Profile page: the user and one page of the articles they wrote.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserPageDto {
    pub user: UserDto,
    pub articles: Paginated<ArticleDto>,
    pub can_modify: bool,
}
