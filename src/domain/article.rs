use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ArticleContent, ArticleId, ArticleTitle, CategoryId, UserId};

/// A blog post written by exactly one [`crate::domain::user::User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub user_id: UserId,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Article`] together with its category links.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub user_id: UserId,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub category_ids: Vec<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Replacement values for an existing [`Article`]. The category set is
/// replaced as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArticle {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub category_ids: Vec<CategoryId>,
    pub updated_at: NaiveDateTime,
}
