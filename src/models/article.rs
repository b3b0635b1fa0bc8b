use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::article::{Article as DomainArticle, NewArticle as DomainNewArticle};
use crate::domain::types::{ArticleContent, ArticleTitle, TypeConstraintError};

/// Diesel model representing the `articles` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::articles)]
pub struct Article {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Article`]. Category links are written separately.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row of the `article_categories` join table.
#[derive(Debug, Clone, Copy, Insertable, Queryable)]
#[diesel(table_name = crate::schema::article_categories)]
pub struct ArticleCategory {
    pub article_id: i32,
    pub category_id: i32,
}

impl TryFrom<Article> for DomainArticle {
    type Error = TypeConstraintError;

    fn try_from(article: Article) -> Result<Self, Self::Error> {
        Ok(Self {
            id: article.id.try_into()?,
            user_id: article.user_id.try_into()?,
            title: ArticleTitle::new(article.title)?,
            content: ArticleContent::new(article.content)?,
            created_at: article.created_at,
            updated_at: article.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewArticle> for NewArticle<'a> {
    fn from(article: &'a DomainNewArticle) -> Self {
        Self {
            user_id: article.user_id.get(),
            title: article.title.as_str(),
            content: article.content.as_str(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}
