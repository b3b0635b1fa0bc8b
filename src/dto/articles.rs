use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::article::Article;
use crate::domain::category::Category;
use crate::domain::user::User;
use crate::dto::categories::CategoryDto;
use crate::dto::comments::CommentDto;
use crate::dto::users::UserDto;

/// Article together with its author and categories.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author: Option<UserDto>,
    pub categories: Vec<CategoryDto>,
}

impl ArticleDto {
    pub fn new(article: Article, author: Option<User>, categories: Vec<Category>) -> Self {
        Self {
            id: article.id.get(),
            title: article.title.into_inner(),
            content: article.content.into_inner(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            author: author.map(UserDto::from),
            categories: categories.into_iter().map(CategoryDto::from).collect(),
        }
    }

    pub fn category_ids(&self) -> Vec<i32> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

/// Article page with its comments, newest first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticlePageDto {
    pub article: ArticleDto,
    pub comments: Vec<CommentDto>,
    /// Whether the visitor may edit the article and delete its comments.
    pub can_modify: bool,
}
