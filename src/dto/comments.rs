use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::comment::Comment;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentDto {
    pub id: i32,
    pub article_id: i32,
    pub commenter: Option<String>,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<Comment> for CommentDto {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.get(),
            article_id: value.article_id.get(),
            commenter: value.commenter.map(|c| c.into_inner()),
            content: value.content.into_inner(),
            created_at: value.created_at,
        }
    }
}
