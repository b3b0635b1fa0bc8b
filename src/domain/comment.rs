use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ArticleId, CommentContent, CommentId, CommenterName};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub commenter: Option<CommenterName>,
    pub content: CommentContent,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub article_id: ArticleId,
    pub commenter: Option<CommenterName>,
    pub content: CommentContent,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
