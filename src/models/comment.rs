use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentContent, CommenterName, TypeConstraintError};

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub article_id: i32,
    pub commenter: Option<String>,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub article_id: i32,
    pub commenter: Option<&'a str>,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Comment> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            article_id: comment.article_id.try_into()?,
            // A blank stored name reads back as anonymous.
            commenter: comment.commenter.and_then(|c| CommenterName::new(c).ok()),
            content: CommentContent::new(comment.content)?,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewComment> for NewComment<'a> {
    fn from(comment: &'a DomainNewComment) -> Self {
        Self {
            article_id: comment.article_id.get(),
            commenter: comment.commenter.as_ref().map(|c| c.as_str()),
            content: comment.content.as_str(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
