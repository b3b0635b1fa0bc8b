use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{ArticleId, CommentId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, article_id: ArticleId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let items = comments::table
            .filter(comments::article_id.eq(article_id.get()))
            .order((comments::created_at.desc(), comments::id.desc()))
            .load::<DbComment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }

    fn get_comment_by_id(
        &self,
        article_id: ArticleId,
        id: CommentId,
    ) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::id.eq(id.get()))
            .filter(comments::article_id.eq(article_id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        Ok(comment.map(TryInto::try_into).transpose()?)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(comments::table)
            .values(DbNewComment::from(comment))
            .get_result::<DbComment>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::delete(comments::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}
