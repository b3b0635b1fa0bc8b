use chrono::Utc;

use crate::domain::article::Article;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::session::SessionContext;
use crate::domain::types::{ArticleId, CommentId};
use crate::forms::comments::{CommentForm, CommentPayload};
use crate::repository::{ArticleReader, CommentReader, CommentWriter};

use super::policy::{COMMENT_OWNER_WARNING, require_same_user_or_admin, require_user};
use super::{ServiceError, ServiceResult, parse_id, repo_error};

fn load_article<R>(article_id: i32, repo: &R) -> ServiceResult<Article>
where
    R: ArticleReader,
{
    repo.get_article_by_id(parse_id(article_id, ArticleId::new)?)
        .map_err(repo_error("Failed to load article"))?
        .ok_or(ServiceError::NotFound)
}

/// Add a comment to an article. Anyone may comment.
pub fn create_comment<R>(article_id: i32, form: CommentForm, repo: &R) -> ServiceResult<Comment>
where
    R: ArticleReader + CommentWriter,
{
    let article = load_article(article_id, repo)?;
    let payload = CommentPayload::try_from(form)?;

    let now = Utc::now().naive_utc();
    repo.create_comment(&NewComment {
        article_id: article.id,
        commenter: payload.commenter,
        content: payload.content,
        created_at: now,
        updated_at: now,
    })
    .map_err(repo_error("Failed to create comment"))
}

/// Remove a comment. Only the article's author or an admin may do this.
pub fn delete_comment<R>(
    article_id: i32,
    comment_id: i32,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<()>
where
    R: ArticleReader + CommentReader + CommentWriter,
{
    require_user(session)?;
    let article = load_article(article_id, repo)?;
    require_same_user_or_admin(session, article.user_id, COMMENT_OWNER_WARNING)?;

    let comment_id = parse_id(comment_id, CommentId::new)?;
    let comment = repo
        .get_comment_by_id(article.id, comment_id)
        .map_err(repo_error("Failed to load comment"))?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_comment(comment.id)
        .map_err(repo_error("Failed to delete comment"))?;
    Ok(())
}
