use chrono::Utc;

use crate::domain::article::{Article, NewArticle, UpdateArticle};
use crate::domain::session::SessionContext;
use crate::domain::types::{ArticleId, CategoryId};
use crate::domain::validation::FieldErrors;
use crate::dto::articles::{ArticleDto, ArticlePageDto};
use crate::dto::categories::CategoryDto;
use crate::dto::comments::CommentDto;
use crate::forms::articles::{ArticleForm, ArticlePayload, UNKNOWN_CATEGORY};
use crate::pagination::{ARTICLES_PER_PAGE, Paginated, Pagination};
use crate::repository::{
    ArticleListQuery, ArticleReader, ArticleWriter, CategoryListQuery, CategoryReader,
    CommentReader, UserReader,
};

use super::policy::{ARTICLE_OWNER_WARNING, require_same_user_or_admin, require_user};
use super::{ServiceError, ServiceResult, parse_id, repo_error};

/// Attach author and categories to an article.
pub(crate) fn article_dto<R>(article: Article, repo: &R) -> ServiceResult<ArticleDto>
where
    R: ArticleReader + UserReader,
{
    let author = repo
        .get_user_by_id(article.user_id)
        .map_err(repo_error("Failed to load article author"))?;
    let categories = repo
        .list_article_categories(article.id)
        .map_err(repo_error("Failed to load article categories"))?;
    Ok(ArticleDto::new(article, author, categories))
}

/// One page of articles matching `query`, newest first.
pub(crate) fn article_page<R>(
    mut query: ArticleListQuery,
    page: usize,
    per_page: usize,
    repo: &R,
) -> ServiceResult<Paginated<ArticleDto>>
where
    R: ArticleReader + UserReader,
{
    let pagination = Pagination::new(page, per_page);
    query.pagination = Some(pagination);
    let (total, articles) = repo
        .list_articles(query)
        .map_err(repo_error("Failed to list articles"))?;
    let items = articles
        .into_iter()
        .map(|a| article_dto(a, repo))
        .collect::<ServiceResult<Vec<_>>>()?;
    Ok(Paginated::new(items, pagination, total))
}

/// Every category, for the article form's multi-select.
pub fn form_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    let (_total, categories) = repo
        .list_categories(CategoryListQuery::default())
        .map_err(repo_error("Failed to list categories"))?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

fn load_article<R>(id: ArticleId, repo: &R) -> ServiceResult<Article>
where
    R: ArticleReader,
{
    repo.get_article_by_id(id)
        .map_err(repo_error("Failed to load article"))?
        .ok_or(ServiceError::NotFound)
}

fn ensure_categories_exist<R>(ids: &[CategoryId], repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    for id in ids {
        let found = repo
            .get_category_by_id(*id)
            .map_err(repo_error("Failed to load category"))?;
        if found.is_none() {
            return Err(FieldErrors::single("category_ids", UNKNOWN_CATEGORY).into());
        }
    }
    Ok(())
}

pub fn list_articles<R>(page: usize, repo: &R) -> ServiceResult<Paginated<ArticleDto>>
where
    R: ArticleReader + UserReader,
{
    article_page(ArticleListQuery::default(), page, ARTICLES_PER_PAGE, repo)
}

pub fn show_article<R>(
    article_id: i32,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<ArticlePageDto>
where
    R: ArticleReader + UserReader + CommentReader,
{
    let article = load_article(parse_id(article_id, ArticleId::new)?, repo)?;
    let can_modify = session
        .current_user()
        .is_some_and(|u| u.can_modify(article.user_id));
    let comments = repo
        .list_comments(article.id)
        .map_err(repo_error("Failed to list comments"))?;

    Ok(ArticlePageDto {
        article: article_dto(article, repo)?,
        comments: comments.into_iter().map(CommentDto::from).collect(),
        can_modify,
    })
}

/// Categories for an empty article form. Requires a logged-in user.
pub fn new_article<R>(session: &SessionContext, repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    require_user(session)?;
    form_categories(repo)
}

pub fn create_article<R>(
    form: ArticleForm,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<Article>
where
    R: ArticleWriter + CategoryReader,
{
    let author = require_user(session)?;
    let payload = ArticlePayload::try_from(form)?;
    ensure_categories_exist(&payload.category_ids, repo)?;

    let now = Utc::now().naive_utc();
    let article = repo
        .create_article(&NewArticle {
            user_id: author.id,
            title: payload.title,
            content: payload.content,
            category_ids: payload.category_ids,
            created_at: now,
            updated_at: now,
        })
        .map_err(repo_error("Failed to create article"))?;
    log::info!("User {} created article {}", author.id, article.id);
    Ok(article)
}

/// The article to edit and every selectable category.
pub fn edit_article<R>(
    article_id: i32,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<(ArticleDto, Vec<CategoryDto>)>
where
    R: ArticleReader + UserReader + CategoryReader,
{
    require_user(session)?;
    let article = load_article(parse_id(article_id, ArticleId::new)?, repo)?;
    require_same_user_or_admin(session, article.user_id, ARTICLE_OWNER_WARNING)?;
    Ok((article_dto(article, repo)?, form_categories(repo)?))
}

pub fn update_article<R>(
    article_id: i32,
    form: ArticleForm,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<Article>
where
    R: ArticleReader + ArticleWriter + CategoryReader,
{
    require_user(session)?;
    let article = load_article(parse_id(article_id, ArticleId::new)?, repo)?;
    require_same_user_or_admin(session, article.user_id, ARTICLE_OWNER_WARNING)?;

    let payload = ArticlePayload::try_from(form)?;
    ensure_categories_exist(&payload.category_ids, repo)?;

    repo.update_article(
        article.id,
        &UpdateArticle {
            title: payload.title,
            content: payload.content,
            category_ids: payload.category_ids,
            updated_at: Utc::now().naive_utc(),
        },
    )
    .map_err(repo_error("Failed to update article"))
}

/// Delete an article with its comments and category links.
pub fn delete_article<R>(article_id: i32, session: &SessionContext, repo: &R) -> ServiceResult<()>
where
    R: ArticleReader + ArticleWriter,
{
    require_user(session)?;
    let article = load_article(parse_id(article_id, ArticleId::new)?, repo)?;
    let actor = require_same_user_or_admin(session, article.user_id, ARTICLE_OWNER_WARNING)?;

    repo.delete_article(article.id)
        .map_err(repo_error("Failed to delete article"))?;
    log::info!("User {} deleted article {}", actor.id, article.id);
    Ok(())
}
