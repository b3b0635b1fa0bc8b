use chrono::Utc;

use crate::domain::category::{Category, NewCategory};
use crate::domain::session::SessionContext;
use crate::domain::types::CategoryId;
use crate::domain::validation::FieldErrors;
use crate::dto::categories::{CategoryDto, CategoryPageDto};
use crate::forms::categories::{CategoryForm, CategoryPayload};
use crate::pagination::{CATEGORIES_PER_PAGE, CATEGORY_ARTICLES_PER_PAGE, Paginated, Pagination};
use crate::repository::{
    ArticleListQuery, ArticleReader, CategoryListQuery, CategoryReader, CategoryWriter, UserReader,
};

use super::articles::article_page;
use super::policy::{CATEGORY_CREATE_ALERT, CATEGORY_MODIFY_ALERT, require_admin};
use super::{ServiceError, ServiceResult, parse_id, repo_error};

fn load_category<R>(id: CategoryId, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    repo.get_category_by_id(id)
        .map_err(repo_error("Failed to load category"))?
        .ok_or(ServiceError::NotFound)
}

/// Fails with a `name` error when another category already uses `payload.name`.
fn ensure_name_available<R>(
    payload: &CategoryPayload,
    except: Option<CategoryId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let existing = repo
        .get_category_by_name(&payload.name)
        .map_err(repo_error("Failed to look up category by name"))?;
    match existing {
        Some(category) if Some(category.id) != except => {
            Err(FieldErrors::single("name", "Name has already been taken").into())
        }
        _ => Ok(()),
    }
}

pub fn list_categories<R>(page: usize, repo: &R) -> ServiceResult<Paginated<CategoryDto>>
where
    R: CategoryReader,
{
    let pagination = Pagination::new(page, CATEGORIES_PER_PAGE);
    let (total, categories) = repo
        .list_categories(CategoryListQuery {
            pagination: Some(pagination),
        })
        .map_err(repo_error("Failed to list categories"))?;
    Ok(Paginated::new(categories, pagination, total).map(CategoryDto::from))
}

pub fn show_category<R>(category_id: i32, page: usize, repo: &R) -> ServiceResult<CategoryPageDto>
where
    R: CategoryReader + ArticleReader + UserReader,
{
    let category = load_category(parse_id(category_id, CategoryId::new)?, repo)?;
    let articles = article_page(
        ArticleListQuery::default().category(category.id),
        page,
        CATEGORY_ARTICLES_PER_PAGE,
        repo,
    )?;
    Ok(CategoryPageDto {
        category: category.into(),
        articles,
    })
}

/// Gate for the empty category form.
pub fn new_category(session: &SessionContext) -> ServiceResult<()> {
    require_admin(session, CATEGORY_CREATE_ALERT)?;
    Ok(())
}

pub fn create_category<R>(
    form: CategoryForm,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let admin = require_admin(session, CATEGORY_CREATE_ALERT)?;
    let payload = CategoryPayload::try_from(form)?;
    ensure_name_available(&payload, None, repo)?;

    let now = Utc::now().naive_utc();
    let category = repo
        .create_category(&NewCategory {
            name: payload.name,
            created_at: now,
            updated_at: now,
        })
        .map_err(repo_error("Failed to create category"))?;
    log::info!("User {} created category {}", admin.id, category.id);
    Ok(category)
}

pub fn edit_category<R>(
    category_id: i32,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    require_admin(session, CATEGORY_MODIFY_ALERT)?;
    let category = load_category(parse_id(category_id, CategoryId::new)?, repo)?;
    Ok(category.into())
}

pub fn update_category<R>(
    category_id: i32,
    form: CategoryForm,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    require_admin(session, CATEGORY_MODIFY_ALERT)?;
    let category = load_category(parse_id(category_id, CategoryId::new)?, repo)?;
    let payload = CategoryPayload::try_from(form)?;
    ensure_name_available(&payload, Some(category.id), repo)?;

    repo.update_category(category.id, &payload.name)
        .map_err(repo_error("Failed to update category"))
}

/// Delete a category. Linked articles are kept; only the links go.
pub fn delete_category<R>(category_id: i32, session: &SessionContext, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    let admin = require_admin(session, CATEGORY_MODIFY_ALERT)?;
    let category = load_category(parse_id(category_id, CategoryId::new)?, repo)?;

    repo.delete_category(category.id)
        .map_err(repo_error("Failed to delete category"))?;
    log::info!("User {} deleted category {}", admin.id, category.id);
    Ok(())
}
