use crate::db::{DbConnection, DbPool};
use crate::domain::article::{Article, NewArticle, UpdateArticle};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::session::NewSession;
use crate::domain::types::{
    ArticleId, CategoryId, CategoryName, CommentId, EmailAddress, SessionToken, UserId, Username,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::pagination::Pagination;

pub mod article;
pub mod category;
pub mod comment;
pub mod errors;
pub mod session;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleListQuery {
    /// Restrict to articles written by this user.
    pub user_id: Option<UserId>,
    /// Restrict to articles linked to this category.
    pub category_id: Option<CategoryId>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ArticleListQuery {
    pub fn author(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// List users ordered by username.
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Case-insensitive lookup.
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
    /// Case-insensitive lookup.
    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Insert a user and its first session in one transaction. Neither row
    /// is kept when either insert fails.
    fn create_user_with_session(
        &self,
        user: &NewUser,
        token: &SessionToken,
    ) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, user: &UpdateUser) -> RepositoryResult<User>;
    /// Delete a user along with their sessions, articles, the articles'
    /// comments and category links, all in one transaction.
    fn delete_user(&self, id: UserId) -> RepositoryResult<usize>;
}

/// Read-only operations for article entities.
pub trait ArticleReader {
    /// List articles newest first.
    fn list_articles(&self, query: ArticleListQuery) -> RepositoryResult<(usize, Vec<Article>)>;
    fn get_article_by_id(&self, id: ArticleId) -> RepositoryResult<Option<Article>>;
    /// Categories linked to an article ordered by name.
    fn list_article_categories(&self, id: ArticleId) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for article entities and their category links.
pub trait ArticleWriter {
    fn create_article(&self, article: &NewArticle) -> RepositoryResult<Article>;
    fn update_article(&self, id: ArticleId, article: &UpdateArticle) -> RepositoryResult<Article>;
    /// Delete an article with its comments and category links.
    fn delete_article(&self, id: ArticleId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories ordered by name.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Exact, case-sensitive lookup.
    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<Category>;
    /// Delete a category and its article links. Articles are kept.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// Comments of an article newest first.
    fn list_comments(&self, article_id: ArticleId) -> RepositoryResult<Vec<Comment>>;
    /// Fetch a comment only if it belongs to `article_id`.
    fn get_comment_by_id(
        &self,
        article_id: ArticleId,
        id: CommentId,
    ) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Resolution of session tokens.
pub trait SessionReader {
    /// The user a token belongs to, if the session still exists.
    fn get_session_user(&self, token: &SessionToken) -> RepositoryResult<Option<User>>;
}

/// Creation and invalidation of session records.
pub trait SessionWriter {
    fn create_session(&self, session: &NewSession) -> RepositoryResult<usize>;
    fn delete_session(&self, token: &SessionToken) -> RepositoryResult<usize>;
}
