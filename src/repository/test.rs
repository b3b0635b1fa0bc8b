use std::sync::Mutex;

use chrono::Utc;

use crate::domain::article::{Article, NewArticle, UpdateArticle};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::session::NewSession;
use crate::domain::types::{
    ArticleId, CategoryId, CategoryName, CommentId, EmailAddress, SessionToken, UserId, Username,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::pagination::Pagination;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ArticleListQuery, ArticleReader, ArticleWriter, CategoryListQuery, CategoryReader,
    CategoryWriter, CommentReader, CommentWriter, SessionReader, SessionWriter, UserListQuery,
    UserReader, UserWriter,
};

#[derive(Default)]
struct State {
    next_id: i32,
    users: Vec<User>,
    articles: Vec<Article>,
    categories: Vec<Category>,
    links: Vec<(ArticleId, CategoryId)>,
    comments: Vec<Comment>,
    sessions: Vec<(SessionToken, UserId)>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_article(&mut self, id: ArticleId) -> usize {
        self.comments.retain(|c| c.article_id != id);
        self.links.retain(|(a, _)| *a != id);
        let before = self.articles.len();
        self.articles.retain(|a| a.id != id);
        before - self.articles.len()
    }

    fn set_links(&mut self, id: ArticleId, category_ids: &[CategoryId]) {
        self.links.retain(|(a, _)| *a != id);
        for category_id in category_ids {
            if !self.links.contains(&(id, *category_id)) {
                self.links.push((id, *category_id));
            }
        }
    }

    fn user_conflict(&self, id: Option<UserId>, username: &str, email: &str) -> Option<String> {
        let others = self.users.iter().filter(|u| Some(u.id) != id);
        for user in others {
            if user.username.to_lowercase() == username.to_lowercase() {
                return Some("username".to_string());
            }
            if user.email.as_str() == email {
                return Some("email".to_string());
            }
        }
        None
    }
}

fn page<T: Clone>(items: Vec<T>, pagination: Option<Pagination>) -> (usize, Vec<T>) {
    let total = items.len();
    let items = match pagination {
        Some(p) => items.into_iter().skip(p.offset()).take(p.limit()).collect(),
        None => items,
    };
    (total, items)
}

/// Simple in-memory repository used for unit tests.
///
/// Unique keys are enforced the same way the SQLite indexes enforce them so
/// services see `RepositoryError::Conflict` on duplicates.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
    stale_lookups: bool,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, email: &str, password_hash: &str, admin: bool) -> Self {
        let now = Utc::now().naive_utc();
        self.create_user(&NewUser {
            username: Username::new(username).unwrap(),
            email: EmailAddress::new(email).unwrap(),
            password_hash: crate::domain::types::PasswordHash::new(password_hash).unwrap(),
            admin,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        self
    }

    pub fn with_category(self, name: &str) -> Self {
        let now = Utc::now().naive_utc();
        self.create_category(&NewCategory {
            name: CategoryName::new(name).unwrap(),
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        self
    }

    /// Make username, email and category name lookups miss, as if another
    /// writer inserted the row between the lookup and the write.
    pub fn with_stale_lookups(mut self) -> Self {
        self.stale_lookups = true;
        self
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn article_count(&self) -> usize {
        self.state.lock().unwrap().articles.len()
    }

    pub fn category_count(&self) -> usize {
        self.state.lock().unwrap().categories.len()
    }

    pub fn comment_count(&self) -> usize {
        self.state.lock().unwrap().comments.len()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }
}

impl UserReader for TestRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        let mut items = self.state.lock().unwrap().users.clone();
        items.sort_by_key(|u| u.username.to_lowercase());
        Ok(page(items, query.pagination))
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        if self.stale_lookups {
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        let wanted = username.to_lowercase();
        Ok(state
            .users
            .iter()
            .find(|u| u.username.to_lowercase() == wanted)
            .cloned())
    }

    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>> {
        if self.stale_lookups {
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == *email).cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut state = self.state.lock().unwrap();
        if let Some(field) = state.user_conflict(None, &user.username, &user.email) {
            return Err(RepositoryError::Conflict(field));
        }
        let created = User {
            id: UserId::new(state.next_id())?,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            admin: user.admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    fn create_user_with_session(
        &self,
        user: &NewUser,
        token: &SessionToken,
    ) -> RepositoryResult<User> {
        let created = self.create_user(user)?;
        let mut state = self.state.lock().unwrap();
        if state.sessions.iter().any(|(t, _)| t == token) {
            state.users.retain(|u| u.id != created.id);
            return Err(RepositoryError::Conflict("token".into()));
        }
        state.sessions.push((token.clone(), created.id));
        Ok(created)
    }

    fn update_user(&self, id: UserId, user: &UpdateUser) -> RepositoryResult<User> {
        let mut state = self.state.lock().unwrap();
        if let Some(field) = state.user_conflict(Some(id), &user.username, &user.email) {
            return Err(RepositoryError::Conflict(field));
        }
        let stored = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        if let Some(hash) = &user.password_hash {
            stored.password_hash = hash.clone();
        }
        stored.updated_at = user.updated_at;
        Ok(stored.clone())
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let authored = state
            .articles
            .iter()
            .filter(|a| a.user_id == id)
            .map(|a| a.id)
            .collect::<Vec<_>>();
        for article_id in authored {
            state.remove_article(article_id);
        }
        state.sessions.retain(|(_, user_id)| *user_id != id);
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        Ok(before - state.users.len())
    }
}

impl ArticleReader for TestRepository {
    fn list_articles(&self, query: ArticleListQuery) -> RepositoryResult<(usize, Vec<Article>)> {
        let state = self.state.lock().unwrap();
        let mut items = state
            .articles
            .iter()
            .filter(|a| query.user_id.is_none_or(|id| a.user_id == id))
            .filter(|a| {
                query
                    .category_id
                    .is_none_or(|c| state.links.contains(&(a.id, c)))
            })
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(page(items, query.pagination))
    }

    fn get_article_by_id(&self, id: ArticleId) -> RepositoryResult<Option<Article>> {
        let state = self.state.lock().unwrap();
        Ok(state.articles.iter().find(|a| a.id == id).cloned())
    }

    fn list_article_categories(&self, id: ArticleId) -> RepositoryResult<Vec<Category>> {
        let state = self.state.lock().unwrap();
        let mut items = state
            .categories
            .iter()
            .filter(|c| state.links.contains(&(id, c.id)))
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

impl ArticleWriter for TestRepository {
    fn create_article(&self, article: &NewArticle) -> RepositoryResult<Article> {
        let mut state = self.state.lock().unwrap();
        if !state.users.iter().any(|u| u.id == article.user_id) {
            return Err(RepositoryError::ValidationError("unknown author".into()));
        }
        let created = Article {
            id: ArticleId::new(state.next_id())?,
            user_id: article.user_id,
            title: article.title.clone(),
            content: article.content.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        };
        state.articles.push(created.clone());
        state.set_links(created.id, &article.category_ids);
        Ok(created)
    }

    fn update_article(&self, id: ArticleId, article: &UpdateArticle) -> RepositoryResult<Article> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.title = article.title.clone();
        stored.content = article.content.clone();
        stored.updated_at = article.updated_at;
        let updated = stored.clone();
        state.set_links(id, &article.category_ids);
        Ok(updated)
    }

    fn delete_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        Ok(self.state.lock().unwrap().remove_article(id))
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        let mut items = self.state.lock().unwrap().categories.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page(items, query.pagination))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let state = self.state.lock().unwrap();
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        if self.stale_lookups {
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        Ok(state.categories.iter().find(|c| c.name == *name).cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state.lock().unwrap();
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(RepositoryError::Conflict("name".into()));
        }
        let created = Category {
            id: CategoryId::new(state.next_id())?,
            name: category.name.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<Category> {
        let mut state = self.state.lock().unwrap();
        if state.categories.iter().any(|c| c.id != id && c.name == *name) {
            return Err(RepositoryError::Conflict("name".into()));
        }
        let stored = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.name = name.clone();
        stored.updated_at = Utc::now().naive_utc();
        Ok(stored.clone())
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|(_, c)| *c != id);
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        Ok(before - state.categories.len())
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, article_id: ArticleId) -> RepositoryResult<Vec<Comment>> {
        let state = self.state.lock().unwrap();
        let mut items = state
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items)
    }

    fn get_comment_by_id(
        &self,
        article_id: ArticleId,
        id: CommentId,
    ) -> RepositoryResult<Option<Comment>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .find(|c| c.id == id && c.article_id == article_id)
            .cloned())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let mut state = self.state.lock().unwrap();
        if !state.articles.iter().any(|a| a.id == comment.article_id) {
            return Err(RepositoryError::ValidationError("unknown article".into()));
        }
        let created = Comment {
            id: CommentId::new(state.next_id())?,
            article_id: comment.article_id,
            commenter: comment.commenter.clone(),
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(before - state.comments.len())
    }
}

impl SessionReader for TestRepository {
    fn get_session_user(&self, token: &SessionToken) -> RepositoryResult<Option<User>> {
        let state = self.state.lock().unwrap();
        let user_id = state
            .sessions
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, id)| *id);
        Ok(user_id.and_then(|id| state.users.iter().find(|u| u.id == id).cloned()))
    }
}

impl SessionWriter for TestRepository {
    fn create_session(&self, session: &NewSession) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        if state.sessions.iter().any(|(t, _)| *t == session.token) {
            return Err(RepositoryError::Conflict("token".into()));
        }
        state
            .sessions
            .push((session.token.clone(), session.user_id));
        Ok(1)
    }

    fn delete_session(&self, token: &SessionToken) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|(t, _)| t != token);
        Ok(before - state.sessions.len())
    }
}
