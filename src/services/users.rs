use chrono::Utc;

use crate::domain::session::SessionContext;
use crate::domain::types::{EmailAddress, SessionToken, UserId, Username};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::domain::validation::FieldErrors;
use crate::dto::users::{UserDto, UserPageDto};
use crate::forms::users::{EditUserForm, SignupForm, SignupPayload, UpdateUserPayload};
use crate::pagination::{Paginated, Pagination, USER_ARTICLES_PER_PAGE, USERS_PER_PAGE};
use crate::repository::{
    ArticleListQuery, ArticleReader, UserListQuery, UserReader, UserWriter,
};

use super::articles::article_page;
use super::passwords::hash_password;
use super::policy::{PROFILE_OWNER_WARNING, require_same_user_or_admin, require_user};
use super::sessions::new_token;
use super::{ServiceError, ServiceResult, parse_id, repo_error};

fn load_user<R>(id: UserId, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    repo.get_user_by_id(id)
        .map_err(repo_error("Failed to load user"))?
        .ok_or(ServiceError::NotFound)
}

/// Collects `username`/`email` errors for values held by another account.
fn uniqueness_errors<R>(
    username: &Username,
    email: &EmailAddress,
    except: Option<UserId>,
    repo: &R,
) -> ServiceResult<FieldErrors>
where
    R: UserReader,
{
    let mut errors = FieldErrors::new();
    let taken = |user: Option<User>| user.is_some_and(|u| Some(u.id) != except);

    let by_username = repo
        .get_user_by_username(username)
        .map_err(repo_error("Failed to look up user by username"))?;
    if taken(by_username) {
        errors.add("username", "Username has already been taken");
    }

    let by_email = repo
        .get_user_by_email(email)
        .map_err(repo_error("Failed to look up user by email"))?;
    if taken(by_email) {
        errors.add("email", "Email has already been taken");
    }
    Ok(errors)
}

pub fn list_users<R>(page: usize, repo: &R) -> ServiceResult<Paginated<UserDto>>
where
    R: UserReader,
{
    let pagination = Pagination::new(page, USERS_PER_PAGE);
    let (total, users) = repo
        .list_users(UserListQuery {
            pagination: Some(pagination),
        })
        .map_err(repo_error("Failed to list users"))?;
    Ok(Paginated::new(users, pagination, total).map(UserDto::from))
}

pub fn show_user<R>(
    user_id: i32,
    page: usize,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<UserPageDto>
where
    R: UserReader + ArticleReader,
{
    let user = load_user(parse_id(user_id, UserId::new)?, repo)?;
    let articles = article_page(
        ArticleListQuery::default().author(user.id),
        page,
        USER_ARTICLES_PER_PAGE,
        repo,
    )?;
    let can_modify = session.current_user().is_some_and(|u| u.can_modify(user.id));
    Ok(UserPageDto {
        user: user.into(),
        articles,
        can_modify,
    })
}

/// Register a new account and log it in. The account and its session are
/// stored together or not at all.
pub fn signup<R>(form: SignupForm, repo: &R) -> ServiceResult<(User, SessionToken)>
where
    R: UserReader + UserWriter,
{
    let payload = SignupPayload::try_from(form)?;
    uniqueness_errors(&payload.username, &payload.email, None, repo)?
        .into_result(())
        .map_err(ServiceError::Validation)?;

    let password_hash = hash_password(&payload.password)?;
    let token = new_token()?;
    let now = Utc::now().naive_utc();
    let user = repo
        .create_user_with_session(
            &NewUser {
                username: payload.username,
                email: payload.email,
                password_hash,
                admin: false,
                created_at: now,
                updated_at: now,
            },
            &token,
        )
        .map_err(repo_error("Failed to create user"))?;
    log::info!("Signed up user {}", user.id);

    Ok((user, token))
}

pub fn edit_user<R>(user_id: i32, session: &SessionContext, repo: &R) -> ServiceResult<UserDto>
where
    R: UserReader,
{
    require_user(session)?;
    let user = load_user(parse_id(user_id, UserId::new)?, repo)?;
    require_same_user_or_admin(session, user.id, PROFILE_OWNER_WARNING)?;
    Ok(user.into())
}

/// Update username, email and, when given, the password.
pub fn update_user<R>(
    user_id: i32,
    form: EditUserForm,
    session: &SessionContext,
    repo: &R,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    require_user(session)?;
    let user = load_user(parse_id(user_id, UserId::new)?, repo)?;
    require_same_user_or_admin(session, user.id, PROFILE_OWNER_WARNING)?;

    let payload = UpdateUserPayload::try_from(form)?;
    uniqueness_errors(&payload.username, &payload.email, Some(user.id), repo)?
        .into_result(())
        .map_err(ServiceError::Validation)?;

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    repo.update_user(
        user.id,
        &UpdateUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            updated_at: Utc::now().naive_utc(),
        },
    )
    .map_err(repo_error("Failed to update user"))
}

/// Delete a user with everything they wrote.
///
/// Returns `true` when the acting user deleted their own account, in which
/// case the caller must also forget the identity cookie.
pub fn delete_user<R>(user_id: i32, session: &SessionContext, repo: &R) -> ServiceResult<bool>
where
    R: UserReader + UserWriter,
{
    require_user(session)?;
    let user = load_user(parse_id(user_id, UserId::new)?, repo)?;
    let actor = require_same_user_or_admin(session, user.id, PROFILE_OWNER_WARNING)?;

    repo.delete_user(user.id)
        .map_err(repo_error("Failed to delete user"))?;
    log::info!("User {} deleted user {}", actor.id, user.id);
    Ok(actor.id == user.id)
}
