//! Login, logout and resolution of the identity cookie.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::session::{NewSession, SessionContext};
use crate::domain::types::{EmailAddress, SessionToken, UserId};
use crate::domain::user::User;
use crate::forms::sessions::LoginForm;
use crate::repository::{SessionReader, SessionWriter, UserReader};

use super::passwords::{verify_dummy, verify_password};
use super::{ServiceError, ServiceResult, repo_error};

/// Resolve the token carried by the identity cookie.
///
/// A missing token, an unknown token and a token whose user no longer exists
/// all resolve to an anonymous context.
pub fn resolve_session<R>(token: Option<&str>, repo: &R) -> ServiceResult<SessionContext>
where
    R: SessionReader,
{
    let Some(token) = token.and_then(|t| SessionToken::new(t).ok()) else {
        return Ok(SessionContext::anonymous());
    };

    match repo
        .get_session_user(&token)
        .map_err(repo_error("Failed to resolve session"))?
    {
        Some(user) => Ok(SessionContext::authenticated(token, user)),
        None => Ok(SessionContext::anonymous()),
    }
}

/// Check an email/password pair.
///
/// Unknown emails and wrong passwords fail identically. Credentials are never
/// logged.
pub fn authenticate<R>(email: &str, password: &str, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let Ok(email) = EmailAddress::new(email) else {
        verify_dummy(password);
        log::warn!("Rejected login with malformed email");
        return Err(ServiceError::AuthenticationFailed);
    };

    let user = repo
        .get_user_by_email(&email)
        .map_err(repo_error("Failed to look up user for login"))?;

    let verified = match &user {
        Some(user) => verify_password(password, &user.password_hash),
        None => verify_dummy(password),
    };

    match user {
        Some(user) if verified => Ok(user),
        _ => {
            log::warn!("Rejected login attempt");
            Err(ServiceError::AuthenticationFailed)
        }
    }
}

/// A random, unguessable session token.
pub(crate) fn new_token() -> ServiceResult<SessionToken> {
    Ok(SessionToken::new(Uuid::new_v4().to_string())?)
}

/// Persist a fresh session for `user_id` and return its token.
pub fn start_session<R>(user_id: UserId, repo: &R) -> ServiceResult<SessionToken>
where
    R: SessionWriter,
{
    let token = new_token()?;
    let session = NewSession {
        token: token.clone(),
        user_id,
        created_at: Utc::now().naive_utc(),
    };
    repo.create_session(&session)
        .map_err(repo_error("Failed to create session"))?;
    log::info!("Started session for user {user_id}");
    Ok(token)
}

/// Authenticate the submitted form and open a session.
pub fn login<R>(form: &LoginForm, repo: &R) -> ServiceResult<(User, SessionToken)>
where
    R: UserReader + SessionWriter,
{
    let user = authenticate(&form.email, &form.password, repo)?;
    let token = start_session(user.id, repo)?;
    Ok((user, token))
}

/// Drop the session record behind `session`, if any.
pub fn logout<R>(session: &SessionContext, repo: &R) -> ServiceResult<()>
where
    R: SessionWriter,
{
    if let Some(token) = &session.token {
        repo.delete_session(token)
            .map_err(repo_error("Failed to delete session"))?;
    }
    Ok(())
}
