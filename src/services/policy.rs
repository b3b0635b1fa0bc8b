//! Authorization rules gating mutations.

use crate::domain::session::SessionContext;
use crate::domain::types::UserId;
use crate::domain::user::User;

use super::{ServiceError, ServiceResult};

pub const ARTICLE_OWNER_WARNING: &str = "You can only modify articles authored by you";
pub const COMMENT_OWNER_WARNING: &str = "You can only delete comments on articles authored by you";
pub const PROFILE_OWNER_WARNING: &str = "You can only modify your own profile";
pub const CATEGORY_CREATE_ALERT: &str = "Categories can only be created by Admin-level users";
pub const CATEGORY_MODIFY_ALERT: &str = "Categories can only be modified by Admin-level users";

/// The acting user, or [`ServiceError::Unauthenticated`] for anonymous visitors.
pub fn require_user(session: &SessionContext) -> ServiceResult<&User> {
    session.current_user().ok_or(ServiceError::Unauthenticated)
}

/// Passes when the acting user owns the resource or is an admin.
pub fn require_same_user_or_admin<'a>(
    session: &'a SessionContext,
    owner: UserId,
    warning: &str,
) -> ServiceResult<&'a User> {
    let user = require_user(session)?;
    if user.can_modify(owner) {
        Ok(user)
    } else {
        log::warn!("User {} refused to modify resource of user {owner}", user.id);
        Err(ServiceError::Forbidden(warning.to_string()))
    }
}

/// Passes only for admins. Anonymous visitors get the same alert as
/// non-admins so the caller can redirect both to the listing.
pub fn require_admin<'a>(session: &'a SessionContext, alert: &str) -> ServiceResult<&'a User> {
    match session.current_user() {
        Some(user) if user.admin => Ok(user),
        _ => Err(ServiceError::Forbidden(alert.to_string())),
    }
}
