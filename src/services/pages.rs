use crate::domain::session::SessionContext;

/// Where the home page sends the visitor instead of rendering, if anywhere.
pub fn home_redirect(session: &SessionContext) -> Option<&'static str> {
    session.is_logged_in().then_some("/articles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, PasswordHash, SessionToken, UserId, Username};
    use crate::domain::user::User;
    use chrono::Utc;

    #[test]
    fn logged_in_visitors_skip_the_landing_page() {
        assert_eq!(home_redirect(&SessionContext::anonymous()), None);

        let now = Utc::now().naive_utc();
        let user = User {
            id: UserId::new(1).unwrap(),
            username: Username::new("johndoe").unwrap(),
            email: EmailAddress::new("john@example.com").unwrap(),
            password_hash: PasswordHash::new("hash").unwrap(),
            admin: false,
            created_at: now,
            updated_at: now,
        };
        let session = SessionContext::authenticated(SessionToken::new("t").unwrap(), user);
        assert_eq!(home_redirect(&session), Some("/articles"));
    }
}
