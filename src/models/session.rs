use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::session::NewSession as DomainNewSession;

/// Diesel model representing the `sessions` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub token: &'a str,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

impl<'a> From<&'a DomainNewSession> for NewSession<'a> {
    fn from(session: &'a DomainNewSession) -> Self {
        Self {
            token: session.token.as_str(),
            user_id: session.user_id.get(),
            created_at: session.created_at,
        }
    }
}
