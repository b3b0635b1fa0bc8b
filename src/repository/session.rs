use diesel::prelude::*;

use crate::domain::session::NewSession;
use crate::domain::types::SessionToken;
use crate::domain::user::User;
use crate::models::session::NewSession as DbNewSession;
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SessionReader, SessionWriter};

impl SessionReader for DieselRepository {
    fn get_session_user(&self, token: &SessionToken) -> RepositoryResult<Option<User>> {
        use crate::schema::{sessions, users};

        let mut conn = self.conn()?;

        let user = sessions::table
            .inner_join(users::table)
            .filter(sessions::token.eq(token.as_str()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }
}

impl SessionWriter for DieselRepository {
    fn create_session(&self, session: &NewSession) -> RepositoryResult<usize> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(sessions::table)
            .values(DbNewSession::from(session))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_session(&self, token: &SessionToken) -> RepositoryResult<usize> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;

        let affected = diesel::delete(sessions::table.filter(sessions::token.eq(token.as_str())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
