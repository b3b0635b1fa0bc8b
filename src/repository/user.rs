use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::domain::types::{EmailAddress, SessionToken, UserId, Username};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::models::session::NewSession as DbNewSession;
use crate::models::user::{NewUser as DbNewUser, User as DbUser, UserChangeset};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let total = users::table.count().get_result::<i64>(&mut conn)?;
        let total = usize::try_from(total).unwrap_or_default();

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.sql_offset())
                .limit(pagination.sql_limit());
        }

        let items = items
            .order(users::username.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok((total, items))
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        // The column is declared COLLATE NOCASE, so `=` ignores case.
        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(users::table)
            .values(DbNewUser::from(user))
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn create_user_with_session(
        &self,
        user: &NewUser,
        token: &SessionToken,
    ) -> RepositoryResult<User> {
        use crate::schema::{sessions, users};

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbUser, DieselError, _>(|conn| {
            let created = diesel::insert_into(users::table)
                .values(DbNewUser::from(user))
                .get_result::<DbUser>(conn)?;
            diesel::insert_into(sessions::table)
                .values(DbNewSession {
                    token: token.as_str(),
                    user_id: created.id,
                    created_at: user.created_at,
                })
                .execute(conn)?;
            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_user(&self, id: UserId, user: &UpdateUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let updated = diesel::update(users::table.find(id.get()))
            .set(UserChangeset::from(user))
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<usize> {
        use crate::schema::{article_categories, articles, comments, sessions, users};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<usize, DieselError, _>(|conn| {
            let authored = || {
                articles::table
                    .filter(articles::user_id.eq(id.get()))
                    .select(articles::id)
            };

            diesel::delete(comments::table.filter(comments::article_id.eq_any(authored())))
                .execute(conn)?;
            diesel::delete(
                article_categories::table
                    .filter(article_categories::article_id.eq_any(authored())),
            )
            .execute(conn)?;
            diesel::delete(articles::table.filter(articles::user_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(sessions::table.filter(sessions::user_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(users::table.find(id.get())).execute(conn)
        })?;

        Ok(affected)
    }
}
