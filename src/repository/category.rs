use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategoryName};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let total = categories::table.count().get_result::<i64>(&mut conn)?;
        let total = usize::try_from(total).unwrap_or_default();

        let mut items = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.sql_offset())
                .limit(pagination.sql_limit());
        }

        let items = items
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::name.eq(name.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let updated = diesel::update(categories::table.find(id.get()))
            .set((
                categories::name.eq(name.as_str()),
                categories::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{article_categories, categories};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<usize, DieselError, _>(|conn| {
            diesel::delete(
                article_categories::table.filter(article_categories::category_id.eq(id.get())),
            )
            .execute(conn)?;

            diesel::delete(categories::table.find(id.get())).execute(conn)
        })?;

        Ok(affected)
    }
}
