use std::collections::BTreeSet;

use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::domain::article::{Article, NewArticle, UpdateArticle};
use crate::domain::category::Category;
use crate::domain::types::{ArticleId, CategoryId};
use crate::models::article::{
    Article as DbArticle, ArticleCategory as DbArticleCategory, NewArticle as DbNewArticle,
};
use crate::models::category::Category as DbCategory;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ArticleListQuery, ArticleReader, ArticleWriter, DieselRepository};

/// Join rows for `article_id`, one per distinct category.
fn category_links(article_id: i32, category_ids: &[CategoryId]) -> Vec<DbArticleCategory> {
    category_ids
        .iter()
        .map(|id| id.get())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|category_id| DbArticleCategory {
            article_id,
            category_id,
        })
        .collect()
}

fn replace_category_links(
    conn: &mut SqliteConnection,
    article_id: i32,
    category_ids: &[CategoryId],
) -> Result<(), DieselError> {
    use crate::schema::article_categories;

    diesel::delete(
        article_categories::table.filter(article_categories::article_id.eq(article_id)),
    )
    .execute(conn)?;

    let links = category_links(article_id, category_ids);
    if !links.is_empty() {
        diesel::insert_into(article_categories::table)
            .values(&links)
            .execute(conn)?;
    }
    Ok(())
}

impl ArticleReader for DieselRepository {
    fn list_articles(&self, query: ArticleListQuery) -> RepositoryResult<(usize, Vec<Article>)> {
        use crate::schema::{article_categories, articles};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = articles::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                items = items.filter(articles::user_id.eq(user_id.get()));
            }

            if let Some(category_id) = query.category_id {
                items = items.filter(
                    articles::id.eq_any(
                        article_categories::table
                            .filter(article_categories::category_id.eq(category_id.get()))
                            .select(article_categories::article_id),
                    ),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)?;
        let total = usize::try_from(total).unwrap_or_default();

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.sql_offset())
                .limit(pagination.sql_limit());
        }

        let items = items
            .order((articles::created_at.desc(), articles::id.desc()))
            .load::<DbArticle>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Article>, _>>()?;

        Ok((total, items))
    }

    fn get_article_by_id(&self, id: ArticleId) -> RepositoryResult<Option<Article>> {
        use crate::schema::articles;

        let mut conn = self.conn()?;

        let article = articles::table
            .find(id.get())
            .first::<DbArticle>(&mut conn)
            .optional()?;

        Ok(article.map(TryInto::try_into).transpose()?)
    }

    fn list_article_categories(&self, id: ArticleId) -> RepositoryResult<Vec<Category>> {
        use crate::schema::{article_categories, categories};

        let mut conn = self.conn()?;

        let items = categories::table
            .filter(
                categories::id.eq_any(
                    article_categories::table
                        .filter(article_categories::article_id.eq(id.get()))
                        .select(article_categories::category_id),
                ),
            )
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }
}

impl ArticleWriter for DieselRepository {
    fn create_article(&self, article: &NewArticle) -> RepositoryResult<Article> {
        use crate::schema::articles;

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbArticle, DieselError, _>(|conn| {
            let created = diesel::insert_into(articles::table)
                .values(DbNewArticle::from(article))
                .get_result::<DbArticle>(conn)?;
            replace_category_links(conn, created.id, &article.category_ids)?;
            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_article(&self, id: ArticleId, article: &UpdateArticle) -> RepositoryResult<Article> {
        use crate::schema::articles;

        let mut conn = self.conn()?;

        let updated = conn.transaction::<DbArticle, DieselError, _>(|conn| {
            let updated = diesel::update(articles::table.find(id.get()))
                .set((
                    articles::title.eq(article.title.as_str()),
                    articles::content.eq(article.content.as_str()),
                    articles::updated_at.eq(article.updated_at),
                ))
                .get_result::<DbArticle>(conn)?;
            replace_category_links(conn, updated.id, &article.category_ids)?;
            Ok(updated)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        use crate::schema::{article_categories, articles, comments};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<usize, DieselError, _>(|conn| {
            diesel::delete(comments::table.filter(comments::article_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(
                article_categories::table.filter(article_categories::article_id.eq(id.get())),
            )
            .execute(conn)?;
            diesel::delete(articles::table.find(id.get())).execute(conn)
        })?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_links_are_deduplicated() {
        let ids = [
            CategoryId::new(2).unwrap(),
            CategoryId::new(1).unwrap(),
            CategoryId::new(2).unwrap(),
        ];
        let links = category_links(7, &ids);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.article_id == 7));
        assert_eq!(links[0].category_id, 1);
    }
}
