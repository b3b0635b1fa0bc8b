use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::dto::articles::ArticleDto;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Category page: the category and one page of its articles.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryPageDto {
    pub category: CategoryDto,
    pub articles: Paginated<ArticleDto>,
}
