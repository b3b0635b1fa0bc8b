//! Page-number pagination shared by repositories and templates.

use serde::Serialize;

pub const ARTICLES_PER_PAGE: usize = 5;
pub const USERS_PER_PAGE: usize = 5;
pub const CATEGORIES_PER_PAGE: usize = 16;
pub const CATEGORY_ARTICLES_PER_PAGE: usize = 5;
pub const USER_ARTICLES_PER_PAGE: usize = 5;

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip. Saturates for pages far past the end.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }

    /// [`Self::offset`] as an SQL `OFFSET`, capped at `i64::MAX`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// [`Self::limit`] as an SQL `LIMIT`, capped at `i64::MAX`.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit()).unwrap_or(i64::MAX)
    }
}

/// One page of items along with the data needed to render page links.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Pages requested past the end are reported as `pages + 1`.
    pub fn new(items: Vec<T>, pagination: Pagination, total: usize) -> Self {
        let pages = total.div_ceil(pagination.per_page).max(1);
        Self {
            items,
            page: pagination.page.min(pages + 1),
            pages,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            total: self.total,
        }
    }
}
