use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{ArticleContent, ArticleTitle, CategoryId};
use crate::domain::validation::FieldErrors;
use crate::dto::articles::ArticleDto;
use crate::forms::{parse_field, trimmed, validation_errors};

pub const UNKNOWN_CATEGORY: &str = "Category does not exist";

/// Article create/edit form.
///
/// `category_ids` arrives as a repeated key from a multi-select, which
/// `serde_urlencoded` cannot map onto a struct, so the route receives raw
/// pairs and builds the form with [`ArticleForm::from_pairs`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ArticleForm {
    #[validate(length(min = 6, max = 100, message = "Title must be between 6 and 100 characters"))]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    /// Set when a submitted category id was not a number.
    #[serde(skip)]
    pub unknown_category: bool,
}

impl ArticleForm {
    /// Build the form from decoded `application/x-www-form-urlencoded` pairs.
    /// Blank category ids are ignored; other unparseable ones are flagged.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value,
                "content" => form.content = value,
                "category_ids" | "category_ids[]" => {
                    let value = value.trim();
                    if value.is_empty() {
                        continue;
                    }
                    match value.parse() {
                        Ok(id) => form.category_ids.push(id),
                        Err(_) => form.unknown_category = true,
                    }
                }
                _ => {}
            }
        }
        form
    }
}

impl From<&ArticleDto> for ArticleForm {
    fn from(value: &ArticleDto) -> Self {
        Self {
            title: value.title.clone(),
            content: value.content.clone(),
            category_ids: value.category_ids(),
            unknown_category: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePayload {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub category_ids: Vec<CategoryId>,
}

impl TryFrom<ArticleForm> for ArticlePayload {
    type Error = FieldErrors;

    fn try_from(mut value: ArticleForm) -> Result<Self, Self::Error> {
        value.title = trimmed(value.title);
        value.content = trimmed(value.content);
        let mut errors = validation_errors(&value);
        let title = parse_field(&mut errors, ArticleTitle::new(value.title));
        let content = parse_field(&mut errors, ArticleContent::new(value.content));

        if value.unknown_category {
            errors.add("category_ids", UNKNOWN_CATEGORY);
        }

        let mut category_ids = Vec::with_capacity(value.category_ids.len());
        for id in value.category_ids {
            if let Some(id) = parse_field(&mut errors, CategoryId::new(id)) {
                category_ids.push(id);
            }
        }

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(Self {
                title,
                content,
                category_ids,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str) -> ArticleForm {
        ArticleForm {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn collects_repeated_category_ids() {
        let form = ArticleForm::from_pairs(vec![
            ("title".into(), "Hello world".into()),
            ("content".into(), "Body".into()),
            ("category_ids[]".into(), "1".into()),
            ("category_ids[]".into(), "3".into()),
            ("category_ids[]".into(), "".into()),
        ]);
        assert_eq!(form.title, "Hello world");
        assert_eq!(form.category_ids, vec![1, 3]);
    }

    #[test]
    fn title_bounds() {
        assert!(ArticlePayload::try_from(form("Short", "Body")).is_err());
        assert!(ArticlePayload::try_from(form("Sixsix", "Body")).is_ok());
        assert!(ArticlePayload::try_from(form(&"x".repeat(100), "Body")).is_ok());
        let errors = ArticlePayload::try_from(form(&"x".repeat(101), "Body")).unwrap_err();
        assert!(errors.contains_field("title"));
    }

    #[test]
    fn content_is_required() {
        let errors = ArticlePayload::try_from(form("A proper title", "  ")).unwrap_err();
        assert!(errors.contains_field("content"));
        assert!(!errors.contains_field("title"));
    }

    #[test]
    fn non_numeric_category_id_is_a_field_error() {
        let form = ArticleForm::from_pairs(vec![
            ("title".into(), "Hello world".into()),
            ("content".into(), "Body".into()),
            ("category_ids[]".into(), "rust".into()),
        ]);
        assert!(form.category_ids.is_empty());
        let errors = ArticlePayload::try_from(form).unwrap_err();
        assert!(errors.contains_field("category_ids"));
        assert_eq!(errors.to_string(), UNKNOWN_CATEGORY);
    }

    #[test]
    fn title_length_ignores_surrounding_whitespace() {
        let title = format!("  {}  ", "x".repeat(100));
        let payload = ArticlePayload::try_from(form(&title, "Body")).unwrap();
        assert_eq!(payload.title.as_str().len(), 100);
    }
}
