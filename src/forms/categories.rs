use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::CategoryName;
use crate::domain::validation::FieldErrors;
use crate::forms::{parse_field, trimmed, validation_errors};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 3, max = 25, message = "Name must be between 3 and 25 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPayload {
    pub name: CategoryName,
}

impl TryFrom<CategoryForm> for CategoryPayload {
    type Error = FieldErrors;

    fn try_from(mut value: CategoryForm) -> Result<Self, Self::Error> {
        value.name = trimmed(value.name);
        let mut errors = validation_errors(&value);
        match parse_field(&mut errors, CategoryName::new(value.name)) {
            Some(name) if errors.is_empty() => Ok(Self { name }),
            _ => Err(errors),
        }
    }
}
