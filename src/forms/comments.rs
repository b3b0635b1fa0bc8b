use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{CommentContent, CommenterName};
use crate::domain::validation::FieldErrors;
use crate::forms::{parse_field, trimmed, validation_errors};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(max = 50, message = "Commenter is too long (maximum is 50 characters)"))]
    pub commenter: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentPayload {
    pub commenter: Option<CommenterName>,
    pub content: CommentContent,
}

impl TryFrom<CommentForm> for CommentPayload {
    type Error = FieldErrors;

    fn try_from(mut value: CommentForm) -> Result<Self, Self::Error> {
        value.commenter = trimmed(value.commenter);
        value.content = trimmed(value.content);
        let mut errors = validation_errors(&value);
        let content = parse_field(&mut errors, CommentContent::new(value.content));

        match content {
            Some(content) if errors.is_empty() => Ok(Self {
                // A blank display name means anonymous.
                commenter: CommenterName::new(value.commenter).ok(),
                content,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_commenter_is_anonymous() {
        let form = CommentForm {
            commenter: "  ".into(),
            content: "Nice post".into(),
        };
        let payload: CommentPayload = form.try_into().unwrap();
        assert_eq!(payload.commenter, None);
    }

    #[test]
    fn content_is_required() {
        let form = CommentForm {
            commenter: "Ann".into(),
            content: "".into(),
        };
        let errors = CommentPayload::try_from(form).unwrap_err();
        assert!(errors.contains_field("content"));
    }
}
