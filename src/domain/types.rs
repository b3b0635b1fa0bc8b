//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers and text length rules are enforced at the boundary. Every
//! constructor trims surrounding whitespace before checking its constraint.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum accepted length of an email address.
pub const EMAIL_MAX_LENGTH: usize = 105;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} can't be blank")]
    EmptyString(&'static str),
    /// A string is shorter or longer than allowed.
    #[error("{field} must be between {min} and {max} characters")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    /// A string is longer than allowed.
    #[error("{field} is too long (maximum is {max} characters)")]
    TooLong { field: &'static str, max: usize },
    /// Email validation failed.
    #[error("{0} is invalid")]
    InvalidEmail(&'static str),
}

impl TypeConstraintError {
    /// Name of the field the constraint applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId(field)
            | Self::EmptyString(field)
            | Self::InvalidEmail(field)
            | Self::InvalidLength { field, .. }
            | Self::TooLong { field, .. } => field,
        }
    }
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

fn require_length(
    value: String,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<String, TypeConstraintError> {
    let length = value.chars().count();
    if (min..=max).contains(&length) {
        Ok(value)
    } else {
        Err(TypeConstraintError::InvalidLength { field, min, max })
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Shared accessor and conversion impls for string newtypes.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
}

macro_rules! bounded_string_newtype {
    ($name:ident, $doc:expr, $field:expr, $min:expr, $max:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Minimum number of characters after trimming.
            pub const MIN_LENGTH: usize = $min;
            /// Maximum number of characters after trimming.
            pub const MAX_LENGTH: usize = $max;

            /// Constructs a trimmed value whose length lies in the allowed range.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                require_length(trimmed, $field, $min, $max).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(UserId, "Unique identifier for a user.", "user_id");
id_newtype!(ArticleId, "Unique identifier for an article.", "article_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(CommentId, "Unique identifier for a comment.", "comment_id");

bounded_string_newtype!(
    Username,
    "Account name, unique regardless of letter case.",
    "username",
    3,
    25
);
bounded_string_newtype!(ArticleTitle, "Article headline.", "title", 6, 100);
bounded_string_newtype!(
    CategoryName,
    "Category label, unique as a literal string.",
    "name",
    3,
    25
);

non_empty_string_newtype!(ArticleContent, "Rich text body of an article.", "content");
non_empty_string_newtype!(CommentContent, "Body of a comment.", "content");
non_empty_string_newtype!(
    CommenterName,
    "Optional display name left with a comment.",
    "commenter"
);
non_empty_string_newtype!(
    SessionToken,
    "Opaque token carried by the identity cookie.",
    "session token"
);
non_empty_string_newtype!(
    PasswordHash,
    "Argon2 PHC string of a user's password.",
    "password"
);

/// Email address normalized to lowercase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trims, lowercases and validates the address.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = trim_and_require_non_empty(value, "email")?.to_lowercase();
        if normalized.chars().count() > EMAIL_MAX_LENGTH {
            return Err(TypeConstraintError::TooLong {
                field: "email",
                max: EMAIL_MAX_LENGTH,
            });
        }
        if !normalized.as_str().validate_email() || !has_qualified_domain(&normalized) {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(normalized))
    }
}

string_newtype_impls!(EmailAddress);

/// Requires a dotted domain part such as `example.com`.
fn has_qualified_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain
                .split('.')
                .filter(|label| !label.is_empty())
                .count()
                >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        })
        .unwrap_or(false)
}
