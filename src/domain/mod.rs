//! Storage-independent entities and value types.

pub mod article;
pub mod category;
pub mod comment;
pub mod session;
pub mod types;
pub mod user;
pub mod validation;
