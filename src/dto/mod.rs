//! View models handed from services to templates.

pub mod articles;
pub mod categories;
pub mod comments;
pub mod users;
