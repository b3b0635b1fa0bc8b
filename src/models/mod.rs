//! Diesel row types and their conversions to and from domain entities.

pub mod article;
pub mod category;
pub mod comment;
pub mod config;
pub mod session;
pub mod user;
