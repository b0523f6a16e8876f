//! Request handlers, grouped by resource.

pub mod health;
pub mod movies;
pub mod users;
