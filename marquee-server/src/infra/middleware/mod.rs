//! Tower middleware applied around the API routes.

pub mod rate_limit;
