//! Process plumbing: configuration, shared state, and middleware.

pub mod app_state;
pub mod config;
pub mod middleware;
