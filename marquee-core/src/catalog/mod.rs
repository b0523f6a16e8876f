//! Application services: the listing engine and the engagement tracker.

pub mod engagement;
pub mod movies;

pub use engagement::EngagementTracker;
pub use movies::{MovieCatalog, NEW_RELEASE_WINDOW_DAYS, new_release_threshold};
