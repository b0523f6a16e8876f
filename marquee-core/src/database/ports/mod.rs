//! Repository ports. Services depend on these traits only; the concrete
//! store behind them is chosen at unit-of-work construction.

pub mod movie_views;
pub mod movies;
pub mod users;

pub use movie_views::MovieViewRepository;
pub use movies::MovieRepository;
pub use users::UserRepository;
