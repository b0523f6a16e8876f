//! Application-level composition.

pub mod unit_of_work;
