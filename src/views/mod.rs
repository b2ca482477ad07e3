//! Projections of a loaded report into the dashboard's views.
//!
//! Every view degrades to zeroes or an empty list with a `placeholder` message
//! when the report section it reads is missing.

pub mod events;
pub mod players;
pub mod series;
pub mod summary;
pub mod teams;
