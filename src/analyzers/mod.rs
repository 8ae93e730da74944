//! Descriptive statistics over a filtered trip dataset.
//!
//! Each aggregator takes a [`Dataset`](crate::loader::Dataset) and returns a
//! plain report struct from [`types`]; rendering lives in [`crate::output`].

pub mod duration;
pub mod station;
pub mod travel_time;
pub mod types;
pub mod user;
pub mod utility;

pub use duration::duration_stats;
pub use station::station_stats;
pub use travel_time::time_stats;
pub use user::user_stats;
