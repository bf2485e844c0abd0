pub mod errors;
pub mod services;
pub mod tracker_manager;
pub mod utils;

pub use tracker_manager::{MutationError, TrackerManager};
