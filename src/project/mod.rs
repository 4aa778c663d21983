//! Projects and their derived statistics

pub mod model;
pub mod stats;
pub mod store;

pub use model::{Project, ProjectStatus};
pub use stats::ProjectStats;
pub use store::ProjectStore;
