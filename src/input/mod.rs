//! Input handling: CSV datasets, sample data and custom outcome files

pub mod datasets;
pub mod file_detector;
pub mod manager;
pub mod mock;
pub mod text_extractor;

pub use datasets::{CourseOutcome, Datasets};
pub use manager::InputManager;
