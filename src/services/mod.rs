//! Classification services

pub mod classifier;
pub mod time_window;

pub use classifier::{ParsePolicy, RecordClassifier};
