pub mod completions;
pub mod config;
pub mod habit;
pub mod sound;
pub mod stats;
pub mod task;
pub mod timer;
pub mod today;
