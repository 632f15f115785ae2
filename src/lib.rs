pub mod config;
pub mod error;
pub mod platform;
pub mod progress;
pub mod queue;
pub mod workflow;
