pub mod filter;
pub mod grab;
pub mod report;
pub mod types;
