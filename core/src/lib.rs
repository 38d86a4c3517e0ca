pub mod config;
pub mod determinism;
pub mod report;
pub mod sanitize;

pub mod error;
