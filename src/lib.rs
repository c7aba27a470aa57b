pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod profiles;
pub mod report;
pub mod telemetry;
