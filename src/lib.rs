pub mod allocation;
pub mod cli;
pub mod config;
pub mod error;
pub mod records;
pub mod run;
pub mod telemetry;
