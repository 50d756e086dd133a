//! Scenario runner for the reactive-examples pipelines

pub mod config;
pub mod logging;
pub mod scenarios;

pub use config::{DemoConfig, LogFormat, LoggingConfig};
pub use scenarios::Scenarios;
