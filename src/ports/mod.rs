//! Port traits for configuration input and report output.

pub mod config_port;
pub mod report_port;
