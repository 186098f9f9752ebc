//! Shared ambient stack for the lab tools
//!
//! - logging initialisation (bracketed text or JSON)
//! - layered configuration: defaults, YAML file, environment

pub mod config;
pub mod error;
pub mod logging;

pub use config::LabConfig;
pub use error::{Error, Result};
