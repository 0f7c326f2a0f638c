//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - HTTP plumbing shared by the network adapters
//! - Setup and component wiring

pub mod config;
pub mod http;
pub mod logging;
pub mod setup;
