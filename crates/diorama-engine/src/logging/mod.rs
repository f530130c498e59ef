//! Logging utilities.
//!
//! Logger initialization lives here; every other module only talks to the
//! `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
