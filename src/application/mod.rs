//! # Application Layer
//!
//! Contains the poll loop and process-wide logging setup.

pub mod logging;
pub mod poller;
