//! # Strings Module
//!
//! Centralizes user-facing strings and log text.

pub mod logs;
pub mod messages;
