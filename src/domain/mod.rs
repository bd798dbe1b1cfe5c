//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the application.
//! Independent of specific HTTP clients, serving as the contract for other layers.

pub mod config;
pub mod error;
pub mod paths;
pub mod traits;
pub mod types;
