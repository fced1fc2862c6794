//! # Diabetes API Library
//!
//! This library exposes the server modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod service;

// Re-export diabetes_core for convenience
pub use diabetes_core;
