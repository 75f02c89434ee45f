//! Core type definitions for the Stratum placement runtime
//!
//! This crate contains the fundamental types shared across the Stratum
//! workspace: process-wide limits, device identifiers, the common error type,
//! and the per-operator [`ParallelConfig`] descriptor. It is deliberately
//! lightweight so every other crate can depend on it without cycles.

pub mod devices;
pub mod errors;
pub mod limits;
pub mod parallel;

// Re-export commonly used types
pub use devices::*;
pub use errors::*;
pub use limits::*;
pub use parallel::*;

/// Result type used throughout Stratum
pub type Result<T> = std::result::Result<T, StratumError>;
