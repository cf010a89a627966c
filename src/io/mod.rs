//! Input/output operations
//!
//! This module contains:
//! - Command-line parsing and run wiring
//! - Run configuration, constants and validation
//! - Error types
//! - PNG encoding, decoding and file output
//! - Logging and progress reporting

/// Command-line interface
pub mod cli;
/// Constants and run configuration
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Image loading, encoding and saving
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress bar reporting
pub mod progress;
