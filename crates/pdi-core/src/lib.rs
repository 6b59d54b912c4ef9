//! Persistence Diagram Intensity core library
//!
//! This library estimates the intensity of a persistence diagram:
//! - Gamma marginals fitted by method of moments
//! - Grid-based posterior refinement and MAP selection
//! - Joint intensity surfaces over (creation, destruction)
//! - Diagram file parsing and configuration loading
//! - Exit codes and structured logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod diagram;
pub mod error;
pub mod estimate;
pub mod exit_codes;
pub mod logging;
pub mod output;

pub use error::{Error, ErrorCategory, Result};

/// Schema version of JSON payloads.
pub const SCHEMA_VERSION: &str = "1.0.0";
