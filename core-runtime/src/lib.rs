//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the drive façade:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the validated configuration
//! that capability wiring starts from.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, DriveEndpoints};
pub use error::{Error, Result};
