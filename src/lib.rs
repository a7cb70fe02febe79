//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (currently only `core-service`). Host applications can
//! depend on `drive-workspace` and enable `desktop-shims` to get a drive
//! façade wired with the native HTTP client, filesystem and content sniffer.

#[cfg(feature = "desktop-shims")]
pub use core_service::{bootstrap, bootstrap_from_env, CoreError, CoreService};
