//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides the native adapters the drive façade uses when the
//! host does not inject its own:
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `ContentTypeDetector` using magic-byte sniffing with an extension fallback
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MagicByteDetector, ReqwestHttpClient, TokioFileSystem};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = Arc::new(ReqwestHttpClient::new("drive-facade")?);
//!     let fs = Arc::new(TokioFileSystem::new());
//!     let detector = Arc::new(MagicByteDetector::new());
//!
//!     // Hand these to the core configuration builder
//!     Ok(())
//! }
//! ```

mod content_type;
mod filesystem;
mod http;

pub use content_type::{MagicByteDetector, DEFAULT_CONTENT_TYPE};
pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
