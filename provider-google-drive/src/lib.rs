//! # Google Drive Provider
//!
//! Folder-path based file operations over Google Drive API v3.
//!
//! ## Overview
//!
//! Callers address files by an ordered list of folder names plus a file
//! name instead of opaque Drive identifiers. This module provides:
//! - Query strings for folder and file lookups ([`query`])
//! - Folder path resolution that creates missing folders ([`FolderResolver`])
//! - Paginated listings with optional name filtering ([`ListingEngine`])
//! - Upload, download, delete and public sharing ([`GoogleDriveService`])
//!
//! Every [`GoogleDriveService`] operation first obtains a valid token from
//! a [`CredentialGate`](core_auth::CredentialGate). Remote calls go through
//! the [`DriveApi`] capability, implemented over HTTP by [`HttpDriveApi`].
//!
//! ## Example
//!
//! ```ignore
//! use provider_google_drive::{FolderPath, GoogleDriveService, PageRequest};
//!
//! let path = FolderPath::new(["invoices", "2024"])?;
//! let uploaded = service
//!     .upload_file_with_visibility(&path, Path::new("/tmp/march.pdf"), true)
//!     .await?;
//! println!("shared at {}", uploaded.export_url());
//!
//! let page = service.list_folder_files(&path, PageRequest::default()).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod listing;
pub mod model;
pub mod query;
pub mod resolver;
pub mod service;
pub mod types;

pub use api::{DriveApi, ListRequest, MediaContent, PermissionRequest};
pub use client::HttpDriveApi;
pub use error::{ApiResult, DriveError, ProviderFailure, Result};
pub use listing::ListingEngine;
pub use model::{FolderPath, PageRequest, RemoteFile, RemoteFileList};
pub use resolver::FolderResolver;
pub use service::GoogleDriveService;
