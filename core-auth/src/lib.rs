//! # Authentication Module
//!
//! Credential lifecycle for the Google Drive façade.
//!
//! ## Overview
//!
//! This module turns a Google secret file into short-lived OAuth 2.0 access
//! tokens and guards every remote call with a [`CredentialGate`] that keeps
//! the token fresh.
//!
//! ## Features
//!
//! - `authorized_user` secret files refreshed through the `refresh_token` grant
//! - Lazy credential initialization on first use
//! - Expiry checks against an injectable [`Clock`](bridge_traits::Clock)
//! - Serialized refreshes behind an async mutex
//!
//! The [`Credentials`] and [`CredentialSource`] traits are the seams: hosts
//! with their own credential plumbing can plug it in without touching the
//! gate.

pub mod authorized_user;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod oauth;
pub mod types;

pub use authorized_user::{FileCredentialSource, RefreshTokenCredentials};
pub use credentials::{CredentialSource, Credentials};
pub use error::{AuthError, Result};
pub use gate::CredentialGate;
pub use oauth::TokenEndpoint;
pub use types::{AccessToken, AuthorizedUserSecret};
