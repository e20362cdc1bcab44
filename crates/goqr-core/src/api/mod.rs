//! GitHub REST API client module.
//!
//! This module provides the `GitHubClient` request helper and the credential
//! probe against `/rate_limit`. Authentication is HTTP Basic with a user name
//! and personal access token, supplied per request through `AuthContext`.

pub mod client;
pub mod error;

pub use client::{GitHubClient, Validation, DEFAULT_BASE_URL};
pub use error::ApiError;
