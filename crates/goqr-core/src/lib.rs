//! goqr core library.
//!
//! Everything the `goqr` front end needs that is not UI wiring:
//!
//! - `api`: the GitHub request helper and credential probe
//! - `auth`: credentials, the explicit `Session`, and durable key-value storage
//! - `links`: the go-link directory listing
//! - `qr`: module-grid encoding and the masked two-color SVG renderer
//! - `config`: on-disk configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod links;
pub mod models;
pub mod qr;
pub mod utils;

pub use api::{ApiError, GitHubClient};
pub use auth::{AuthContext, CredentialStore, Credentials, Session};
pub use config::Config;
pub use links::{LinkLister, Listing};
pub use models::UsageInfo;
