//! Authentication module for GitHub credentials.
//!
//! This module provides:
//! - `Credentials`: a trimmed, non-blank user/token pair
//! - `Session` and `AuthContext`: explicit auth state passed into requests
//! - `CredentialStore`: persists a validated session in a `KeyValueStore`
//! - `storage`: file, keychain and in-memory key-value backends
//!
//! Validation itself lives on `GitHubClient::validate`, which returns a new
//! `Session` rather than mutating one.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::{CredentialStore, Credentials, TOKEN_KEY, USER_KEY};
pub use session::{AuthContext, Session};
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StorageError};
