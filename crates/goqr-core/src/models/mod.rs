//! Data models for GitHub responses.
//!
//! - `UsageInfo`: rate-limit quota snapshot read from response headers
//! - `ContentEntry`: one item of a repository directory listing

pub mod content;
pub mod usage;

pub use content::ContentEntry;
pub use usage::UsageInfo;
