//! Go-link directory listing.
//!
//! Each file under the links directory of the redirect repository is one
//! short link; its name without extension is the slug.

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::api::{ApiError, GitHubClient};
use crate::auth::AuthContext;
use crate::models::{ContentEntry, UsageInfo};

pub const DEFAULT_OWNER: &str = "TEDxWarwickTechnical";
pub const DEFAULT_REPO: &str = "go";
pub const DEFAULT_LINKS_PATH: &str = "_links";

/// Slugs in server order plus the quota snapshot of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub slugs: Vec<String>,
    pub usage: Option<UsageInfo>,
}

/// Fetches the slug listing from one repository directory.
#[derive(Clone)]
pub struct LinkLister {
    client: GitHubClient,
    owner: String,
    repo: String,
    path: String,
}

impl LinkLister {
    pub fn new(client: GitHubClient, owner: &str, repo: &str, path: &str) -> Self {
        Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.trim_matches('/').to_string(),
        }
    }

    /// Lister for the default TEDxWarwick links repository
    pub fn with_defaults(client: GitHubClient) -> Self {
        Self::new(client, DEFAULT_OWNER, DEFAULT_REPO, DEFAULT_LINKS_PATH)
    }

    pub fn endpoint(&self) -> String {
        format!("/repos/{}/{}/contents/{}", self.owner, self.repo, self.path)
    }

    /// One attempt at the listing. Non-200 answers become `ApiError::Api`
    /// carrying the server message and quota snapshot.
    pub async fn refresh(&self, auth: &AuthContext) -> Result<Listing, ApiError> {
        let response = self.client.request(&self.endpoint(), auth).await?;
        let status = response.status();
        let usage = UsageInfo::from_headers(response.headers());
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ApiError::from_status(status, &body, usage));
        }

        let entries: Vec<ContentEntry> = serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Expected a directory listing: {}", e))
        })?;

        let slugs = slugs_from_entries(&entries);
        info!(count = slugs.len(), "Fetched link listing");
        Ok(Listing { slugs, usage })
    }
}

/// Extension-stripped names in listing order. Names with nothing before the
/// first `.` (dotfiles) are skipped.
pub fn slugs_from_entries(entries: &[ContentEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            let slug = entry.slug();
            if slug.is_empty() {
                debug!(name = %entry.name, "Skipping entry without a slug");
                None
            } else {
                Some(slug.to_string())
            }
        })
        .collect()
}
