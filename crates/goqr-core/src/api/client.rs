//! Request helper for the GitHub REST API.
//!
//! `GitHubClient` sends every request uncached, with Basic auth attached only
//! when the caller passes an authenticated `AuthContext`.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::auth::{AuthContext, Credentials, Session};
use crate::models::UsageInfo;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Endpoint used to probe credentials. It does not count against the quota.
const RATE_LIMIT_ENDPOINT: &str = "/rate_limit";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("goqr/", env!("CARGO_PKG_VERSION"));

const ACCEPT: &str = "application/vnd.github+json";

/// Outcome of a credential probe.
#[derive(Debug, Clone)]
pub struct Validation {
    pub session: Session,
    pub usage: Option<UsageInfo>,
}

/// GitHub API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Client for the public GitHub API
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for another API root (GitHub Enterprise, a local stub)
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT);
        if is_loopback(base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(auth: &AuthContext) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-cache"));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        if let Some(value) = auth.authorization_header() {
            let mut value = header::HeaderValue::from_str(&value)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// `GET {base}{endpoint}`. Any status is returned as-is; only transport
    /// failures are errors.
    pub async fn request(&self, endpoint: &str, auth: &AuthContext) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, anonymous = auth.is_anonymous(), "GET");

        let response = self
            .client
            .get(&url)
            .headers(Self::headers(auth)?)
            .send()
            .await?;

        debug!(url = %url, status = %response.status(), "Response received");
        Ok(response)
    }

    /// Probe `/rate_limit` with the candidate credentials.
    ///
    /// A non-200 answer is not an error: it yields an anonymous session, with
    /// whatever quota the headers report. Only transport failures propagate.
    pub async fn validate(&self, candidate: Option<Credentials>) -> Result<Validation, ApiError> {
        let auth = match &candidate {
            Some(creds) => AuthContext::Basic(creds.clone()),
            None => AuthContext::Anonymous,
        };

        let response = self.request(RATE_LIMIT_ENDPOINT, &auth).await?;
        let status = response.status();
        let usage = UsageInfo::from_headers(response.headers());

        // Body is not needed, but drain it so the connection can be reused
        let _ = response.bytes().await?;

        let session = match candidate {
            Some(creds) if status == StatusCode::OK => {
                debug!(user = %creds.user, "Credentials accepted");
                Session::validated(creds)
            }
            Some(creds) => {
                warn!(user = %creds.user, status = %status, "Credentials rejected");
                Session::anonymous()
            }
            None => Session::anonymous(),
        };

        Ok(Validation { session, usage })
    }
}

/// Local API roots never go through a proxy
fn is_loopback(base_url: &str) -> bool {
    let host = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    host.starts_with("127.") || host.starts_with("localhost") || host.starts_with("[::1]")
}
