use serde::{Deserialize, Serialize};

/// A single item of `GET /repos/{owner}/{repo}/contents/{path}`.
/// GitHub returns a lot more per entry; only the name matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ContentEntry {
    /// The link slug: the file name up to its first `.`.
    pub fn slug(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }
}

/// Error body GitHub sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
