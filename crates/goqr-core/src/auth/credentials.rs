use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::storage::KeyValueStore;
use super::Session;

pub const USER_KEY: &str = "github/auth/user";
pub const TOKEN_KEY: &str = "github/auth/token";

/// A GitHub user and personal access token. Both are non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    /// Trim both fields. Returns `None` when either one ends up blank, so a
    /// half-filled pair never exists.
    pub fn new(user: &str, token: &str) -> Option<Self> {
        let user = user.trim();
        let token = token.trim();
        if user.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            token: token.to_string(),
        })
    }
}

// Keep tokens out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Saves and restores the GitHub session under two storage keys.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the saved pair. Absent unless both keys are present.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let user = self
            .store
            .get(USER_KEY)
            .context("Failed to read saved user")?;
        let token = self
            .store
            .get(TOKEN_KEY)
            .context("Failed to read saved token")?;

        match (user, token) {
            (Some(user), Some(token)) => Ok(Credentials::new(&user, &token)),
            _ => Ok(None),
        }
    }

    /// Persist an authenticated session. Anything else clears both keys.
    pub fn save(&self, session: &Session) -> Result<()> {
        match session.credentials() {
            Some(creds) if session.is_authenticated() => {
                self.store
                    .set(USER_KEY, &creds.user)
                    .context("Failed to save user")?;
                self.store
                    .set(TOKEN_KEY, &creds.token)
                    .context("Failed to save token")?;
                info!(user = %creds.user, "Saved GitHub credentials");
            }
            _ => self.clear()?,
        }
        Ok(())
    }

    /// Remove both keys.
    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(USER_KEY)
            .context("Failed to remove saved user")?;
        self.store
            .remove(TOKEN_KEY)
            .context("Failed to remove saved token")?;
        debug!("Cleared saved GitHub credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, CredentialStore) {
        let backing = Arc::new(MemoryStore::new());
        let creds = CredentialStore::new(backing.clone());
        (backing, creds)
    }

    #[test]
    fn test_blank_fields_are_absent() {
        assert!(Credentials::new("", "token").is_none());
        assert!(Credentials::new("user", "   ").is_none());
        assert!(Credentials::new("\t", "\n").is_none());

        let creds = Credentials::new("  octocat ", " ghp_1\n").unwrap();
        assert_eq!(creds.user, "octocat");
        assert_eq!(creds.token, "ghp_1");
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("octocat", "ghp_topsecret").unwrap();
        let shown = format!("{:?}", creds);
        assert!(shown.contains("octocat"));
        assert!(!shown.contains("ghp_topsecret"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_, store) = store();
        let creds = Credentials::new("octocat", "ghp_1").unwrap();
        store.save(&Session::validated(creds.clone())).unwrap();

        assert_eq!(store.load().unwrap(), Some(creds));
    }

    #[test]
    fn test_unauthenticated_save_clears_both_keys() {
        let (backing, store) = store();
        let creds = Credentials::new("octocat", "ghp_1").unwrap();
        store.save(&Session::validated(creds)).unwrap();

        store.save(&Session::anonymous()).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(backing.get(USER_KEY).unwrap(), None);
        assert_eq!(backing.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_requires_both_keys() {
        let (backing, store) = store();
        backing.set(USER_KEY, "octocat").unwrap();
        assert_eq!(store.load().unwrap(), None);

        backing.set(TOKEN_KEY, "ghp_1").unwrap();
        assert!(store.load().unwrap().is_some());

        backing.remove(USER_KEY).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
