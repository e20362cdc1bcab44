//! Application state for the goqr front end.
//!
//! `App` owns the configuration, the API client, the credential store and the
//! current `Session`, and exposes one method per user action.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use goqr_core::api::{ApiError, GitHubClient};
use goqr_core::auth::{CredentialStore, Credentials, KeyValueStore, Session};
use goqr_core::config::Config;
use goqr_core::links::{LinkLister, Listing};
use goqr_core::models::UsageInfo;
use goqr_core::qr;

/// Result of a login attempt. A rejected login is not an error.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub authenticated: bool,
    pub usage: Option<UsageInfo>,
}

/// A rendered code ready to save or print.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub slug: String,
    pub url: String,
    pub file_name: String,
    pub svg: String,
}

pub struct App {
    config: Config,
    /// Where `config` is written back; `None` keeps it in memory only
    config_path: Option<PathBuf>,
    client: GitHubClient,
    lister: LinkLister,
    credentials: CredentialStore,
    session: Session,
}

impl App {
    /// Build from the user's config and restore any saved session
    pub fn new(config: Config) -> Result<Self> {
        let store = config.open_store()?;
        let config_path = Config::default_path().ok();
        Self::with_store(config, store, config_path)
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let client = GitHubClient::with_base_url(&config.api_base_url)
            .context("Failed to build HTTP client")?;
        let lister = LinkLister::new(
            client.clone(),
            &config.owner,
            &config.repo,
            &config.links_path,
        );
        let credentials = CredentialStore::new(store);

        let saved = match credentials.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Failed to read saved credentials, continuing anonymously");
                None
            }
        };
        let session = Session::restored(saved);
        debug!(
            authenticated = session.is_authenticated(),
            user = ?session.user(),
            "Session restored"
        );

        Ok(Self {
            config,
            config_path,
            client,
            lister,
            credentials,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Probe the given credentials and save or clear them accordingly.
    ///
    /// Blank fields log out. A transport failure is returned and leaves both
    /// the session and storage untouched.
    pub async fn login(&mut self, user: &str, token: &str) -> Result<LoginOutcome> {
        let candidate = Credentials::new(user, token);
        if candidate.is_none() {
            debug!("Blank credentials, probing anonymously");
        }

        let validation = self.client.validate(candidate).await?;
        self.session = validation.session;
        self.credentials.save(&self.session)?;

        if let Some(user) = self.session.user() {
            info!(user, "Login successful");
            self.config.last_user = Some(user.to_string());
            self.remember_user(user);
        } else {
            warn!("Login rejected, saved credentials cleared");
        }

        Ok(LoginOutcome {
            authenticated: self.session.is_authenticated(),
            usage: validation.usage,
        })
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session = Session::anonymous();
        self.credentials.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Re-probe the current session. Credentials that no longer work are
    /// cleared, same as a failed login.
    pub async fn usage(&mut self) -> Result<Option<UsageInfo>> {
        let validation = self
            .client
            .validate(self.session.credentials().cloned())
            .await?;

        if self.session.is_authenticated() && !validation.session.is_authenticated() {
            warn!("Saved credentials were rejected, clearing them");
            self.credentials.clear()?;
        }
        self.session = validation.session;
        Ok(validation.usage)
    }

    fn remember_user(&self, user: &str) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = Config::remember_user(path, user) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    // =========================================================================
    // Links and codes
    // =========================================================================

    pub async fn list(&self) -> Result<Listing, ApiError> {
        self.lister.refresh(&self.session.auth_context()).await
    }

    pub fn generate(&self, slug: &str) -> Result<GeneratedCode> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(anyhow!("Slug must not be empty"));
        }

        let url = qr::redirect_url(&self.config.redirect_base, slug);
        let mark = qr::mark_for_url(&url, &self.config.accent_color)
            .with_context(|| format!("Failed to encode {}", url))?;
        debug!(url = %url, modules = mark.size, "Rendered QR code");

        Ok(GeneratedCode {
            slug: slug.to_string(),
            file_name: qr::download_file_name(slug),
            svg: mark.to_svg(),
            url,
        })
    }

    /// Write a generated code into `dir`, or the configured output directory
    pub fn save(&self, code: &GeneratedCode, dir: Option<&Path>) -> Result<PathBuf> {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.output_dir());
        qr::write_svg(&dir, &code.slug, &code.svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goqr_core::auth::{MemoryStore, TOKEN_KEY, USER_KEY};
    use goqr_core::config::StorageBackend;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    /// Answer every request with `status` from a background thread
    fn stub_api(status: u16) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { return };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let body = r#"{"message":"Bad credentials"}"#;
                let response = format!(
                    "HTTP/1.1 {} Stub\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     X-RateLimit-Limit: 60\r\n\
                     X-RateLimit-Remaining: 59\r\n\
                     X-RateLimit-Reset: 1700000000\r\n\
                     Connection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    fn saved_pair() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "octocat").unwrap();
        store.set(TOKEN_KEY, "ghp_1").unwrap();
        store
    }

    fn online_app(status: u16, store: Arc<MemoryStore>, config_path: Option<PathBuf>) -> App {
        let config = Config {
            api_base_url: stub_api(status),
            ..Config::default()
        };
        App::with_store(config, store, config_path).unwrap()
    }

    /// Config pointing at a port nothing listens on
    fn offline_config() -> Config {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Config {
            api_base_url: format!("http://{}", addr),
            ..Config::default()
        }
    }

    fn app_with(store: Arc<MemoryStore>) -> App {
        App::with_store(offline_config(), store, None).unwrap()
    }

    #[test]
    fn test_bootstrap_restores_saved_session() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "octocat").unwrap();
        store.set(TOKEN_KEY, "ghp_1").unwrap();

        let app = app_with(store);
        assert!(app.session().is_authenticated());
        assert_eq!(app.session().user(), Some("octocat"));
    }

    #[test]
    fn test_bootstrap_without_saved_session() {
        let app = app_with(Arc::new(MemoryStore::new()));
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure_keeps_state() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "octocat").unwrap();
        store.set(TOKEN_KEY, "ghp_1").unwrap();
        let mut app = app_with(store.clone());

        assert!(app.login("someone", "ghp_2").await.is_err());

        assert!(app.session().is_authenticated());
        assert_eq!(store.get(USER_KEY).unwrap().as_deref(), Some("octocat"));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("ghp_1"));
    }

    #[tokio::test]
    async fn test_blank_login_clears_saved_pair() {
        let store = saved_pair();
        let mut app = online_app(200, store.clone(), None);
        assert!(app.session().is_authenticated());

        let outcome = app.login("   ", "ghp_2").await.unwrap();

        assert!(!outcome.authenticated);
        assert_eq!(outcome.usage.map(|u| u.remaining), Some(59));
        assert!(!app.session().is_authenticated());
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_login_clears_saved_pair() {
        let store = saved_pair();
        let mut app = online_app(401, store.clone(), None);

        let outcome = app.login("octocat", "ghp_revoked").await.unwrap();

        assert!(!outcome.authenticated);
        assert!(!app.session().is_authenticated());
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_writes_only_last_user_to_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"repo": "links"}"#).unwrap();

        let store = Arc::new(MemoryStore::new());
        let config = Config {
            api_base_url: stub_api(200),
            storage: StorageBackend::Memory,
            ..Config::default()
        };
        let mut app = App::with_store(config, store.clone(), Some(path.clone())).unwrap();

        let outcome = app.login(" octocat ", "ghp_1").await.unwrap();
        assert!(outcome.authenticated);
        assert_eq!(app.config().last_user.as_deref(), Some("octocat"));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("ghp_1"));

        let on_disk = Config::load_from(&path).unwrap();
        assert_eq!(on_disk.last_user.as_deref(), Some("octocat"));
        assert_eq!(on_disk.repo, "links");
        assert_eq!(on_disk.storage, StorageBackend::File);
        assert_eq!(on_disk.api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_logout_clears_storage() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "octocat").unwrap();
        store.set(TOKEN_KEY, "ghp_1").unwrap();
        let mut app = app_with(store.clone());

        app.logout().unwrap();
        assert!(!app.session().is_authenticated());
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_generate_and_save() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let code = app.generate(" tickets ").unwrap();
        assert_eq!(code.url, "https://go.tedxw.co/tickets");
        assert_eq!(code.file_name, "tedxwarwick-qrcode-tickets.svg");
        assert!(code.svg.starts_with("<svg"));
        assert!(code.svg.contains("#da291c"));

        let dir = TempDir::new().unwrap();
        let path = app.save(&code, Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("tedxwarwick-qrcode-tickets.svg"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), code.svg);

        assert!(app.generate("  ").is_err());
    }
}
