use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::Credentials;

/// How a single request identifies itself to GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    Basic(Credentials),
}

impl AuthContext {
    /// `Basic base64(user:token)`, or `None` for anonymous requests
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::Basic(creds) => {
                let raw = format!("{}:{}", creds.user, creds.token);
                Some(format!("Basic {}", STANDARD.encode(raw)))
            }
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthContext::Anonymous)
    }
}

/// The caller-owned authentication state.
///
/// `is_authenticated()` holds only when credentials are present and the last
/// probe with them succeeded. Sessions are values: validation returns a new
/// one instead of flipping shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
    authenticated: bool,
}

impl Session {
    /// No credentials, anonymous requests.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials that a probe just accepted.
    pub fn validated(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            authenticated: true,
        }
    }

    /// Credentials read back from storage. They were only written after a
    /// successful probe, so they are trusted until the next one says otherwise.
    pub fn restored(credentials: Option<Credentials>) -> Self {
        match credentials {
            Some(creds) => Self::validated(creds),
            None => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn user(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.user.as_str())
    }

    /// Context for the next request. Unvalidated credentials are never sent.
    pub fn auth_context(&self) -> AuthContext {
        match (&self.credentials, self.authenticated) {
            (Some(creds), true) => AuthContext::Basic(creds.clone()),
            _ => AuthContext::Anonymous,
        }
    }
}
