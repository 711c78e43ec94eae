//! Authentication context shared by every data-access call.
//!
//! A [`Session`] owns the bearer token: it attaches it to outgoing requests,
//! stores it at login, clears it at logout and expires it when the server
//! rejects it with a 401.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Persistent storage for the bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Keeps the token in a single file, readable across process runs.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Process-local storage, used by tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

pub struct Session {
    store: Box<dyn TokenStore>,
    token: RwLock<Option<String>>,
    expired: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("expired", &self.expired.load(Ordering::Relaxed))
            .finish()
    }
}

impl Session {
    /// Opens a session, picking up any token left in `store`.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let token = store.load().unwrap_or_else(|err| {
            log::warn!("Failed to read stored token: {err}");
            None
        });
        Self {
            store: Box::new(store),
            token: RwLock::new(token),
            expired: AtomicBool::new(false),
        }
    }

    /// Session without persistence and without a token.
    pub fn anonymous() -> Self {
        Self::new(MemoryTokenStore::default())
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Stores a freshly issued token.
    pub fn login(&self, token: impl Into<String>) -> io::Result<()> {
        let token = token.into();
        let mut current = self.token.write();
        self.store.save(&token)?;
        *current = Some(token);
        self.expired.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Forgets the token.
    pub fn logout(&self) -> io::Result<()> {
        let mut current = self.token.write();
        *current = None;
        self.store.clear()
    }

    /// Drops `rejected` after the server answered 401 to a request carrying it,
    /// and flags the session so the front end can send the user back to login.
    ///
    /// A token stored since that request was sent is left alone. Returns
    /// whether the session was expired.
    pub fn expire_token(&self, rejected: &str) -> bool {
        let mut current = self.token.write();
        if current.as_deref() != Some(rejected) {
            log::debug!("Ignoring 401 for a token that is no longer current");
            return false;
        }

        log::warn!("Session expired, clearing stored token");
        *current = None;
        if let Err(err) = self.store.clear() {
            log::error!("Failed to clear stored token: {err}");
        }
        self.expired.store(true, Ordering::Relaxed);
        true
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    /// Returns and resets the expiry flag.
    pub fn take_expired(&self) -> bool {
        self.expired.swap(false, Ordering::Relaxed)
    }

    /// Adds `Authorization: Bearer <token>` when a token is present, replacing
    /// any caller-supplied value. Returns the token that was attached.
    pub fn authorize(&self, headers: &mut HeaderMap) -> Option<String> {
        let token = self.token()?;
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                Some(token)
            }
            Err(err) => {
                log::error!("Stored token is not a valid header value: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_attaches_bearer_token() {
        let session = Session::new(MemoryTokenStore::with_token("abc"));
        let mut headers = HeaderMap::new();

        assert_eq!(session.authorize(&mut headers).as_deref(), Some("abc"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn authorize_replaces_caller_authorization() {
        let session = Session::new(MemoryTokenStore::with_token("abc"));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));

        session.authorize(&mut headers);

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn anonymous_session_leaves_headers_untouched() {
        let session = Session::anonymous();
        let mut headers = HeaderMap::new();

        assert_eq!(session.authorize(&mut headers), None);
        assert!(headers.is_empty());
    }

    #[test]
    fn expire_clears_token_and_sets_flag() {
        let session = Session::new(MemoryTokenStore::with_token("abc"));

        assert!(session.expire_token("abc"));
        assert!(!session.is_authenticated());
        assert!(session.take_expired());
        assert!(!session.is_expired());
    }

    #[test]
    fn rejection_of_replaced_token_keeps_current_one() {
        let session = Session::new(MemoryTokenStore::with_token("old"));
        session.login("fresh").unwrap();

        assert!(!session.expire_token("old"));
        assert_eq!(session.token().as_deref(), Some("fresh"));
        assert!(!session.is_expired());
    }

    #[test]
    fn login_resets_expiry() {
        let session = Session::new(MemoryTokenStore::with_token("abc"));
        session.expire_token("abc");
        session.login("fresh").unwrap();

        assert!(!session.is_expired());
        assert_eq!(session.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");
        let store = FileTokenStore::new(&path);

        assert_eq!(store.load().unwrap(), None);
        store.save("tok-123").unwrap();

        let session = Session::new(FileTokenStore::new(&path));
        assert_eq!(session.token().as_deref(), Some("tok-123"));

        session.logout().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();
    }
}
