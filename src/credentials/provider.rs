use crate::credentials::{CredentialError, CredentialRefresh, CredentialResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One cookie entry in the credential file
///
/// The file is a JSON array of these, as dumped by the browser session.
#[derive(Debug, Deserialize)]
struct CookieEntry {
    name: String,
    value: String,
}

/// Cached session credential backed by a cookie file
///
/// `get()` loads and caches the serialized cookie header on first use;
/// `invalidate()` forces the next `get()` to run the refresh capability and
/// reload. Each HTTP client owns exactly one provider.
pub struct CredentialProvider {
    path: PathBuf,
    refresher: Arc<dyn CredentialRefresh>,
    cache: Option<String>,
    force_refresh: bool,
}

impl CredentialProvider {
    /// Creates a provider reading from `path` and refreshing via `refresher`
    pub fn new(path: impl Into<PathBuf>, refresher: Arc<dyn CredentialRefresh>) -> Self {
        Self {
            path: path.into(),
            refresher,
            cache: None,
            force_refresh: false,
        }
    }

    /// Returns the credential as a `Cookie` header value
    ///
    /// The file's `[{name, value}, ...]` entries are joined as
    /// `"name=value; name=value"`. If the file is missing, or a previous
    /// `invalidate()` marked the credential expired, the refresh capability
    /// runs first; a file still missing afterwards is fatal
    /// ([`CredentialError::Unavailable`]).
    pub async fn get(&mut self) -> CredentialResult<&str> {
        if self.cache.is_none() {
            if self.force_refresh || !self.path.exists() {
                tracing::warn!(path = %self.path.display(), "credential missing or expired, refreshing");
                self.refresher.refresh().await?;
                self.force_refresh = false;
            }
            if !self.path.exists() {
                return Err(CredentialError::Unavailable(self.path.clone()));
            }
            self.cache = Some(load_cookie_header(&self.path)?);
        }

        // Freshly populated above when it was None
        match &self.cache {
            Some(header) => Ok(header),
            None => Err(CredentialError::Unavailable(self.path.clone())),
        }
    }

    /// Drops the cached credential so the next `get()` reacquires it
    pub fn invalidate(&mut self) {
        self.cache = None;
        self.force_refresh = true;
    }
}

/// Reads the cookie file and serializes it into a header value
fn load_cookie_header(path: &Path) -> CredentialResult<String> {
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<CookieEntry> = serde_json::from_str(&raw)?;

    Ok(entries
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    /// Test refresher that writes a given cookie file and counts invocations
    struct WritingRefresher {
        path: PathBuf,
        body: String,
        calls: AtomicU32,
    }

    #[async_trait]
    impl CredentialRefresh for WritingRefresher {
        async fn refresh(&self) -> CredentialResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::write(&self.path, &self.body)?;
            Ok(())
        }
    }

    /// Test refresher that never produces a file
    struct NoopRefresher;

    #[async_trait]
    impl CredentialRefresh for NoopRefresher {
        async fn refresh(&self) -> CredentialResult<()> {
            Ok(())
        }
    }

    fn cookie_json(value: &str) -> String {
        format!(
            r#"[{{"name": "session", "value": "{}"}}, {{"name": "dd", "value": "x1"}}]"#,
            value
        )
    }

    #[tokio::test]
    async fn test_get_joins_cookie_pairs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, cookie_json("abc")).unwrap();

        let mut provider = CredentialProvider::new(&path, Arc::new(NoopRefresher));
        let header = provider.get().await.unwrap();
        assert_eq!(header, "session=abc; dd=x1");
    }

    #[tokio::test]
    async fn test_missing_file_triggers_refresh_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let refresher = Arc::new(WritingRefresher {
            path: path.clone(),
            body: cookie_json("minted"),
            calls: AtomicU32::new(0),
        });
        let mut provider = CredentialProvider::new(&path, refresher.clone());

        assert_eq!(provider.get().await.unwrap(), "session=minted; dd=x1");
        // Cached: a second get does not refresh again
        assert_eq!(provider.get().await.unwrap(), "session=minted; dd=x1");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reacquisition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, cookie_json("old")).unwrap();

        let refresher = Arc::new(WritingRefresher {
            path: path.clone(),
            body: cookie_json("new"),
            calls: AtomicU32::new(0),
        });
        let mut provider = CredentialProvider::new(&path, refresher.clone());

        assert_eq!(provider.get().await.unwrap(), "session=old; dd=x1");
        provider.invalidate();
        assert_eq!(provider.get().await.unwrap(), "session=new; dd=x1");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_not_producing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let mut provider = CredentialProvider::new(&path, Arc::new(NoopRefresher));
        let err = provider.get().await.unwrap_err();
        assert!(matches!(err, CredentialError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_garbage_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "not json").unwrap();

        let mut provider = CredentialProvider::new(&path, Arc::new(NoopRefresher));
        let err = provider.get().await.unwrap_err();
        assert!(matches!(err, CredentialError::Parse(_)));
    }
}
