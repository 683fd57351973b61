//! Stop-flag bridge
//!
//! The scraping core observes an explicit [`CancellationToken`]; the
//! dashboard-facing interface is a flag file whose mere presence requests a
//! stop. This module bridges the two: stale flags are cleared before a run
//! starts, and a watcher cancels the token once the flag appears.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Removes a stale stop flag left over from a previous run
pub fn clear_stop_flag(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(flag = %path.display(), "removed stale stop flag");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Spawns a task that cancels `token` once the flag file appears
///
/// The watcher exits as soon as the token is cancelled, whether by the flag
/// or by anyone else (e.g. a Ctrl-C handler). Polling granularity only needs
/// to match the scraper's own cooperative checks, which happen at listing
/// granularity.
pub fn spawn_stop_flag_watcher(
    path: PathBuf,
    token: CancellationToken,
    poll: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if token.is_cancelled() {
                break;
            }
            if path.exists() {
                tracing::info!(flag = %path.display(), "stop flag detected, cancelling run");
                token.cancel();
                break;
            }
            tokio::time::sleep(poll).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_missing_flag_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(clear_stop_flag(&dir.path().join("stop.flag")).is_ok());
    }

    #[test]
    fn test_clear_removes_existing_flag() {
        let dir = TempDir::new().unwrap();
        let flag = dir.path().join("stop.flag");
        std::fs::write(&flag, "").unwrap();

        clear_stop_flag(&flag).unwrap();
        assert!(!flag.exists());
    }

    #[tokio::test]
    async fn test_watcher_cancels_on_flag() {
        let dir = TempDir::new().unwrap();
        let flag = dir.path().join("stop.flag");
        let token = CancellationToken::new();

        let handle =
            spawn_stop_flag_watcher(flag.clone(), token.clone(), Duration::from_millis(5));
        assert!(!token.is_cancelled());

        std::fs::write(&flag, "").unwrap();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_watcher_exits_when_token_cancelled_elsewhere() {
        let dir = TempDir::new().unwrap();
        let token = CancellationToken::new();

        let handle = spawn_stop_flag_watcher(
            dir.path().join("stop.flag"),
            token.clone(),
            Duration::from_millis(5),
        );
        token.cancel();
        handle.await.unwrap();
    }
}
