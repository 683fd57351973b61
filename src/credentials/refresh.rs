use crate::credentials::{CredentialError, CredentialResult};
use async_trait::async_trait;
use tokio::process::Command;

/// Capability to mint a fresh credential file
///
/// The production implementation shells out to an external program that
/// drives a browser session and writes the cookie file. Tests substitute
/// their own implementation that writes the file directly.
#[async_trait]
pub trait CredentialRefresh: Send + Sync {
    /// Produces (or reproduces) the credential file
    ///
    /// Implementations return `Ok(())` once the file has been written; the
    /// caller re-reads it afterwards and treats a still-missing file as
    /// [`CredentialError::Unavailable`].
    async fn refresh(&self) -> CredentialResult<()>;
}

/// Refreshes the credential by running an external command
///
/// The command is configured as an argv vector, e.g.
/// `["python3", "get_cookie.py"]`. A non-zero exit status is a refresh
/// failure; whether the file actually appeared is checked by the provider.
#[derive(Debug, Clone)]
pub struct CommandRefresher {
    program: String,
    args: Vec<String>,
}

impl CommandRefresher {
    /// Builds a refresher from an argv vector
    ///
    /// Returns `None` for an empty vector; config validation rejects that
    /// case earlier with a proper diagnostic.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl CredentialRefresh for CommandRefresher {
    async fn refresh(&self) -> CredentialResult<()> {
        tracing::info!(command = %self.program, "refreshing credential via external command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .await
            .map_err(|e| CredentialError::Refresh(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(CredentialError::Refresh(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }
}
