//! Asynchronous SVN CLI client.
//!
//! Only the two read-only invocations a merge check needs are wrapped: the
//! verbose log of the source path and the `svn:mergeinfo` property of the
//! target working copy. Authentication is left to the `svn` binary's own
//! credential cache.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::config::SvnConfig;
use crate::errors::SvnError;
use crate::merge::RevisionRange;

/// Asynchronous client for reading merge inputs via the `svn` CLI.
#[derive(Debug, Clone)]
pub struct SvnClient {
    repo_url: String,
    source_path: String,
    working_copy: PathBuf,
}

impl SvnClient {
    /// Create a client reading the log of `repo_url` + `source_path` and the
    /// merge info of `working_copy`.
    pub fn new(
        repo_url: impl Into<String>,
        source_path: impl Into<String>,
        working_copy: impl Into<PathBuf>,
    ) -> Self {
        let client = Self {
            repo_url: repo_url.into(),
            source_path: source_path.into(),
            working_copy: working_copy.into(),
        };
        info!(url = %client.source_url(), wc = %client.working_copy.display(), "created SvnClient");
        client
    }

    pub fn from_config(config: &SvnConfig) -> Self {
        Self::new(&config.repo_url, &config.source_path, &config.working_copy)
    }

    /// Full URL of the source path.
    pub fn source_url(&self) -> String {
        format!(
            "{}/{}",
            self.repo_url.trim_end_matches('/'),
            self.source_path.trim_start_matches('/')
        )
    }

    pub fn working_copy(&self) -> &Path {
        &self.working_copy
    }

    /// Raw `svn log -v` text of the source path over `range`.
    #[instrument(skip(self), fields(url = %self.source_url()))]
    pub async fn log(&self, range: &RevisionRange) -> Result<String, SvnError> {
        let rev_range = range.to_string();
        let url = self.source_url();
        self.run_svn(&["log", "-v", "-r", &rev_range, &url]).await
    }

    /// Raw `svn:mergeinfo` property of the working copy.
    #[instrument(skip(self), fields(wc = %self.working_copy.display()))]
    pub async fn mergeinfo(&self) -> Result<String, SvnError> {
        let wc = self.working_copy.to_string_lossy().to_string();
        self.run_svn(&["propget", "svn:mergeinfo", &wc]).await
    }

    async fn run_svn(&self, args: &[&str]) -> Result<String, SvnError> {
        let mut cmd = Command::new("svn");
        cmd.args(args)
            .arg("--non-interactive")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(cmd = ?format!("svn {}", args.join(" ")), "running svn command");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SvnError::BinaryNotFound("svn".into())
            } else {
                SvnError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "svn command failed");
            return Err(SvnError::CommandFailed { exit_code, stderr });
        }
        debug!(bytes = output.stdout.len(), "svn command finished");
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_joins_without_double_slash() {
        let client = SvnClient::new("https://svn.example.com/svn/project/", "/trunk/app", "/tmp/wc");
        assert_eq!(client.source_url(), "https://svn.example.com/svn/project/trunk/app");

        let client = SvnClient::new("https://svn.example.com/svn/project", "trunk/app", "/tmp/wc");
        assert_eq!(client.source_url(), "https://svn.example.com/svn/project/trunk/app");
    }

    #[test]
    fn test_client_construction() {
        let client = SvnClient::new("file:///srv/repo", "/trunk", "/tmp/wc");
        assert_eq!(client.working_copy(), Path::new("/tmp/wc"));
    }
}
