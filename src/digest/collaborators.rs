//! Summarizer and deduper collaborators
//!
//! Both stages are delegated to outside programs (typically ML models). The
//! pipeline only knows the JSON contract: one document in on stdin, one
//! document out on stdout.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::DigestError;

/// Source name -> texts, the shape exchanged with the deduper
pub type TextMultiFeed = BTreeMap<String, Vec<String>>;

/// Shortens full articles to a paragraph-sized summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize each article; the reply must have one summary per article
    async fn summarize(&self, articles: Vec<String>) -> Result<Vec<String>, DigestError>;
}

/// Removes semantic duplicates across sources
#[async_trait]
pub trait Deduper: Send + Sync {
    /// Return `feed` with duplicate texts removed from their lists
    async fn dedupe(&self, feed: TextMultiFeed) -> Result<TextMultiFeed, DigestError>;
}

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

#[async_trait]
impl Summarizer for Passthrough {
    async fn summarize(&self, articles: Vec<String>) -> Result<Vec<String>, DigestError> {
        Ok(articles)
    }
}

#[async_trait]
impl Deduper for Passthrough {
    async fn dedupe(&self, feed: TextMultiFeed) -> Result<TextMultiFeed, DigestError> {
        Ok(feed)
    }
}

/// Program spoken to over stdin/stdout with JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line into program and arguments
    ///
    /// # Errors
    ///
    /// `DigestError::Collaborator` for a blank command line.
    pub fn parse(command_line: &str) -> Result<Self, DigestError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| DigestError::Collaborator("Empty collaborator command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Write `input` as JSON to the program and parse its stdout as JSON
    ///
    /// # Errors
    ///
    /// Spawn failure, non-zero exit, or a reply that is not the expected JSON.
    pub async fn exchange<I, O>(&self, input: &I) -> Result<O, DigestError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let payload = serde_json::to_vec(input)
            .map_err(|e| DigestError::Collaborator(format!("Failed to encode request: {e}")))?;

        debug!("Running {} with {} byte request", self.program, payload.len());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DigestError::Collaborator(format!("Failed to start {}: {e}", self.program)))?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            DigestError::Collaborator(format!("No stdin pipe for {}", self.program))
        })?;
        // Feed stdin from its own task so a chatty child cannot deadlock us.
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&payload).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| DigestError::Collaborator(format!("Failed to wait for {}: {e}", self.program)))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to write request to {}: {e}", self.program),
            Err(e) => warn!("Request writer for {} failed: {e}", self.program),
        }

        if !output.status.success() {
            return Err(DigestError::Collaborator(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            DigestError::Collaborator(format!("Unexpected reply from {}: {e}", self.program))
        })
    }
}

#[async_trait]
impl Summarizer for ExternalCommand {
    async fn summarize(&self, articles: Vec<String>) -> Result<Vec<String>, DigestError> {
        self.exchange(&articles).await
    }
}

#[async_trait]
impl Deduper for ExternalCommand {
    async fn dedupe(&self, feed: TextMultiFeed) -> Result<TextMultiFeed, DigestError> {
        self.exchange(&feed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_line() {
        let cmd = ExternalCommand::parse("python3  tools/summarize.py --quiet").unwrap();
        assert_eq!(cmd.program(), "python3");
        assert_eq!(cmd.args(), ["tools/summarize.py", "--quiet"]);
    }

    #[test]
    fn blank_command_line_is_rejected() {
        assert!(matches!(
            ExternalCommand::parse("   "),
            Err(DigestError::Collaborator(_))
        ));
    }

    #[tokio::test]
    async fn passthrough_is_identity() {
        let feed = TextMultiFeed::from([("pbs".to_string(), vec!["a".to_string()])]);
        assert_eq!(Passthrough.dedupe(feed.clone()).await.unwrap(), feed);
        assert_eq!(
            Passthrough.summarize(vec!["x".to_string()]).await.unwrap(),
            vec!["x".to_string()]
        );
    }
}
