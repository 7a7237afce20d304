//! Artifact fetching from HuggingFace Hub using hf-hub
//!
//! The hub is reached through the [`ArtifactSource`] trait so the fetch
//! strategy can be exercised against an in-memory source in tests. The
//! production implementation wraps the native Rust hf-hub crate instead
//! of shelling out to huggingface-cli.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use hf_hub::api::tokio::{Api, ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};

use crate::error::{StagerError, StagerResult};
use crate::patterns::{ArtifactKind, PatternGroup, pattern_groups};

/// The two hub operations the stager depends on
///
/// Mirrors the hub client contract: a filtered recursive snapshot fetch
/// and a single exact-file fetch. Nothing else about the hub's cache
/// layout or transfer behavior is assumed.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Download every repo file allowed by `patterns` into the local cache
    ///
    /// Returns the local snapshot directory, or `None` when no remote file
    /// matched any allowed pattern.
    async fn snapshot(
        &self,
        repo: &str,
        revision: Option<&str>,
        patterns: &PatternGroup,
    ) -> StagerResult<Option<PathBuf>>;

    /// Download exactly one named file and return its local path.
    async fn get_file(
        &self,
        repo: &str,
        revision: Option<&str>,
        filename: &str,
    ) -> StagerResult<PathBuf>;
}

/// Production artifact source backed by the HuggingFace Hub
pub struct HubSource {
    api: Api,
}

impl HubSource {
    /// Create a hub client that caches downloads under `cache_dir`
    ///
    /// Picks up `HF_TOKEN` from the environment for private repositories.
    pub fn new(cache_dir: PathBuf) -> StagerResult<Self> {
        let mut builder = ApiBuilder::new().with_cache_dir(cache_dir);
        if let Ok(token) = std::env::var("HF_TOKEN") {
            builder = builder.with_token(Some(token));
        }
        Ok(Self {
            api: builder.build()?,
        })
    }

    fn repo(&self, name: &str, revision: Option<&str>) -> ApiRepo {
        match revision {
            Some(rev) => self.api.repo(Repo::with_revision(
                name.to_string(),
                RepoType::Model,
                rev.to_string(),
            )),
            None => self.api.model(name.to_string()),
        }
    }
}

#[async_trait]
impl ArtifactSource for HubSource {
    async fn snapshot(
        &self,
        repo: &str,
        revision: Option<&str>,
        patterns: &PatternGroup,
    ) -> StagerResult<Option<PathBuf>> {
        let api_repo = self.repo(repo, revision);
        let info = api_repo.info().await?;

        let mut snapshot_dir: Option<PathBuf> = None;
        for sibling in info.siblings {
            if !patterns.matches_remote(&sibling.rfilename) {
                continue;
            }
            tracing::debug!(repo = %repo, file = %sibling.rfilename, "Downloading file");
            let path = api_repo.get(&sibling.rfilename).await?;

            // Nested rfilenames resolve under the same snapshot root, so
            // keep the shortest parent seen.
            let parent = path.parent().map(|p| p.to_path_buf());
            let replace = match (&snapshot_dir, &parent) {
                (None, _) => true,
                (Some(current), Some(new)) => {
                    new.as_os_str().len() < current.as_os_str().len()
                }
                (Some(_), None) => false,
            };
            if replace {
                snapshot_dir = parent;
            }
        }

        Ok(snapshot_dir)
    }

    async fn get_file(
        &self,
        repo: &str,
        revision: Option<&str>,
        filename: &str,
    ) -> StagerResult<PathBuf> {
        let api_repo = self.repo(repo, revision);
        Ok(api_repo.get(filename).await?)
    }
}

/// Pattern-group-driven artifact fetcher
///
/// Tries each pattern group for an artifact kind in priority order and
/// returns the first one that is verifiably present on disk after the
/// fetch. First match wins; later groups are never attempted.
pub struct Fetcher {
    source: Arc<dyn ArtifactSource>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn ArtifactSource>) -> Self {
        Self { source }
    }

    /// Fetch an artifact by kind, returning its local snapshot directory
    ///
    /// # Arguments
    /// * `kind` - What is being fetched (model weights or tokenizer)
    /// * `repo` - The hub repository identifier (e.g., "openchat/openchat-3.5-0106")
    /// * `revision` - Optional version/branch/tag pin
    ///
    /// # Errors
    /// * `NoMatchingArtifact` when every pattern group was fetched but none
    ///   yielded a locally present matching file
    /// * `Transfer` when the hub client fails mid-fetch
    pub async fn fetch(
        &self,
        kind: ArtifactKind,
        repo: &str,
        revision: Option<&str>,
    ) -> StagerResult<PathBuf> {
        let groups = pattern_groups(kind);
        let start = Instant::now();

        for group in &groups {
            let Some(dir) = self.source.snapshot(repo, revision, group).await? else {
                tracing::debug!(repo = %repo, group = %group, "No remote files matched pattern group");
                continue;
            };

            if group.verified_in(&dir) {
                tracing::info!(
                    kind = %kind,
                    repo = %repo,
                    path = ?dir,
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "Successfully downloaded artifact files"
                );
                return Ok(dir);
            }
            tracing::debug!(repo = %repo, group = %group, "Snapshot missing expected files, trying next group");
        }

        Err(StagerError::NoMatchingArtifact {
            repo: repo.to_string(),
            attempted: groups,
        })
    }

    /// Fetch exactly one named file, with no pattern matching or fallback
    ///
    /// Used for the single-file GGUF path. Transfer failures propagate
    /// untranslated.
    pub async fn fetch_exact_file(
        &self,
        repo: &str,
        filename: &str,
        revision: Option<&str>,
    ) -> StagerResult<PathBuf> {
        let start = Instant::now();
        let path = self.source.get_file(repo, revision, filename).await?;
        tracing::info!(
            repo = %repo,
            file = %filename,
            path = ?path,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Successfully downloaded file"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hub_source_creation_with_cache_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = HubSource::new(temp_dir.path().to_path_buf());
        assert!(source.is_ok());
    }
}
