//! Error types for the staging pipeline

use crate::patterns::PatternGroup;
use thiserror::Error;

pub type StagerResult<T> = Result<T, StagerError>;

/// Staging error kinds
///
/// Hub failures and "nothing matched" are deliberately distinct: a
/// `Transfer` error means the hub client failed mid-fetch and is
/// propagated untranslated, while `NoMatchingArtifact` means every
/// fetch succeeded but no pattern group could be verified on disk.
#[derive(Debug, Error)]
pub enum StagerError {
    /// Required input missing or inconsistent. Raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Every pattern group was fetched but none yielded a matching local file.
    #[error("no files matching any of {} found in {repo}", format_groups(.attempted))]
    NoMatchingArtifact {
        repo: String,
        attempted: Vec<PatternGroup>,
    },

    /// Failure inside the hub client (network, auth, not-found).
    #[error("hub transfer failed: {0}")]
    Transfer(#[from] hf_hub::api::tokio::ApiError),

    #[error("file io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn format_groups(groups: &[PatternGroup]) -> String {
    let rendered: Vec<String> = groups.iter().map(|g| format!("[{g}]")).collect();
    rendered.join(", ")
}
