//! Metadata manifest written for the downstream serving process
//!
//! The manifest is the sole output contract of a staging run: a flat JSON
//! mapping at a fixed location, recording where the fetched artifacts
//! landed. The serving process that starts next reads it to locate the
//! model without touching the hub again.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StagerResult;

/// Fixed manifest filename, relative to the configured output directory.
pub const MANIFEST_FILENAME: &str = "local_model_args.json";

/// Record of what was fetched and where
///
/// `MODEL_NAME` and `TOKENIZER_NAME` carry the local paths of the staged
/// artifacts once a run succeeds. Keys with absent or empty values are
/// dropped from the serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "MODEL_NAME", default, skip_serializing_if = "is_blank")]
    pub model: Option<String>,

    #[serde(rename = "MODEL_REVISION", default, skip_serializing_if = "is_blank")]
    pub model_revision: Option<String>,

    #[serde(rename = "QUANTIZATION", default, skip_serializing_if = "is_blank")]
    pub quantization: Option<String>,

    #[serde(rename = "TOKENIZER_NAME", default, skip_serializing_if = "is_blank")]
    pub tokenizer: Option<String>,

    #[serde(
        rename = "TOKENIZER_REVISION",
        default,
        skip_serializing_if = "is_blank"
    )]
    pub tokenizer_revision: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl Manifest {
    /// Write the manifest under `dir`, overwriting any prior manifest
    ///
    /// Atomic write: write to temp file, then rename.
    pub async fn write(&self, dir: &Path) -> StagerResult<PathBuf> {
        let path = dir.join(MANIFEST_FILENAME);
        let content = serde_json::to_string(self)?;

        fs::create_dir_all(dir).await?;

        let temp_file = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_file).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&temp_file, &path).await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_values_are_dropped() {
        let manifest = Manifest {
            model: Some("/cache/snapshots/abc".to_string()),
            model_revision: None,
            quantization: Some(String::new()),
            tokenizer: Some("/cache/snapshots/abc".to_string()),
            tokenizer_revision: None,
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&manifest).unwrap()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["MODEL_NAME"], "/cache/snapshots/abc");
        assert_eq!(object["TOKENIZER_NAME"], "/cache/snapshots/abc");
        assert!(!object.contains_key("MODEL_REVISION"));
        assert!(!object.contains_key("QUANTIZATION"));
        assert!(!object.contains_key("TOKENIZER_REVISION"));
    }

    #[test]
    fn test_all_fields_serialize_when_present() {
        let manifest = Manifest {
            model: Some("/cache/model.Q4_K_M.gguf".to_string()),
            model_revision: Some("main".to_string()),
            quantization: Some("gguf".to_string()),
            tokenizer: None,
            tokenizer_revision: None,
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&manifest).unwrap()).unwrap();

        assert_eq!(json["MODEL_NAME"], "/cache/model.Q4_K_M.gguf");
        assert_eq!(json["MODEL_REVISION"], "main");
        assert_eq!(json["QUANTIZATION"], "gguf");
    }

    #[tokio::test]
    async fn test_write_creates_manifest_file() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest {
            model: Some("/cache/snapshots/abc".to_string()),
            ..Default::default()
        };

        let path = manifest.write(dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join(MANIFEST_FILENAME));
        assert!(path.exists());
        // Temp file must be gone after the rename
        assert!(!path.with_extension("tmp").exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Manifest = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.model.as_deref(), Some("/cache/snapshots/abc"));
    }

    #[tokio::test]
    async fn test_write_overwrites_prior_manifest() {
        let dir = TempDir::new().unwrap();

        let first = Manifest {
            model: Some("/old/path".to_string()),
            ..Default::default()
        };
        first.write(dir.path()).await.unwrap();

        let second = Manifest {
            model: Some("/new/path".to_string()),
            ..Default::default()
        };
        let path = second.write(dir.path()).await.unwrap();

        let parsed: Manifest =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.model.as_deref(), Some("/new/path"));
    }

    #[tokio::test]
    async fn test_write_creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("staging/out");

        let manifest = Manifest::default();
        let path = manifest.write(&nested).await.unwrap();
        assert!(path.exists());
    }
}
