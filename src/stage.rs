//! Single-run staging flow
//!
//! Straight-line: fetch what the configuration asks for, assemble the
//! manifest. A failure at any step aborts the run and no manifest is
//! produced.

use crate::config::StagerConfig;
use crate::error::{StagerError, StagerResult};
use crate::fetch::Fetcher;
use crate::manifest::Manifest;
use crate::patterns::ArtifactKind;

/// Fetch all required artifacts and assemble the manifest
///
/// On the GGUF path a single exact file is fetched and its path recorded
/// verbatim. Otherwise the model snapshot is fetched first and the
/// tokenizer only after it succeeds.
pub async fn run(config: &StagerConfig, fetcher: &Fetcher) -> StagerResult<Manifest> {
    config.validate()?;

    if config.is_gguf() {
        let filename = config.model_filename.as_deref().ok_or_else(|| {
            StagerError::Config("MODEL_FILENAME must be provided for gguf quantization".to_string())
        })?;

        let model_path = fetcher
            .fetch_exact_file(&config.model_name, filename, config.model_revision.as_deref())
            .await?;

        return Ok(Manifest {
            model: Some(model_path.to_string_lossy().into_owned()),
            model_revision: config.model_revision.clone(),
            quantization: config.quantization.clone(),
            ..Default::default()
        });
    }

    let model_path = fetcher
        .fetch(
            ArtifactKind::Model,
            &config.model_name,
            config.model_revision.as_deref(),
        )
        .await?;

    let tokenizer_path = fetcher
        .fetch(
            ArtifactKind::Tokenizer,
            config.tokenizer_repo(),
            config.tokenizer_revision.as_deref(),
        )
        .await?;

    Ok(Manifest {
        model: Some(model_path.to_string_lossy().into_owned()),
        model_revision: config.model_revision.clone(),
        quantization: config.quantization.clone(),
        tokenizer: Some(tokenizer_path.to_string_lossy().into_owned()),
        tokenizer_revision: config.tokenizer_revision.clone(),
    })
}
