//! Staging configuration resolved from the process environment
//!
//! All environment reads happen here, once, at process start; the rest of
//! the pipeline takes the resulting struct explicitly.

use std::path::PathBuf;

use crate::error::{StagerError, StagerResult};

/// Quantization value that selects the single-file GGUF path.
pub const GGUF: &str = "gguf";

/// One staging run's worth of configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StagerConfig {
    /// Hub download cache root
    pub cache_dir: PathBuf,
    /// Directory the manifest is written to
    pub output_dir: PathBuf,
    /// Model repository identifier
    pub model_name: String,
    pub model_revision: Option<String>,
    /// Exact file to fetch; required when quantization is gguf
    pub model_filename: Option<String>,
    /// Tokenizer repository, when different from the model repository
    pub tokenizer_name: Option<String>,
    pub tokenizer_revision: Option<String>,
    pub quantization: Option<String>,
}

impl StagerConfig {
    /// Build the configuration from environment variables
    ///
    /// Unset and empty-string variables are treated the same way: absent.
    /// `TESTING_DOWNLOAD=1` switches to smoke-test defaults so the binary
    /// can be exercised without any configuration.
    pub fn from_env() -> Self {
        if env_opt("TESTING_DOWNLOAD").as_deref() == Some("1") {
            return Self::testing_defaults();
        }

        Self {
            cache_dir: env_opt("HF_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_dir),
            output_dir: PathBuf::from("/"),
            model_name: env_opt("MODEL_NAME").unwrap_or_default(),
            model_revision: env_opt("MODEL_REVISION"),
            model_filename: env_opt("MODEL_FILENAME"),
            tokenizer_name: env_opt("TOKENIZER_NAME"),
            tokenizer_revision: env_opt("TOKENIZER_REVISION"),
            quantization: env_opt("QUANTIZATION"),
        }
    }

    fn testing_defaults() -> Self {
        Self {
            cache_dir: PathBuf::from("tmp/hf_cache"),
            output_dir: PathBuf::from("tmp"),
            model_name: "openchat/openchat-3.5-0106".to_string(),
            model_revision: None,
            model_filename: None,
            tokenizer_name: None,
            tokenizer_revision: None,
            quantization: None,
        }
    }

    /// Validate configuration, before any network call is made
    pub fn validate(&self) -> StagerResult<()> {
        if self.model_name.is_empty() {
            return Err(StagerError::Config("MODEL_NAME must be set".to_string()));
        }
        if self.is_gguf() && self.model_filename.is_none() {
            return Err(StagerError::Config(
                "MODEL_FILENAME must be provided for gguf quantization".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_gguf(&self) -> bool {
        self.quantization.as_deref() == Some(GGUF)
    }

    /// Tokenizer repository, falling back to the model repository
    pub fn tokenizer_repo(&self) -> &str {
        self.tokenizer_name.as_deref().unwrap_or(&self.model_name)
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Default HuggingFace cache root
///
/// Checks in order:
/// 1. `$HF_HOME`
/// 2. `$XDG_CACHE_HOME/huggingface`
/// 3. `~/.cache/huggingface`
pub fn default_cache_dir() -> PathBuf {
    if let Ok(hf_home) = std::env::var("HF_HOME") {
        return PathBuf::from(hf_home);
    }
    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("huggingface");
    }
    dirs::home_dir()
        .map(|h| h.join(".cache/huggingface"))
        .unwrap_or_else(|| PathBuf::from("/tmp/huggingface"))
}
