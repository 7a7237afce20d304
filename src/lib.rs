//! Model Stager - artifact staging for container startup
//!
//! Downloads model and tokenizer files from the HuggingFace Hub into a
//! local cache and writes a JSON manifest the serving process reads on
//! boot.

pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod patterns;
pub mod stage;

pub use config::StagerConfig;
pub use error::{StagerError, StagerResult};
pub use fetch::{ArtifactSource, Fetcher, HubSource};
pub use manifest::Manifest;
pub use patterns::{ArtifactKind, PatternGroup, pattern_groups};
