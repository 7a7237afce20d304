//! Artifact kinds and the filename pattern groups that identify them
//!
//! A pattern group is one acceptable on-disk representation of an
//! artifact: a set of format patterns that identify it, plus companion
//! patterns fetched alongside so a single snapshot can satisfy both the
//! weights and the tokenizer files when they are co-located.

use glob::Pattern;
use std::fmt;
use std::path::Path;

/// Patterns that make up a complete tokenizer.
pub const TOKENIZER_PATTERNS: &[&str] = &["*.json", "tokenizer*"];

/// Model weight formats in priority order: prefer safetensors, fall back
/// to legacy bin, fall back to raw pt.
const MODEL_FORMAT_PATTERNS: &[&[&str]] = &[&["*.safetensors"], &["*.bin"], &["*.pt"]];

/// Kind of artifact a fetch request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Tokenizer,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Tokenizer => write!(f, "tokenizer"),
        }
    }
}

/// One acceptable on-disk form of an artifact
///
/// `format` patterns identify the artifact itself; at least one of them
/// must match a local file for the group to count as satisfied.
/// `companion` patterns widen the snapshot filter but do not count
/// towards verification, so a repo that only carries tokenizer files
/// never satisfies a weights group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    format: Vec<String>,
    companion: Vec<String>,
}

impl PatternGroup {
    pub fn new(format: &[&str], companion: &[&str]) -> Self {
        Self {
            format: format.iter().map(|p| p.to_string()).collect(),
            companion: companion.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// All patterns a snapshot fetch for this group is restricted to.
    pub fn allow_patterns(&self) -> impl Iterator<Item = &str> {
        self.format
            .iter()
            .chain(self.companion.iter())
            .map(String::as_str)
    }

    /// Whether a remote filename is allowed by this group's snapshot filter.
    pub fn matches_remote(&self, filename: &str) -> bool {
        self.allow_patterns()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|pattern| pattern.matches(filename))
    }

    /// Whether at least one format pattern matches a file present in `dir`.
    ///
    /// Non-recursive, mirroring the flat layout of a hub snapshot directory.
    pub fn verified_in(&self, dir: &Path) -> bool {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return false;
        };
        let names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        self.format
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|pattern| names.iter().any(|name| pattern.matches(name)))
    }
}

impl fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all: Vec<&str> = self.allow_patterns().collect();
        write!(f, "{}", all.join(", "))
    }
}

/// Pattern groups for an artifact kind, in the order they are attempted
pub fn pattern_groups(kind: ArtifactKind) -> Vec<PatternGroup> {
    match kind {
        ArtifactKind::Tokenizer => vec![PatternGroup::new(TOKENIZER_PATTERNS, &[])],
        ArtifactKind::Model => MODEL_FORMAT_PATTERNS
            .iter()
            .map(|format| PatternGroup::new(format, TOKENIZER_PATTERNS))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tokenizer_has_single_group() {
        let groups = pattern_groups(ArtifactKind::Tokenizer);
        assert_eq!(groups.len(), 1);

        let allow: Vec<&str> = groups[0].allow_patterns().collect();
        assert_eq!(allow, vec!["*.json", "tokenizer*"]);
    }

    #[test]
    fn test_model_groups_are_ordered_by_format_preference() {
        let groups = pattern_groups(ArtifactKind::Model);
        assert_eq!(groups.len(), 3);

        let first: Vec<&str> = groups[0].allow_patterns().collect();
        let second: Vec<&str> = groups[1].allow_patterns().collect();
        let third: Vec<&str> = groups[2].allow_patterns().collect();

        assert_eq!(first[0], "*.safetensors");
        assert_eq!(second[0], "*.bin");
        assert_eq!(third[0], "*.pt");
    }

    #[test]
    fn test_model_groups_carry_tokenizer_patterns() {
        for group in pattern_groups(ArtifactKind::Model) {
            let allow: Vec<&str> = group.allow_patterns().collect();
            assert!(allow.contains(&"*.json"));
            assert!(allow.contains(&"tokenizer*"));
        }
    }

    #[test]
    fn test_matches_remote() {
        let group = PatternGroup::new(&["*.safetensors"], TOKENIZER_PATTERNS);
        assert!(group.matches_remote("model.safetensors"));
        assert!(group.matches_remote("tokenizer.json"));
        assert!(group.matches_remote("tokenizer_config.json"));
        assert!(!group.matches_remote("pytorch_model.bin"));
        assert!(!group.matches_remote("README.md"));
    }

    #[test]
    fn test_verification_requires_a_format_match() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), "{}").unwrap();

        let safetensors = PatternGroup::new(&["*.safetensors"], TOKENIZER_PATTERNS);
        // Companion files alone must not satisfy a weights group
        assert!(!safetensors.verified_in(dir.path()));

        std::fs::write(dir.path().join("model.safetensors"), "stub").unwrap();
        assert!(safetensors.verified_in(dir.path()));
    }

    #[test]
    fn test_verification_of_missing_dir() {
        let group = PatternGroup::new(&["*.bin"], &[]);
        assert!(!group.verified_in(Path::new("/nonexistent/path/12345")));
    }

    #[test]
    fn test_display_lists_all_patterns() {
        let group = PatternGroup::new(&["*.safetensors"], TOKENIZER_PATTERNS);
        assert_eq!(group.to_string(), "*.safetensors, *.json, tokenizer*");
    }
}
