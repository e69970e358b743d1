//! Loader configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling which files the loader reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// File extensions to include (lowercase, without dot).
    pub extensions: Vec<String>,
    /// Maximum file size to read (bytes).
    pub max_file_bytes: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            max_file_bytes: 64 * 1024 * 1024,
        }
    }
}

impl IngestOptions {
    /// Read options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut options: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid ingest options in {}", path.display()))?;
        options.normalize_extensions();
        Ok(options)
    }

    /// Lower-case extensions and strip leading dots.
    pub fn normalize_extensions(&mut self) {
        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
        self.extensions.retain(|ext| !ext.is_empty());
    }

    /// Case-insensitive extension check.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}
