//! Curriculum knowledge source.
//!
//! The curriculum text is extracted from the published study plans by an
//! external pipeline; this module only reads the resulting `.txt` files.

use std::path::PathBuf;

use tracing::warn;

/// Supplies the static knowledge text injected into every completion request.
pub trait KnowledgeSource: Send + Sync {
    /// Current curriculum text. Re-read on every question so edits to the
    /// extracted files are picked up without a restart.
    fn curriculum_text(&self) -> String;
}

/// Reads every `.txt` file in a directory, in name order, and joins them
/// under per-file headers.
pub struct CurriculumFiles {
    dir: PathBuf,
}

impl CurriculumFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl KnowledgeSource for CurriculumFiles {
    fn curriculum_text(&self) -> String {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
                .collect(),
            Err(e) => {
                warn!("Failed to read curriculum dir {}: {e}", self.dir.display());
                return String::new();
            }
        };
        paths.sort();

        let mut text = String::new();
        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    if !text.is_empty() {
                        text.push_str("\n\n");
                    }
                    if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                        text.push_str(&format!("=== {name} ===\n"));
                    }
                    text.push_str(content.trim());
                }
                Err(e) => warn!("Failed to read {}: {e}", path.display()),
            }
        }
        text
    }
}
