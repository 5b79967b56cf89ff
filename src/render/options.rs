//! Report rendering options and configuration.

use super::{CleanupOptions, CleanupPreset};
use std::path::PathBuf;

/// Directory reports are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "repo_wiki_generations";

/// Report file name used by default.
pub const DEFAULT_FILENAME: &str = "llms.txt";

/// Options for rendering and writing the page report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Directory the report is written to
    pub output_dir: PathBuf,

    /// Report file name
    pub filename: String,

    /// Importance shown for pages without one
    pub default_importance: String,

    /// Marker shown for empty related-page and file lists
    pub none_marker: String,

    /// Cleanup applied to each page's content
    pub cleanup: CleanupOptions,

    /// Render page sections in parallel
    pub parallel: bool,
}

impl ReportOptions {
    /// Create new report options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the report file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the importance shown for pages without one.
    pub fn with_default_importance(mut self, importance: impl Into<String>) -> Self {
        self.default_importance = importance.into();
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = CleanupOptions::from_preset(preset);
        self
    }

    /// Render sections one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Full path of the report file.
    pub fn destination(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filename: DEFAULT_FILENAME.to_string(),
            default_importance: "N/A".to_string(),
            none_marker: "None".to_string(),
            cleanup: CleanupOptions::default(),
            parallel: true,
        }
    }
}
