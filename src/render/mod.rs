//! Rendering module: content cleanup, page reports, and JSON output.

mod cleanup;
mod json;
mod options;
mod report;

pub use cleanup::{clean_content, clean_value, CleanupOptions, CleanupPipeline, CleanupPreset};
pub use json::{to_json, JsonFormat};
pub use options::{ReportOptions, DEFAULT_FILENAME, DEFAULT_OUTPUT_DIR};
pub use report::{render_report, title_from_id, write_report, ReportSummary, ReportWriter};
