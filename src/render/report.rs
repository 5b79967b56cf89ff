//! Plain-text page report (`llms.txt`) rendering and writing.
//!
//! Each page becomes a self-contained section:
//!
//! ```text
//! # Getting Started
//! -----------------
//!
//! **ID:** getting-started
//! **Importance:** High
//! **Related Pages:** architecture, api
//! **Relevant Files:** README.md
//!
//! ## Content
//! Cleaned page content.
//!
//! ------------------------------
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
#[cfg(feature = "async")]
use tokio::io::AsyncWriteExt;

use super::{CleanupPipeline, ReportOptions};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::{PageContent, PageContents};

/// Separator written after every section.
const SECTION_RULE_WIDTH: usize = 30;

/// Outcome of a successful report write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// File the report was written to
    pub path: PathBuf,

    /// Number of page sections written
    pub page_count: usize,

    /// Pages that needed at least one default value
    pub pages_with_defaults: usize,

    /// Total bytes written
    pub bytes_written: usize,
}

struct Section {
    text: String,
    defaulted: bool,
}

/// Renders page contents into the report format.
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    options: ReportOptions,
    pipeline: CleanupPipeline,
}

impl ReportWriter {
    /// Create a writer with the given options.
    pub fn new(options: ReportOptions) -> Self {
        let pipeline = CleanupPipeline::new(options.cleanup.clone());
        Self { options, pipeline }
    }

    /// Options this writer runs with.
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Render the whole report to a string.
    pub fn render(&self, pages: &PageContents, ctx: &Context) -> String {
        self.sections(pages, ctx)
            .into_iter()
            .map(|section| section.text)
            .collect()
    }

    /// Write the report to any writer, returning the number of bytes written.
    pub fn write_to<W: Write>(
        &self,
        pages: &PageContents,
        writer: &mut W,
        ctx: &Context,
    ) -> io::Result<usize> {
        let mut bytes = 0;
        for section in self.sections(pages, ctx) {
            writer.write_all(section.text.as_bytes())?;
            bytes += section.text.len();
        }
        writer.flush()?;
        Ok(bytes)
    }

    /// Write the report to `destination`, replacing any existing file.
    ///
    /// Parent directories are created as needed. The summary is returned
    /// only after every section is written and the file is synced.
    pub fn write(
        &self,
        pages: &PageContents,
        destination: &Path,
        ctx: &Context,
    ) -> Result<ReportSummary> {
        create_parent_dir(destination)?;

        let sections = self.sections(pages, ctx);
        let pages_with_defaults = sections.iter().filter(|s| s.defaulted).count();

        let file = File::create(destination).map_err(|e| Error::write(destination, e))?;
        let mut writer = BufWriter::new(file);
        let mut bytes_written = 0;
        for section in &sections {
            writer
                .write_all(section.text.as_bytes())
                .map_err(|e| Error::write(destination, e))?;
            bytes_written += section.text.len();
        }
        let file = writer
            .into_inner()
            .map_err(|e| Error::write(destination, e.into_error()))?;
        file.sync_all().map_err(|e| Error::write(destination, e))?;

        info!(
            target: ctx.target(),
            "Successfully generated report with {} pages at {}",
            sections.len(),
            destination.display()
        );

        Ok(ReportSummary {
            path: destination.to_path_buf(),
            page_count: sections.len(),
            pages_with_defaults,
            bytes_written,
        })
    }

    /// Write the report to the configured destination.
    pub fn write_default(&self, pages: &PageContents, ctx: &Context) -> Result<ReportSummary> {
        self.write(pages, &self.options.destination(), ctx)
    }

    /// Write the report to `destination` using async file I/O.
    ///
    /// Same guarantees as [`write`](Self::write): the summary is returned
    /// only after the file is synced.
    #[cfg(feature = "async")]
    pub async fn write_async(
        &self,
        pages: &PageContents,
        destination: &Path,
        ctx: &Context,
    ) -> Result<ReportSummary> {
        if let Some(parent) = parent_dir(destination) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::write(destination, e))?;
        }

        let sections = self.sections(pages, ctx);
        let pages_with_defaults = sections.iter().filter(|s| s.defaulted).count();
        let report: String = sections.iter().map(|s| s.text.as_str()).collect();

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| Error::write(destination, e))?;
        file.write_all(report.as_bytes())
            .await
            .map_err(|e| Error::write(destination, e))?;
        file.sync_all()
            .await
            .map_err(|e| Error::write(destination, e))?;

        info!(
            target: ctx.target(),
            "Successfully generated report with {} pages at {}",
            sections.len(),
            destination.display()
        );

        Ok(ReportSummary {
            path: destination.to_path_buf(),
            page_count: sections.len(),
            pages_with_defaults,
            bytes_written: report.len(),
        })
    }

    fn sections(&self, pages: &PageContents, ctx: &Context) -> Vec<Section> {
        if self.options.parallel {
            pages
                .par_iter()
                .map(|(id, page)| self.section(id, page, ctx))
                .collect()
        } else {
            pages
                .iter()
                .map(|(id, page)| self.section(id, page, ctx))
                .collect()
        }
    }

    fn section(&self, page_id: &str, page: &PageContent, ctx: &Context) -> Section {
        let mut defaulted = Vec::new();

        let title = match non_empty(page.title.as_deref()) {
            Some(title) => title.to_string(),
            None => {
                defaulted.push("title");
                title_from_id(page_id)
            }
        };
        let id = non_empty(page.id.as_deref()).unwrap_or(page_id);
        let importance = match non_empty(page.importance.as_deref()) {
            Some(importance) => capitalize(importance),
            None => {
                defaulted.push("importance");
                self.options.default_importance.clone()
            }
        };
        let related = self.join_list(page.related_pages.as_deref());
        let files = self.join_list(page.file_paths.as_deref());
        let content = match page.content.as_deref() {
            Some(content) => self.pipeline.process(content),
            None => {
                defaulted.push("content");
                String::new()
            }
        };

        if !defaulted.is_empty() {
            warn!(
                target: ctx.target(),
                "Page '{}' is missing {}; using defaults",
                page_id,
                defaulted.join(", ")
            );
        }

        let underline = "-".repeat(title.chars().count() + 2);
        let rule = "-".repeat(SECTION_RULE_WIDTH);
        let text = format!(
            "# {title}\n{underline}\n\n\
             **ID:** {id}\n\
             **Importance:** {importance}\n\
             **Related Pages:** {related}\n\
             **Relevant Files:** {files}\n\n\
             ## Content\n\
             {content}\n\n\
             {rule}\n\n"
        );

        Section {
            text,
            defaulted: !defaulted.is_empty(),
        }
    }

    fn join_list(&self, items: Option<&[String]>) -> String {
        match items {
            Some(items) if !items.is_empty() => items.join(", "),
            _ => self.options.none_marker.clone(),
        }
    }
}

/// Render a report with default options.
pub fn render_report(pages: &PageContents, ctx: &Context) -> String {
    ReportWriter::default().render(pages, ctx)
}

/// Write a report to `destination` with default options.
pub fn write_report(
    pages: &PageContents,
    destination: &Path,
    ctx: &Context,
) -> Result<ReportSummary> {
    ReportWriter::default().write(pages, destination, ctx)
}

/// Derive a display title from a page id: `getting-started` → `Getting Started`.
///
/// A letter is upper-cased when it follows a non-letter and lower-cased
/// otherwise, so `api_v2beta` becomes `Api V2Beta`.
pub fn title_from_id(page_id: &str) -> String {
    let mut title = String::with_capacity(page_id.len());
    let mut in_word = false;
    for c in page_id.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

fn create_parent_dir(destination: &Path) -> Result<()> {
    if let Some(parent) = parent_dir(destination) {
        fs::create_dir_all(parent).map_err(|e| Error::write(destination, e))?;
    }
    Ok(())
}
