//! Export payload construction for the remote wiki export service.
//!
//! This module builds the request body and resolves the download file name;
//! sending the request and saving the response is left to the caller.
//!
//! # Example
//!
//! ```
//! use unwiki::export::{build_export_payload, ExportOptions};
//! use unwiki::{Context, PageContent, PageContents, PageRecord, StructuredDocument};
//!
//! let mut doc = StructuredDocument::new("Wiki", "");
//! doc.add_page(PageRecord::new("intro").with_title("Introduction"));
//!
//! let mut generated = PageContents::new();
//! generated.insert("intro".to_string(), PageContent::new("Welcome."));
//!
//! let payload = build_export_payload(
//!     &doc,
//!     &generated,
//!     "https://github.com/octocat/hello-world",
//!     &ExportOptions::default(),
//!     &Context::default(),
//! )?;
//! assert_eq!(payload.pages[0].content, "Welcome.");
//! # Ok::<(), unwiki::Error>(())
//! ```

use std::env;
use std::sync::LazyLock;

use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::{PageContents, PageRecord, StructuredDocument};

/// Environment variable consulted for the export service base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Base URL used when neither options nor environment provide one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

/// Content sent for a generated entry that carries no content.
pub const CONTENT_NOT_GENERATED: &str = "Content not generated";

static RE_DISPOSITION_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename=(?:"([^"]+)"|([^;]+))"#).unwrap());

/// Export file format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Markdown document
    Markdown,
    /// JSON document
    #[default]
    Json,
}

impl ExportFormat {
    /// Wire name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }

    /// File extension for downloads in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

/// Options for export payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Export service base URL (falls back to `API_BASE_URL`)
    pub api_base_url: Option<String>,

    /// Requested format
    pub format: ExportFormat,

    /// Repository host type sent as `type`
    pub source_type: String,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the export format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Base URL from options, then the environment, then the default.
    pub fn resolve_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| env::var(API_BASE_URL_ENV).ok().filter(|url| !url.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Full URL of the export endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/export/wiki", self.resolve_base_url().trim_end_matches('/'))
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            api_base_url: None,
            format: ExportFormat::default(),
            source_type: "github".to_string(),
        }
    }
}

/// One page in the export payload: structure metadata plus content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPage {
    /// Page metadata from the parsed structure
    #[serde(flatten)]
    pub page: PageRecord,

    /// Generated page content
    pub content: String,
}

/// Request body for the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    /// Repository URL
    pub repo_url: String,

    /// Repository host type
    #[serde(rename = "type")]
    pub source_type: String,

    /// Pages in structure order
    pub pages: Vec<ExportPage>,

    /// Requested format
    pub format: ExportFormat,
}

impl ExportPayload {
    /// Serialize the payload to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Merge a parsed structure with generated content into an export payload.
///
/// Pages keep structure order. A page whose id is empty or absent from
/// `generated` is exported with empty content.
pub fn build_export_payload(
    doc: &StructuredDocument,
    generated: &PageContents,
    repo_url: &str,
    options: &ExportOptions,
    ctx: &Context,
) -> Result<ExportPayload> {
    if doc.is_empty() || generated.is_empty() {
        return Err(Error::NothingToExport(
            "wiki structure has no pages or no pages were generated".to_string(),
        ));
    }

    let pages: Vec<ExportPage> = doc
        .pages
        .iter()
        .map(|page| {
            let content = match generated.get(&page.id) {
                Some(entry) if !page.id.is_empty() => entry
                    .content
                    .clone()
                    .unwrap_or_else(|| CONTENT_NOT_GENERATED.to_string()),
                _ => String::new(),
            };
            ExportPage {
                page: page.clone(),
                content,
            }
        })
        .collect();

    info!(
        target: ctx.target(),
        "Prepared {} export payload with {} pages for {}",
        options.format.as_str(),
        pages.len(),
        repo_url
    );

    Ok(ExportPayload {
        repo_url: repo_url.to_string(),
        source_type: options.source_type.clone(),
        pages,
        format: options.format,
    })
}

/// Resolve the file name for a downloaded export.
///
/// A `filename` parameter in the `Content-Disposition` header wins; otherwise
/// the name is `{repo}_wiki.{ext}` with `/` in the repository name replaced.
pub fn export_filename(
    repo: &str,
    format: ExportFormat,
    content_disposition: Option<&str>,
) -> String {
    let from_header = content_disposition
        .and_then(|header| RE_DISPOSITION_FILENAME.captures(header))
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty());

    match from_header {
        Some(name) => name.to_string(),
        None => format!("{}_wiki.{}", repo.replace('/', "_"), format.extension()),
    }
}
