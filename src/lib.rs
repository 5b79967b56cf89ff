//! # unwiki
//!
//! Recover wiki structures from AI responses and flatten wiki pages into
//! clean text reports.
//!
//! This library isolates the `<wiki_structure>` fragment from a noisy model
//! response, parses it into a typed document, strips presentation markup
//! from generated page content, and writes an `llms.txt`-style report.
//!
//! ## Quick Start
//!
//! ```
//! use unwiki::{parse_response, clean_content};
//!
//! fn main() -> unwiki::Result<()> {
//!     let response = "```xml\n<wiki_structure>\n<title>Docs</title>\n<pages>\n\
//!                     <page id=\"intro\"><title>Intro</title></page>\n\
//!                     </pages>\n</wiki_structure>\n```";
//!
//!     let doc = parse_response(response)?;
//!     assert_eq!(doc.title, "Docs");
//!     assert_eq!(doc.pages[0].importance, "medium");
//!
//!     let text = clean_content("See [the guide](https://example.com) <b>now</b>.");
//!     assert_eq!(text, "See the guide now.");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fragment extraction**: Code fences and control characters removed
//! - **Lenient structure parsing**: Pages found at any nesting depth
//! - **Content cleanup**: Disclosure blocks, citations, images, links, tags, diagrams
//! - **Report writing**: One section per page, parallel rendering with Rayon
//! - **Export payloads**: Request body for the remote wiki export service

pub mod context;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use context::Context;
pub use error::{Error, Result};
pub use export::{
    build_export_payload, export_filename, ExportFormat, ExportOptions, ExportPage, ExportPayload,
};
pub use model::{load_page_contents, PageContent, PageContents, PageRecord, StructuredDocument};
pub use parser::{XmlElement, XmlNode};
pub use render::{
    CleanupOptions, CleanupPipeline, CleanupPreset, JsonFormat, ReportOptions, ReportSummary,
    ReportWriter,
};

use std::path::Path;

/// Extract the `<wiki_structure>` fragment from a raw response.
///
/// # Example
///
/// ```
/// use unwiki::{extract_structure, Error};
///
/// let fragment = extract_structure("noise <wiki_structure></wiki_structure> noise").unwrap();
/// assert_eq!(fragment, "<wiki_structure></wiki_structure>");
///
/// assert!(matches!(extract_structure("   "), Err(Error::EmptyInput)));
/// ```
pub fn extract_structure(response: &str) -> Result<String> {
    parser::extract_structure(response, &Context::default())
}

/// Parse a `<wiki_structure>` fragment into a document.
pub fn parse_structure(fragment: &str) -> Result<StructuredDocument> {
    parser::parse_structure(fragment, &Context::default())
}

/// Extract and parse a raw response in one step.
pub fn parse_response(response: &str) -> Result<StructuredDocument> {
    parser::parse_response(response, &Context::default())
}

/// Strip markup from page content and flatten its whitespace.
///
/// # Example
///
/// ```
/// use unwiki::clean_content;
///
/// let text = clean_content("<details>hidden</details>Shown ![img](a.png) text");
/// assert_eq!(text, "Shown text");
/// ```
pub fn clean_content(text: &str) -> String {
    render::clean_content(text)
}

/// Write a page report to `destination`, replacing any existing file.
///
/// # Example
///
/// ```no_run
/// use unwiki::{write_report, PageContent, PageContents};
///
/// let mut pages = PageContents::new();
/// pages.insert("getting-started".to_string(), PageContent::new("Install it."));
///
/// let summary = write_report(&pages, "repo_wiki_generations/llms.txt")?;
/// println!("{} pages written", summary.page_count);
/// # Ok::<(), unwiki::Error>(())
/// ```
pub fn write_report<P: AsRef<Path>>(pages: &PageContents, destination: P) -> Result<ReportSummary> {
    render::write_report(pages, destination.as_ref(), &Context::default())
}

/// Builder for running the pipeline with explicit context and options.
///
/// # Example
///
/// ```no_run
/// use unwiki::{CleanupPreset, Context, PageContents, Unwiki};
///
/// let response = std::fs::read_to_string("response.txt")?;
/// let result = Unwiki::new()
///     .with_context(Context::for_repo("octocat/hello-world"))
///     .with_cleanup(CleanupPreset::Paragraphs)
///     .parse(&response)?;
///
/// let generated = PageContents::new();
/// result.write_report(&generated)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unwiki {
    context: Context,
    report_options: ReportOptions,
    export_options: ExportOptions,
}

impl Unwiki {
    /// Create a new Unwiki builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logging context.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Set the cleanup preset used for report content.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.report_options = self.report_options.with_cleanup_preset(preset);
        self
    }

    /// Set report options.
    pub fn with_report_options(mut self, options: ReportOptions) -> Self {
        self.report_options = options;
        self
    }

    /// Set export options.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Extract and parse a raw response.
    pub fn parse(self, response: &str) -> Result<UnwikiResult> {
        let document = parser::parse_response(response, &self.context)?;
        Ok(UnwikiResult {
            document,
            context: self.context,
            report_options: self.report_options,
            export_options: self.export_options,
        })
    }
}

/// Result of parsing a response, carrying the options to act on it.
#[derive(Debug, Clone)]
pub struct UnwikiResult {
    /// The parsed document
    pub document: StructuredDocument,
    context: Context,
    report_options: ReportOptions,
    export_options: ExportOptions,
}

impl UnwikiResult {
    /// Get the document.
    pub fn document(&self) -> &StructuredDocument {
        &self.document
    }

    /// Convert the document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Build the export payload for the generated pages.
    pub fn export_payload(&self, generated: &PageContents, repo_url: &str) -> Result<ExportPayload> {
        build_export_payload(
            &self.document,
            generated,
            repo_url,
            &self.export_options,
            &self.context,
        )
    }

    /// Write the generated pages to the configured report destination.
    pub fn write_report(&self, generated: &PageContents) -> Result<ReportSummary> {
        ReportWriter::new(self.report_options.clone()).write_default(generated, &self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "```xml\n<wiki_structure><title>Test Wiki</title><description>This is a test wiki.</description><pages><page id=\"p1\"><title>Page 1</title><description>Content for page 1.</description><importance>high</importance><file_path>file1.txt</file_path></page></pages></wiki_structure>\n```";

    #[test]
    fn test_unwiki_builder() {
        let unwiki = Unwiki::new()
            .with_context(Context::for_repo("o/r"))
            .with_cleanup(CleanupPreset::Paragraphs);

        assert_eq!(unwiki.context.target(), "unwiki::o/r");
        assert!(unwiki.report_options.cleanup.preserve_paragraphs);
    }

    #[test]
    fn test_unwiki_parse() {
        let result = Unwiki::new().parse(RESPONSE).unwrap();
        assert_eq!(result.document().title, "Test Wiki");
        assert_eq!(result.document().pages[0].file_paths, vec!["file1.txt"]);
    }

    #[test]
    fn test_unwiki_parse_errors() {
        assert!(matches!(Unwiki::new().parse(""), Err(Error::EmptyInput)));
        assert!(matches!(
            Unwiki::new().parse("nothing"),
            Err(Error::NoStructureFound { .. })
        ));
    }

    #[test]
    fn test_result_to_json() {
        let result = Unwiki::new().parse(RESPONSE).unwrap();
        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"title\":\"Test Wiki\""));
    }

    #[test]
    fn test_result_export_payload() {
        let result = Unwiki::new()
            .with_export_options(ExportOptions::new().with_format(ExportFormat::Markdown))
            .parse(RESPONSE)
            .unwrap();

        let mut generated = PageContents::new();
        generated.insert("p1".to_string(), PageContent::new("Body"));

        let payload = result.export_payload(&generated, "http://example.com/r").unwrap();
        assert_eq!(payload.format, ExportFormat::Markdown);
        assert_eq!(payload.pages[0].content, "Body");
    }
}
