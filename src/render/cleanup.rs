//! Markup cleanup pipeline for generated wiki page content.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::context::Context;

static RE_DETAILS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<details>.*?</details>").unwrap());

static RE_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)`Sources?: \[[^\]]*?\]\([^)]*?\)`").unwrap());

static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());

static RE_ABSOLUTE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(https?://[^\s)]+\)").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static RE_DIAGRAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid.*?```").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Strip markup and flatten everything into one line of text
    #[default]
    Flat,
    /// Strip markup but keep blank-line paragraph breaks
    Paragraphs,
}

/// Options for content cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Remove `<details>` disclosure blocks with their content
    pub strip_details: bool,

    /// Remove `` `Sources: [label](url)` `` citation markers
    pub strip_citations: bool,

    /// Remove `![alt](target)` images
    pub strip_images: bool,

    /// Replace `[label](http://…)` links with their label
    pub unwrap_links: bool,

    /// Remove remaining `<tag>` markup, keeping the text between tags
    pub strip_tags: bool,

    /// Remove ```` ```mermaid ```` diagram blocks
    pub strip_diagrams: bool,

    /// Keep blank-line paragraph breaks instead of flattening
    pub preserve_paragraphs: bool,

    /// Normalize Unicode to NFC form before cleanup
    pub normalize_unicode: bool,

    /// Optional cap on passes when re-running the pipeline to a fixpoint.
    ///
    /// `None` runs until the output is stable, which is what makes cleanup
    /// idempotent. A cap trades that for a bounded amount of work.
    pub max_passes: Option<usize>,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Flat => Self::flat(),
            CleanupPreset::Paragraphs => Self::paragraphs(),
        }
    }

    /// Flat cleanup: all markup removed, whitespace collapsed to single spaces.
    pub fn flat() -> Self {
        Self {
            strip_details: true,
            strip_citations: true,
            strip_images: true,
            unwrap_links: true,
            strip_tags: true,
            strip_diagrams: true,
            preserve_paragraphs: false,
            normalize_unicode: false,
            max_passes: None,
        }
    }

    /// Paragraph-preserving cleanup.
    pub fn paragraphs() -> Self {
        Self {
            preserve_paragraphs: true,
            ..Self::flat()
        }
    }

    /// Cap the number of passes.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes.max(1));
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::flat()
    }
}

/// Content cleanup pipeline.
///
/// Stages run in a fixed order: block and inline markup removal first,
/// whitespace normalization last. The stages are total over any input, so
/// the pipeline never fails.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Options this pipeline runs with.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process text through the cleanup pipeline.
    ///
    /// Removing one construct can expose another (a tag splitting a link,
    /// for instance), so the stages are repeated until the output stops
    /// changing. After the first pass whitespace is already collapsed, so
    /// every later pass that changes the text makes it shorter and the loop
    /// always ends.
    pub fn process(&self, text: &str) -> String {
        let mut result = self.process_once(text);
        let mut passes = 1;
        while self.options.max_passes.map_or(true, |cap| passes < cap) {
            let next = self.process_once(&result);
            if next == result {
                break;
            }
            result = next;
            passes += 1;
        }
        result
    }

    /// Clean a loosely-typed value.
    ///
    /// Strings are cleaned; anything else is returned unchanged.
    pub fn process_value(&self, value: &Value, ctx: &Context) -> Value {
        match value {
            Value::String(text) => Value::String(self.process(text)),
            other => {
                warn!(
                    target: ctx.target(),
                    "Content to clean is not a string. Returning as is."
                );
                other.clone()
            }
        }
    }

    fn process_once(&self, text: &str) -> String {
        let mut result = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        // Stage 1: markup removal. Disclosure blocks go before tag stripping,
        // otherwise their hidden content would survive as plain text.
        if self.options.strip_details {
            result = RE_DETAILS.replace_all(&result, "").to_string();
        }
        if self.options.strip_citations {
            result = RE_CITATION.replace_all(&result, "").to_string();
        }
        // Images before links: `![alt](url)` also matches the link pattern.
        if self.options.strip_images {
            result = RE_IMAGE.replace_all(&result, "").to_string();
        }
        if self.options.unwrap_links {
            result = RE_ABSOLUTE_LINK.replace_all(&result, "${1}").to_string();
        }
        if self.options.strip_tags {
            result = RE_TAG.replace_all(&result, "").to_string();
        }
        if self.options.strip_diagrams {
            result = RE_DIAGRAM.replace_all(&result, "").to_string();
        }

        // Stage 2: whitespace
        if self.options.preserve_paragraphs {
            collapse_paragraphs(&result)
        } else {
            collapse_flat(&result)
        }
    }
}

/// Collapse every whitespace run to one space.
///
/// The blank-line pass after it has nothing left to match.
fn collapse_flat(text: &str) -> String {
    let result = RE_WHITESPACE.replace_all(text, " ");
    let result = RE_BLANK_LINES.replace_all(&result, "\n\n");
    result.trim().to_string()
}

/// Split on blank lines, flatten each paragraph, and rejoin with one blank line.
fn collapse_paragraphs(text: &str) -> String {
    RE_BLANK_LINES
        .split(text)
        .map(|paragraph| RE_WHITESPACE.replace_all(paragraph, " ").trim().to_string())
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Clean content with the default (flat) pipeline.
pub fn clean_content(text: &str) -> String {
    CleanupPipeline::default().process(text)
}

/// Clean a loosely-typed value with the default pipeline.
pub fn clean_value(value: &Value, ctx: &Context) -> Value {
    CleanupPipeline::default().process_value(value, ctx)
}
