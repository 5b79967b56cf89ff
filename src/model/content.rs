//! Generated page content supplied by the content-generation step.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::Result;

/// Generated pages keyed by page id, in input order.
pub type PageContents = IndexMap<String, PageContent>;

/// Content and optional metadata overrides for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Page id override (the mapping key is used when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Raw page content, possibly containing markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Importance label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,

    /// Related page ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_pages: Option<Vec<String>>,

    /// Relevant source files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_paths: Option<Vec<String>>,
}

impl PageContent {
    /// Create page content with the given raw text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the importance label.
    pub fn with_importance(mut self, importance: impl Into<String>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    /// Set the related page ids.
    pub fn with_related_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_pages = Some(pages.into_iter().map(Into::into).collect());
        self
    }

    /// Set the relevant file paths.
    pub fn with_file_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Convert one loosely-typed JSON entry, substituting defaults for
    /// anything malformed.
    fn from_value(page_id: &str, value: Value, ctx: &Context) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                warn!(
                    target: ctx.target(),
                    "Page '{}' is not an object ({}), using empty content",
                    page_id,
                    json_kind(&other)
                );
                return Self::default();
            }
        };

        Self {
            id: text_field(&mut map, "id", page_id, ctx),
            title: text_field(&mut map, "title", page_id, ctx),
            content: text_field(&mut map, "content", page_id, ctx),
            importance: text_field(&mut map, "importance", page_id, ctx),
            related_pages: list_field(&mut map, "relatedPages", page_id, ctx),
            file_paths: list_field(&mut map, "filePaths", page_id, ctx),
        }
    }
}

/// Load a JSON object of page id → page content.
///
/// Only the top-level shape is enforced; individual entries never fail.
pub fn load_page_contents(json: &str, ctx: &Context) -> Result<PageContents> {
    let raw: IndexMap<String, Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(id, value)| {
            let content = PageContent::from_value(&id, value, ctx);
            (id, content)
        })
        .collect())
}

fn text_field(
    map: &mut Map<String, Value>,
    key: &str,
    page_id: &str,
    ctx: &Context,
) -> Option<String> {
    match map.remove(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => {
            warn!(
                target: ctx.target(),
                "Page '{}': field '{}' is {}, converting to text",
                page_id,
                key,
                json_kind(&other)
            );
            Some(other.to_string())
        }
    }
}

fn list_field(
    map: &mut Map<String, Value>,
    key: &str,
    page_id: &str,
    ctx: &Context,
) -> Option<Vec<String>> {
    match map.remove(key)? {
        Value::Null => None,
        Value::Array(items) => {
            let total = items.len();
            let kept: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            if kept.len() < total {
                warn!(
                    target: ctx.target(),
                    "Page '{}': dropped {} non-text entries from '{}'",
                    page_id,
                    total - kept.len(),
                    key
                );
            }
            Some(kept)
        }
        other => {
            warn!(
                target: ctx.target(),
                "Page '{}': field '{}' is {}, expected a list",
                page_id,
                key,
                json_kind(&other)
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
