//! Conversion of a wiki structure fragment into a `StructuredDocument`.

use log::debug;

use super::extract::extract_structure;
use super::tree::XmlElement;
use crate::context::Context;
use crate::error::Result;
use crate::model::{PageRecord, StructuredDocument, DEFAULT_IMPORTANCE};

const PAGE_TAG: &str = "page";
const FILE_PATH_TAG: &str = "file_path";
const RELATED_TAG: &str = "related";

/// Parse a `<wiki_structure>` fragment.
///
/// Pages are collected from any depth below the root, so producers that
/// skip or duplicate the `<pages>` container still parse.
pub fn parse_structure(fragment: &str, ctx: &Context) -> Result<StructuredDocument> {
    let root = XmlElement::parse(fragment)?;

    let mut doc = StructuredDocument::new(
        root.child_text("title").unwrap_or_default(),
        root.child_text("description").unwrap_or_default(),
    );

    for page in root.descendants_named(PAGE_TAG) {
        doc.add_page(page_record(page));
    }

    debug!(
        target: ctx.target(),
        "Parsed wiki structure '{}' with {} pages",
        doc.title,
        doc.page_count()
    );
    Ok(doc)
}

/// Extract and parse in one step.
pub fn parse_response(response: &str, ctx: &Context) -> Result<StructuredDocument> {
    let fragment = extract_structure(response, ctx)?;
    parse_structure(&fragment, ctx)
}

fn page_record(page: &XmlElement) -> PageRecord {
    let importance = match page.child_text("importance") {
        Some(text) if !text.is_empty() => text,
        _ => DEFAULT_IMPORTANCE,
    };

    PageRecord {
        id: page.attribute("id").unwrap_or_default().to_string(),
        title: page.child_text("title").unwrap_or_default().to_string(),
        description: page.child_text("description").unwrap_or_default().to_string(),
        importance: importance.to_string(),
        file_paths: descendant_texts(page, FILE_PATH_TAG),
        related_page_ids: descendant_texts(page, RELATED_TAG),
    }
}

/// Leading text of every named descendant, skipping empty ones.
fn descendant_texts(element: &XmlElement, name: &str) -> Vec<String> {
    element
        .descendants_named(name)
        .into_iter()
        .filter_map(XmlElement::leading_text)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}
