//! Document-level types.

use serde::{Deserialize, Serialize};

/// Importance assigned to a page whose source omits it.
pub const DEFAULT_IMPORTANCE: &str = "medium";

/// A wiki structure recovered from an AI response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Wiki title
    pub title: String,

    /// Wiki description
    pub description: String,

    /// Pages in document order
    pub pages: Vec<PageRecord>,
}

impl StructuredDocument {
    /// Create a new empty document.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get the first page with the given id.
    ///
    /// Ids are not guaranteed unique; later duplicates are unreachable here.
    pub fn get_page(&self, id: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageRecord) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Ids of all pages, in document order.
    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.id.as_str())
    }
}

/// Metadata for one documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Page id (may be empty)
    pub id: String,

    /// Page title
    pub title: String,

    /// Page description
    pub description: String,

    /// Free-form importance label
    pub importance: String,

    /// Source files relevant to the page
    pub file_paths: Vec<String>,

    /// Ids of related pages
    #[serde(rename = "relatedPages")]
    pub related_page_ids: Vec<String>,
}

impl PageRecord {
    /// Create a page with the given id and default fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            importance: DEFAULT_IMPORTANCE.to_string(),
            file_paths: Vec::new(),
            related_page_ids: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the importance label.
    pub fn with_importance(mut self, importance: impl Into<String>) -> Self {
        self.importance = importance.into();
        self
    }

    /// Add a file path.
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add a related page id.
    pub fn with_related(mut self, id: impl Into<String>) -> Self {
        self.related_page_ids.push(id.into());
        self
    }
}

impl Default for PageRecord {
    fn default() -> Self {
        Self::new("")
    }
}
