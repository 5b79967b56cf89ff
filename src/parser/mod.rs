//! Wiki structure extraction and parsing.

mod extract;
mod structure;
mod tree;

pub use extract::{extract_structure, END_MARKER, START_MARKER};
pub use structure::{parse_response, parse_structure};
pub use tree::{XmlElement, XmlNode};
