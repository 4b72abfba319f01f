//! XML support: an owned document type and DOM helpers.

mod document;
mod utils;

pub use document::XmlDocument;
pub use utils::{
    element_children, find_child, find_children, get_tag_name, get_text, has_expanded_name,
    subtree_xml,
};
