//! Druid extraction from OAI identifiers.
//!
//! OAI identifiers look like `oai:<host>/druid:<druid>`; only the part after
//! the last `druid:` is meaningful to callers.

use crate::oai::{Header, Record};

/// Marker preceding the druid in an OAI identifier.
pub const DRUID_MARKER: &str = "druid:";

/// Anything that carries an OAI identifier.
pub trait OaiIdentifier {
    /// The full OAI identifier.
    fn oai_identifier(&self) -> &str;
}

impl OaiIdentifier for str {
    fn oai_identifier(&self) -> &str {
        self
    }
}

impl OaiIdentifier for String {
    fn oai_identifier(&self) -> &str {
        self
    }
}

impl OaiIdentifier for Header {
    fn oai_identifier(&self) -> &str {
        &self.identifier
    }
}

impl OaiIdentifier for Record {
    fn oai_identifier(&self) -> &str {
        self.header.oai_identifier()
    }
}

/// Druid part of an OAI identifier, header or record.
///
/// Returns everything after the last `druid:`; an identifier without the
/// marker is returned unchanged.
///
/// # Examples
/// ```
/// use dor_harvester::druid::druid;
/// use dor_harvester::oai::Header;
///
/// assert_eq!(druid("oai:searchworks.stanford.edu/druid:foo"), "foo");
/// assert_eq!(druid(&Header::new("oai:x/druid:bar")), "bar");
/// ```
pub fn druid<T: OaiIdentifier + ?Sized>(item: &T) -> &str {
    let id = item.oai_identifier();
    match id.rfind(DRUID_MARKER) {
        Some(pos) => &id[pos + DRUID_MARKER.len()..],
        None => id,
    }
}
