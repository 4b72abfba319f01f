//! Owned, validated XML document.

use std::fmt;

use roxmltree::{Document, ParsingOptions};

/// An XML document that is known to parse.
///
/// The source text is kept and parsed on demand, so the document can be
/// stored, cloned and passed across threads without borrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    xml: String,
}

fn parsing_options<'a>() -> ParsingOptions<'a> {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

impl XmlDocument {
    /// Parse XML text.
    ///
    /// # Examples
    /// ```
    /// use dor_harvester::xml::XmlDocument;
    ///
    /// let doc = XmlDocument::parse("<publicObject id='druid:bb375wb8869'/>").unwrap();
    /// assert_eq!(doc.root_name().as_deref(), Some("publicObject"));
    /// assert!(XmlDocument::parse("").is_err());
    /// ```
    pub fn parse(xml: impl Into<String>) -> Result<Self, roxmltree::Error> {
        let xml = xml.into();
        Document::parse_with_options(&xml, parsing_options())?;
        Ok(Self { xml })
    }

    /// Parse the stored text into a borrowed DOM.
    pub fn document(&self) -> Result<Document<'_>, roxmltree::Error> {
        Document::parse_with_options(&self.xml, parsing_options())
    }

    /// The XML source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.xml
    }

    /// Local name of the root element.
    #[must_use]
    pub fn root_name(&self) -> Option<String> {
        let doc = self.document().ok()?;
        Some(doc.root_element().tag_name().name().to_string())
    }

    /// Namespace URI of the root element.
    #[must_use]
    pub fn root_namespace(&self) -> Option<String> {
        let doc = self.document().ok()?;
        doc.root_element()
            .tag_name()
            .namespace()
            .map(str::to_string)
    }

    /// Attribute of the root element, by local name.
    #[must_use]
    pub fn root_attribute(&self, name: &str) -> Option<String> {
        let doc = self.document().ok()?;
        doc.root_element().attribute(name).map(str::to_string)
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_accessors() {
        let doc = XmlDocument::parse(
            r#"<mods xmlns="http://www.loc.gov/mods/v3" version="3.3"><titleInfo/></mods>"#,
        )
        .unwrap();
        assert_eq!(doc.root_name().as_deref(), Some("mods"));
        assert_eq!(
            doc.root_namespace().as_deref(),
            Some("http://www.loc.gov/mods/v3")
        );
        assert_eq!(doc.root_attribute("version").as_deref(), Some("3.3"));
    }

    #[test]
    fn test_root_without_namespace() {
        let doc = XmlDocument::parse("<contentMetadata/>").unwrap();
        assert_eq!(doc.root_name().as_deref(), Some("contentMetadata"));
        assert_eq!(doc.root_namespace(), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(XmlDocument::parse("<publicObject>").is_err());
        assert!(XmlDocument::parse("   ").is_err());
    }

    #[test]
    fn test_parse_allows_doctype() {
        let xml = r#"<?xml version="1.0"?><!DOCTYPE publicObject><publicObject>x</publicObject>"#;
        assert!(XmlDocument::parse(xml).is_ok());
    }

    #[test]
    fn test_display_is_source() {
        let doc = XmlDocument::parse("<a>b</a>").unwrap();
        assert_eq!(doc.to_string(), "<a>b</a>");
        assert_eq!(doc.clone().into_string(), "<a>b</a>");
    }
}
