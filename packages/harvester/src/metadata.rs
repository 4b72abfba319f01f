//! Named metadata sections of a PURL public XML document.

use std::fmt;

use clap::ValueEnum;

use crate::config::{OAI_DC_NAMESPACE, RDF_NAMESPACE};
use crate::error::{HarvesterError, Result};
use crate::xml::{has_expanded_name, subtree_xml, XmlDocument};

/// Root element of the public XML.
pub const PUBLIC_OBJECT: &str = "publicObject";

/// A section found directly under `/publicObject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Section {
    /// `/publicObject/contentMetadata`
    ContentMetadata,
    /// `/publicObject/identityMetadata`
    IdentityMetadata,
    /// `/publicObject/rightsMetadata`
    RightsMetadata,
    /// `/publicObject/rdf:RDF`, the relationship graph
    Rdf,
    /// `/publicObject/oai_dc:dc`, the simple Dublin Core record
    Dc,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::ContentMetadata,
        Self::IdentityMetadata,
        Self::RightsMetadata,
        Self::Rdf,
        Self::Dc,
    ];

    /// Local name of the section element.
    #[must_use]
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::ContentMetadata => "contentMetadata",
            Self::IdentityMetadata => "identityMetadata",
            Self::RightsMetadata => "rightsMetadata",
            Self::Rdf => "RDF",
            Self::Dc => "dc",
        }
    }

    /// Namespace of the section element.
    #[must_use]
    pub fn namespace(&self) -> Option<&'static str> {
        match self {
            Self::Rdf => Some(RDF_NAMESPACE),
            Self::Dc => Some(OAI_DC_NAMESPACE),
            _ => None,
        }
    }

    /// The missing-metadata error for this section.
    #[must_use]
    pub fn missing(&self, context: impl Into<String>) -> HarvesterError {
        let context = context.into();
        match self {
            Self::ContentMetadata => HarvesterError::MissingContentMetadata(context),
            Self::IdentityMetadata => HarvesterError::MissingIdentityMetadata(context),
            Self::RightsMetadata => HarvesterError::MissingRightsMetadata(context),
            Self::Rdf => HarvesterError::MissingRdf(context),
            Self::Dc => HarvesterError::MissingDc(context),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Cut one section out of a public XML document.
///
/// The section becomes a standalone document that keeps the namespaces it
/// inherits from `publicObject`. A missing section, or one with no child
/// nodes, is the section's `Missing*` error; so is any parse failure.
///
/// # Arguments
/// * `public_xml` - The `publicObject` document
/// * `section` - Section to extract
/// * `context` - Druid or document id reported in errors
pub fn project(public_xml: &XmlDocument, section: Section, context: &str) -> Result<XmlDocument> {
    let doc = public_xml.document().map_err(|e| {
        tracing::debug!(error = %e, %section, context, "Public XML does not parse");
        section.missing(context)
    })?;

    let root = doc.root_element();
    if !has_expanded_name(root, None, PUBLIC_OBJECT) {
        tracing::debug!(
            root = root.tag_name().name(),
            %section,
            context,
            "Unexpected root element"
        );
        return Err(section.missing(context));
    }

    let node = root
        .children()
        .find(|n| has_expanded_name(*n, section.namespace(), section.tag_name()))
        .filter(|n| n.has_children())
        .ok_or_else(|| section.missing(context))?;

    XmlDocument::parse(subtree_xml(node)).map_err(|e| {
        tracing::debug!(error = %e, %section, context, "Section does not reparse");
        section.missing(context)
    })
}

/// The `id` attribute of `publicObject`, e.g. `druid:bb375wb8869`.
#[must_use]
pub fn object_id(public_xml: &XmlDocument) -> Option<String> {
    public_xml.root_attribute("id")
}
