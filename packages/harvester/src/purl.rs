//! Fetching published object XML from the PURL server.
//!
//! Callers may pass either a druid or a public XML document they already
//! fetched; see [`PublicXmlSource`]. A document is used as is, without any
//! request.

use std::borrow::Cow;

use reqwest::blocking::Client;

use crate::config::{mods_url, public_xml_url};
use crate::error::{HarvesterError, Result};
use crate::http::{bytes_to_string, download_bytes, FetchError};
use crate::metadata::{object_id, project, Section};
use crate::xml::XmlDocument;

/// Where the public XML comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicXmlSource<'a> {
    /// Fetch `<purl>/<druid>.xml`.
    Druid(&'a str),
    /// Already fetched `publicObject` document.
    Document(&'a XmlDocument),
}

impl PublicXmlSource<'_> {
    /// Identifier used in error messages.
    fn context(&self) -> String {
        match self {
            Self::Druid(druid) => (*druid).to_string(),
            Self::Document(doc) => {
                object_id(doc).unwrap_or_else(|| "public XML document".to_string())
            }
        }
    }
}

impl<'a> From<&'a str> for PublicXmlSource<'a> {
    fn from(druid: &'a str) -> Self {
        Self::Druid(druid)
    }
}

impl<'a> From<&'a String> for PublicXmlSource<'a> {
    fn from(druid: &'a String) -> Self {
        Self::Druid(druid)
    }
}

impl<'a> From<&'a XmlDocument> for PublicXmlSource<'a> {
    fn from(doc: &'a XmlDocument) -> Self {
        Self::Document(doc)
    }
}

/// Client for one PURL server.
#[derive(Debug, Clone)]
pub struct PurlFetcher {
    http: Client,
    base_url: String,
}

impl PurlFetcher {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the public XML for a druid.
    ///
    /// # Errors
    /// * `MissingPurlPage` - the server answered with an error status
    /// * `MissingPublicXml` - no response, or the body is empty or not XML
    pub fn public_xml(&self, druid: &str) -> Result<XmlDocument> {
        let url = public_xml_url(&self.base_url, druid);
        tracing::debug!(url = %url, "Fetching public XML");

        let bytes = download_bytes(&self.http, &url).map_err(|e| match e {
            FetchError::Status { .. } => HarvesterError::MissingPurlPage {
                druid: druid.to_string(),
                source: e,
            },
            other => HarvesterError::MissingPublicXml {
                druid: druid.to_string(),
                reason: other.to_string(),
            },
        })?;

        parse_body(&bytes, &format!("public XML for {druid}")).map_err(|reason| {
            HarvesterError::MissingPublicXml {
                druid: druid.to_string(),
                reason,
            }
        })
    }

    /// Resolve a source to its public XML.
    ///
    /// A document is returned borrowed and unchanged; a druid is fetched.
    pub fn pub_xml<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<Cow<'a, XmlDocument>> {
        match source.into() {
            PublicXmlSource::Document(doc) => Ok(Cow::Borrowed(doc)),
            PublicXmlSource::Druid(druid) => self.public_xml(druid).map(Cow::Owned),
        }
    }

    /// Extract one section of the public XML.
    ///
    /// Fetch failures keep their own kind (`MissingPurlPage`,
    /// `MissingPublicXml`); an absent or empty section is the section's
    /// `Missing*` error.
    pub fn metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
        section: Section,
    ) -> Result<XmlDocument> {
        let source = source.into();
        let public_xml = self.pub_xml(source)?;
        project(&public_xml, section, &source.context())
    }

    pub fn content_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.metadata(source, Section::ContentMetadata)
    }

    pub fn identity_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.metadata(source, Section::IdentityMetadata)
    }

    pub fn rights_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.metadata(source, Section::RightsMetadata)
    }

    /// Relationship graph (`rdf:RDF`).
    pub fn rdf<'a>(&self, source: impl Into<PublicXmlSource<'a>>) -> Result<XmlDocument> {
        self.metadata(source, Section::Rdf)
    }

    /// Simple Dublin Core record (`oai_dc:dc`).
    pub fn dc<'a>(&self, source: impl Into<PublicXmlSource<'a>>) -> Result<XmlDocument> {
        self.metadata(source, Section::Dc)
    }

    /// Fetch the MODS record from its own endpoint, `<purl>/<druid>.mods`.
    pub fn mods(&self, druid: &str) -> Result<XmlDocument> {
        let url = mods_url(&self.base_url, druid);
        tracing::debug!(url = %url, "Fetching MODS");

        let missing = |reason: String| HarvesterError::MissingMods {
            druid: druid.to_string(),
            reason,
        };

        let bytes = download_bytes(&self.http, &url).map_err(|e| missing(e.to_string()))?;
        parse_body(&bytes, &format!("MODS for {druid}")).map_err(missing)
    }
}

/// Decode and parse a response body; the error is a human readable reason.
fn parse_body(bytes: &[u8], context: &str) -> std::result::Result<XmlDocument, String> {
    let text = bytes_to_string(bytes, context);
    if text.trim().is_empty() {
        return Err("empty response body".to_string());
    }
    XmlDocument::parse(text).map_err(|e| format!("unparseable XML: {e}"))
}
